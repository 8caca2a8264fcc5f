use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

pub type Pounds = Quantity<0, 0, 1>;

impl Display for Pounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} £", self.0)
    }
}

impl Debug for Pounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}£", self.0)
    }
}
