use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Bid or offer price, negative when the unit pays to reduce its output.
pub type PoundsPerMegawattHour = Quantity<-1, -1, 1>;

impl Display for PoundsPerMegawattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} £/MWh", self.0)
    }
}

impl Debug for PoundsPerMegawattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}£/MWh", self.0)
    }
}
