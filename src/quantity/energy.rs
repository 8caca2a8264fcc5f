use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Pounds, price::PoundsPerMegawattHour};

pub type MegawattHours = Quantity<1, 1, 0>;

impl Display for MegawattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} MWh", self.0)
    }
}

impl Debug for MegawattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}MWh", self.0)
    }
}

impl Mul<PoundsPerMegawattHour> for MegawattHours {
    type Output = Pounds;

    fn mul(self, rhs: PoundsPerMegawattHour) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
