use std::ops::{Div, Mul};

use crate::quantity::{currency::Yuan, power::Megawatts, price::YuanPerMegawattHour, time::Hours};

quantity!(MegawattHours, "MWh");

impl Mul<YuanPerMegawattHour> for MegawattHours {
    type Output = Yuan;

    fn mul(self, rhs: YuanPerMegawattHour) -> Self::Output {
        Yuan(self.0 * rhs.0)
    }
}

impl Div<Megawatts> for MegawattHours {
    type Output = Hours;

    fn div(self, rhs: Megawatts) -> Self::Output {
        Hours(self.0 / rhs.0)
    }
}
