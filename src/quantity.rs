#[macro_use]
mod macros;

pub mod currency;
pub mod energy;
pub mod power;
pub mod price;
pub mod time;

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{
        currency::Yuan,
        energy::MegawattHours,
        power::Megawatts,
        price::YuanPerMegawattHour,
        time::Hours,
    };

    #[test]
    fn test_capacity_times_hours() {
        let energy = Megawatts(50.0) * Hours(120.0);
        assert_abs_diff_eq!(energy.0, 6000.0);
    }

    #[test]
    fn test_energy_times_price() {
        let cost = MegawattHours(12.5) * YuanPerMegawattHour(-40.0);
        assert_eq!(cost, Yuan(-500.0));
    }

    #[test]
    fn test_ordering() {
        assert!(Yuan(1.0) > Yuan::ZERO);
        assert_eq!(Hours(3.0).max(Hours(5.0)), Hours(5.0));
    }

    #[test]
    fn test_display_honours_precision() {
        assert_eq!(format!("{:.1}", MegawattHours(1.26)), "1.3 MWh");
        assert_eq!(format!("{:?}", Megawatts(3.0)), "3.0MW");
    }
}
