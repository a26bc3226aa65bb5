use std::ops::Mul;

use crate::quantity::{cost::Cost, rate::KilowattHourRate};

quantity!(KilowattHours, "kWh");

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Cost(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_mul_rate() {
        assert_abs_diff_eq!((KilowattHours(50.0) * KilowattHourRate(2.25)).0, 112.5);
    }

    #[test]
    fn test_display_forwards_precision() {
        assert_eq!(format!("{:.2}", KilowattHours(1.005_1)), "1.01 kWh");
    }

    #[test]
    fn test_ordering_with_nan() {
        assert!(KilowattHours(f64::NAN) > KilowattHours(1.0));
        assert_eq!(KilowattHours(1.0).max(KilowattHours::ZERO), KilowattHours(1.0));
    }
}
