//! Progressive slab tariff.
//!
//! Each slab bills only the usage that falls inside its own band, so crossing a threshold changes
//! the marginal rate but never reprices the units already consumed.

use crate::quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate};

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Slab {
    /// Inclusive lower bound of the band.
    pub lower: KilowattHours,

    /// Upper bound of the band, unbounded for the last slab.
    pub upper: Option<KilowattHours>,

    pub rate: KilowattHourRate,
}

impl Slab {
    /// Portion of the usage that falls into this slab.
    pub fn billed_units(&self, units: KilowattHours) -> KilowattHours {
        let above = (units - self.lower).max(KilowattHours::ZERO);
        match self.upper {
            Some(upper) => above.min(upper - self.lower),
            None => above,
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlabCharge {
    pub slab: Slab,
    pub units: KilowattHours,
    pub cost: Cost,
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Tariff {
    slabs: Vec<Slab>,
}

impl Default for Tariff {
    /// The residential schedule: first 100 units free, then 2.25, 4.50 and 6.60 per unit.
    fn default() -> Self {
        Self {
            slabs: vec![
                Slab {
                    lower: KilowattHours(0.0),
                    upper: Some(KilowattHours(100.0)),
                    rate: KilowattHourRate(0.0),
                },
                Slab {
                    lower: KilowattHours(100.0),
                    upper: Some(KilowattHours(200.0)),
                    rate: KilowattHourRate(2.25),
                },
                Slab {
                    lower: KilowattHours(200.0),
                    upper: Some(KilowattHours(500.0)),
                    rate: KilowattHourRate(4.50),
                },
                Slab { lower: KilowattHours(500.0), upper: None, rate: KilowattHourRate(6.60) },
            ],
        }
    }
}

impl Tariff {
    /// Cost of the cumulative usage, at full precision.
    ///
    /// Negative and non-finite usage costs nothing.
    pub fn cost(&self, units: KilowattHours) -> Cost {
        self.breakdown(units).into_iter().map(|charge| charge.cost).sum()
    }

    /// Per-slab charges, in the slab order.
    pub fn breakdown(&self, units: KilowattHours) -> Vec<SlabCharge> {
        let units = Self::sanitize(units);
        self.slabs
            .iter()
            .map(|slab| {
                let billed = slab.billed_units(units);
                SlabCharge { slab: *slab, units: billed, cost: billed * slab.rate }
            })
            .collect()
    }

    fn sanitize(units: KilowattHours) -> KilowattHours {
        if units.is_finite() && units > KilowattHours::ZERO { units } else { KilowattHours::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn cost(units: f64) -> f64 {
        Tariff::default().cost(KilowattHours(units)).0
    }

    #[test]
    fn test_free_allowance() {
        for units in [0.0, 0.5, 50.0, 99.999, 100.0] {
            assert_abs_diff_eq!(cost(units), 0.0);
        }
    }

    #[test]
    fn test_first_slab() {
        assert_abs_diff_eq!(cost(150.0), 112.5);
        assert_abs_diff_eq!(cost(200.0), 225.0);
    }

    #[test]
    fn test_second_slab() {
        assert_abs_diff_eq!(cost(300.0), 675.0);
        assert_abs_diff_eq!(cost(500.0), 1575.0);
    }

    #[test]
    fn test_third_slab() {
        assert_abs_diff_eq!(cost(600.0), 2235.0, epsilon = 1e-9);
    }

    #[test]
    fn test_full_precision() {
        assert_abs_diff_eq!(cost(100.001), 0.00225, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_input_is_free() {
        for units in [-1.0, -1000.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_abs_diff_eq!(cost(units), 0.0);
        }
    }

    #[test]
    fn test_monotonic() {
        let mut previous = 0.0;
        for step in 0..=2000 {
            let current = cost(f64::from(step) * 0.5);
            assert!(current >= previous, "cost dropped at {} units", f64::from(step) * 0.5);
            previous = current;
        }
    }

    #[test]
    fn test_continuous_at_thresholds() {
        for threshold in [100.0, 200.0, 500.0] {
            assert_abs_diff_eq!(cost(threshold + 1e-9), cost(threshold), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_breakdown_sums_to_cost() {
        let tariff = Tariff::default();
        let breakdown = tariff.breakdown(KilowattHours(600.0));
        let units: Vec<f64> = breakdown.iter().map(|charge| charge.units.0).collect();
        assert_eq!(units, [100.0, 100.0, 300.0, 100.0]);
        let total = breakdown.iter().map(|charge| charge.cost).sum::<Cost>();
        assert_abs_diff_eq!(total.0, tariff.cost(KilowattHours(600.0)).0);
    }
}
