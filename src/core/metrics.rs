use std::ops::Add;

use crate::{
    core::{
        minute::ONE_MINUTE,
        reconcile::{ReconciledFrame, ReconciledRow},
    },
    quantity::{cost::Pounds, energy::MegawattHours, power::Megawatts, time::Hours},
};

/// Summary of a reconciled frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    pub notified_energy: MegawattHours,
    pub curtailed_energy: MegawattHours,

    /// Undefined when nothing is priced.
    pub curtailment_cost: Option<Pounds>,
}

impl Add for Metrics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            notified_energy: self.notified_energy + rhs.notified_energy,
            curtailed_energy: self.curtailed_energy + rhs.curtailed_energy,
            curtailment_cost: match (self.curtailment_cost, rhs.curtailment_cost) {
                (Some(lhs), Some(rhs)) => Some(lhs + rhs),
                (lhs, rhs) => lhs.or(rhs),
            },
        }
    }
}

impl ReconciledFrame {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            notified_energy: notified_energy(self),
            curtailed_energy: curtailed_energy(self),
            curtailment_cost: curtailment_cost(self),
        }
    }
}

/// Energy of the minute-resolution levels.
fn minute_energy(levels: impl Iterator<Item = Megawatts>) -> MegawattHours {
    levels.sum::<Megawatts>() * Hours::from(ONE_MINUTE)
}

pub fn curtailed_energy(rows: &[ReconciledRow]) -> MegawattHours {
    minute_energy(rows.iter().map(|row| row.delta))
}

pub fn notified_energy(rows: &[ReconciledRow]) -> MegawattHours {
    minute_energy(rows.iter().map(|row| row.level_fpn))
}

/// Total cost of the priced rows, or `None` if there are none.
#[must_use]
pub fn curtailment_cost(rows: &[ReconciledRow]) -> Option<Pounds> {
    rows.iter()
        .filter_map(|row| row.pricing)
        .map(|pricing| pricing.cost)
        .fold(None, |total, cost| Some(total.unwrap_or(Pounds::ZERO) + cost))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::{
        core::{
            reconcile::{Pricing, UnitReconciler},
            segment::{AcceptId, Acceptance, RampSegment},
        },
        prelude::*,
        quantity::price::PoundsPerMegawattHour,
    };

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, hour, minute, 0).unwrap()
    }

    fn row(level_fpn: f64, level_after_boal: f64, cost: Option<f64>) -> ReconciledRow {
        let delta = Megawatts::from(level_fpn - level_after_boal);
        ReconciledRow {
            time: at(10, 0),
            level_fpn: Megawatts::from(level_fpn),
            level_boal: Some(Megawatts::from(level_after_boal)),
            level_after_boal: Megawatts::from(level_after_boal),
            delta,
            pricing: cost.map(|cost| Pricing {
                bid_price: PoundsPerMegawattHour::from(f64::NAN),
                energy: MegawattHours::ZERO,
                cost: Pounds::from(cost),
            }),
        }
    }

    #[test]
    fn test_curtailed_energy() -> Result {
        let notifications = [RampSegment::new(
            at(10, 0),
            Megawatts::from(100.0),
            at(10, 59),
            Megawatts::from(100.0),
        )];
        let acceptances = [RampSegment::new(
            at(10, 20),
            Megawatts::from(60.0),
            at(10, 29),
            Megawatts::from(60.0),
        )
        .with_meta(Acceptance { id: AcceptId(1), accepted_at: at(9, 0) })];
        let metrics = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .build()
            .reconcile()?
            .metrics();
        assert_abs_diff_eq!(metrics.curtailed_energy.0, 400.0 / 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(metrics.notified_energy.0, 100.0, epsilon = 1e-9);
        assert_eq!(metrics.curtailment_cost, None);
        Ok(())
    }

    #[test]
    fn test_notified_energy_over_day() {
        let start = at(0, 0);
        let rows: Vec<_> = (0..1440)
            .map(|minute| ReconciledRow {
                time: start + TimeDelta::minutes(minute),
                ..row(100.0, 100.0, None)
            })
            .collect();
        assert_abs_diff_eq!(notified_energy(&rows).0, 2400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curtailed_energy(&rows).0, 0.0);
    }

    #[test]
    fn test_curtailment_cost() {
        let rows = [
            row(100.0, 60.0, Some(500.0)),
            row(100.0, 60.0, None),
            row(100.0, 80.0, Some(250.0)),
        ];
        assert_eq!(curtailment_cost(&rows), Some(Pounds::from(750.0)));
        assert_eq!(curtailment_cost(&rows[1..2]), None);
    }

    #[test]
    fn test_nan_propagates() {
        let rows = [row(100.0, 60.0, None), row(f64::NAN, 60.0, None)];
        assert!(curtailed_energy(&rows).is_nan());
        assert!(notified_energy(&rows).is_nan());
    }

    #[test]
    fn test_nan_level_reaches_metrics() -> Result {
        let notifications =
            [RampSegment::new(at(10, 0), Megawatts::NAN, at(10, 10), Megawatts::from(100.0))];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&[])
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 11);
        assert_eq!(frame[0].time, at(10, 0));
        assert!(frame[0].level_fpn.is_nan());
        assert!(frame[0].delta.is_nan());
        let metrics = frame.metrics();
        assert!(metrics.notified_energy.is_nan());
        assert!(metrics.curtailed_energy.is_nan());
        Ok(())
    }

    #[test]
    fn test_add() {
        let priced = Metrics {
            notified_energy: MegawattHours::from(10.0),
            curtailed_energy: MegawattHours::from(2.0),
            curtailment_cost: Some(Pounds::from(100.0)),
        };
        let unpriced = Metrics {
            notified_energy: MegawattHours::from(5.0),
            curtailed_energy: MegawattHours::from(1.0),
            curtailment_cost: None,
        };
        let total = priced + unpriced + Metrics::default();
        assert_abs_diff_eq!(total.notified_energy.0, 15.0);
        assert_abs_diff_eq!(total.curtailed_energy.0, 3.0);
        assert_eq!(total.curtailment_cost, Some(Pounds::from(100.0)));
        assert_eq!((unpriced + unpriced).curtailment_cost, None);
    }
}
