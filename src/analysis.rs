use std::collections::BTreeMap;

use chrono::TimeDelta;
use itertools::Itertools;

use crate::{
    core::{
        metrics::Metrics,
        price::BidOfferPrice,
        reconcile::{ReconciledFrame, UnitReconciler},
        record::CurtailmentRecord,
        segment::{Acceptance, RampSegment, UnitId},
    },
    io::csv::{UnitPrice, UnitSegment},
    prelude::*,
};

#[must_use]
pub struct UnitAnalysis {
    pub unit: UnitId,
    pub frame: ReconciledFrame,
    pub metrics: Metrics,
}

impl UnitAnalysis {
    /// Output rows of the unit: every notified minute, or only the minutes with a price attached.
    pub fn into_records(self, priced_only: bool) -> impl Iterator<Item = CurtailmentRecord> {
        let frame = if priced_only { self.frame.into_priced() } else { self.frame };
        frame.into_iter().map(|row| CurtailmentRecord::from(&row))
    }
}

/// Reconcile every unit that has physical notifications, ordered by unit.
///
/// Units without acceptances get an empty dispatch. When prices are given,
/// units without prices are reconciled as unpriced.
#[instrument(skip_all)]
pub fn analyze_units(
    notifications: Vec<UnitSegment>,
    acceptances: Vec<UnitSegment<Acceptance>>,
    prices: Option<Vec<UnitPrice>>,
    energy_interval: TimeDelta,
) -> Result<Vec<UnitAnalysis>> {
    let notifications = group_by_unit(
        notifications.into_iter().map(|UnitSegment { unit, segment }| (unit, segment)),
    );
    let acceptances = group_by_unit(
        acceptances.into_iter().map(|UnitSegment { unit, segment }| (unit, segment)),
    );
    let prices = prices.map(|prices| {
        group_by_unit(prices.into_iter().map(|UnitPrice { unit, price }| (unit, price)))
    });

    for unit in acceptances.keys().filter(|unit| !notifications.contains_key(*unit)) {
        warn!(%unit, "ignoring acceptances of a unit without notifications");
    }
    for unit in
        prices.iter().flat_map(BTreeMap::keys).filter(|unit| !notifications.contains_key(*unit))
    {
        warn!(%unit, "ignoring prices of a unit without notifications");
    }

    notifications
        .iter()
        .map(|(unit, notifications)| {
            analyze_unit(
                unit,
                notifications,
                acceptances.get(unit).map(Vec::as_slice).unwrap_or_default(),
                prices
                    .as_ref()
                    .map(|prices| prices.get(unit).map(Vec::as_slice).unwrap_or_default()),
                energy_interval,
            )
        })
        .collect()
}

#[instrument(skip_all, fields(unit = %unit))]
fn analyze_unit(
    unit: &UnitId,
    notifications: &[RampSegment],
    acceptances: &[RampSegment<Acceptance>],
    prices: Option<&[BidOfferPrice]>,
    energy_interval: TimeDelta,
) -> Result<UnitAnalysis> {
    let frame = UnitReconciler::builder()
        .notifications(notifications)
        .acceptances(acceptances)
        .maybe_prices(prices)
        .energy_interval(energy_interval)
        .build()
        .reconcile()
        .with_context(|| format!("failed to reconcile `{unit}`"))?;
    let metrics = frame.metrics();
    info!(
        n_minutes = frame.len(),
        notified_energy = %metrics.notified_energy,
        curtailed_energy = %metrics.curtailed_energy,
        curtailment_cost = ?metrics.curtailment_cost,
        "analyzed"
    );
    Ok(UnitAnalysis { unit: unit.clone(), frame, metrics })
}

fn group_by_unit<T>(items: impl IntoIterator<Item = (UnitId, T)>) -> BTreeMap<UnitId, Vec<T>> {
    items.into_iter().into_group_map().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::{
        core::{minute::SETTLEMENT_PERIOD, price::PairNumber, segment::AcceptId},
        quantity::power::Megawatts,
    };

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, hour, minute, 0).unwrap()
    }

    fn flat(unit: &str, from: DateTime<Utc>, to: DateTime<Utc>, level: f64) -> UnitSegment {
        UnitSegment {
            unit: UnitId::from(unit),
            segment: RampSegment::new(from, Megawatts::from(level), to, Megawatts::from(level)),
        }
    }

    fn accepted(
        unit: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        level: f64,
    ) -> UnitSegment<Acceptance> {
        let UnitSegment { unit, segment } = flat(unit, from, to, level);
        let acceptance = Acceptance { id: AcceptId(1), accepted_at: at(9, 0) };
        UnitSegment { unit, segment: segment.with_meta(acceptance) }
    }

    #[test]
    fn test_analyze_units() -> Result {
        let analyses = analyze_units(
            vec![flat("B", at(10, 0), at(10, 59), 100.0), flat("A", at(10, 0), at(10, 29), 50.0)],
            vec![
                accepted("B", at(10, 0), at(10, 29), 60.0),
                accepted("C", at(10, 0), at(10, 5), 0.0),
            ],
            Some(vec![UnitPrice {
                unit: UnitId::from("B"),
                price: BidOfferPrice {
                    time: at(10, 0),
                    pair_number: PairNumber::GOVERNING,
                    bid_price: (-50.0).into(),
                },
            }]),
            SETTLEMENT_PERIOD,
        )?;
        assert_eq!(
            analyses.iter().map(|analysis| analysis.unit.0.as_str()).collect_vec(),
            ["A", "B"],
        );

        let (a, b) = (&analyses[0].metrics, &analyses[1].metrics);
        assert_abs_diff_eq!(a.curtailed_energy.0, 0.0);
        assert_eq!(a.curtailment_cost, None);
        assert_abs_diff_eq!(b.curtailed_energy.0, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.curtailment_cost.unwrap().0, 1000.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_inconsistent_acceptance_aborts() {
        let mut late = accepted("A", at(10, 10), at(10, 20), 0.0);
        late.segment.meta.accepted_at = at(9, 30);
        let result = analyze_units(
            vec![flat("A", at(10, 0), at(10, 59), 100.0)],
            vec![accepted("A", at(10, 0), at(10, 10), 0.0), late],
            None,
            SETTLEMENT_PERIOD,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_records() -> Result {
        let analyze = || {
            analyze_units(
                vec![flat("A", at(10, 0), at(10, 59), 100.0)],
                vec![accepted("A", at(10, 0), at(10, 59), 60.0)],
                Some(vec![
                    UnitPrice {
                        unit: UnitId::from("A"),
                        price: BidOfferPrice {
                            time: at(10, 0),
                            pair_number: PairNumber::GOVERNING,
                            bid_price: (-50.0).into(),
                        },
                    },
                    UnitPrice {
                        unit: UnitId::from("A"),
                        price: BidOfferPrice {
                            time: at(10, 30),
                            pair_number: PairNumber::GOVERNING,
                            bid_price: (-40.0).into(),
                        },
                    },
                ]),
                SETTLEMENT_PERIOD,
            )
        };

        let all = analyze()?.into_iter().flat_map(|analysis| analysis.into_records(false));
        assert_eq!(all.count(), 60);

        let priced = analyze()?
            .into_iter()
            .flat_map(|analysis| analysis.into_records(true))
            .map(|record| record.time)
            .collect_vec();
        assert_eq!(priced, [at(10, 0), at(10, 30)]);
        Ok(())
    }
}
