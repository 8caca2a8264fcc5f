use std::{collections::BTreeMap, ops::Deref};

use bon::Builder;
use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    core::{
        linearize::Linearize,
        minute::SETTLEMENT_PERIOD,
        price::{BidOfferPrice, PairNumber},
        resolve::resolve,
        segment::{Acceptance, RampSegment},
        series::{
            Series,
            resample::{Resampler, Upsample},
        },
    },
    error::DataShapeError,
    prelude::*,
    quantity::{
        cost::Pounds,
        energy::MegawattHours,
        power::Megawatts,
        price::PoundsPerMegawattHour,
        time::Hours,
    },
};

/// Reconciles the notified and the accepted levels of a single unit.
#[derive(Builder)]
#[must_use]
pub struct UnitReconciler<'a> {
    notifications: &'a [RampSegment],
    acceptances: &'a [RampSegment<Acceptance>],

    /// Accepted prices, if pricing is wanted at all.
    prices: Option<&'a [BidOfferPrice]>,

    /// Sample interval of the priced rows.
    #[builder(default = SETTLEMENT_PERIOD)]
    energy_interval: TimeDelta,
}

impl UnitReconciler<'_> {
    #[instrument(
        skip_all,
        fields(n_notifications = self.notifications.len(), n_acceptances = self.acceptances.len())
    )]
    pub fn reconcile(self) -> Result<ReconciledFrame, DataShapeError> {
        let dispatch = resolve(self.acceptances.iter().cloned().linearize())?;
        let notified = self
            .notifications
            .iter()
            .cloned()
            .linearize()
            .map(|point| (point.time, point.level))
            .upsample(Resampler::NOTIFICATION);
        let prices = self.prices.and_then(governing_prices);
        let energy_interval = Hours::from(self.energy_interval);

        let rows: Vec<_> = notified
            .left_join(&dispatch)
            .map(|(time, level_fpn, level_boal)| {
                let level_after_boal = level_boal.copied().unwrap_or(*level_fpn);
                let delta = *level_fpn - level_after_boal;
                let pricing = prices
                    .as_ref()
                    .and_then(|prices| prices.get(time))
                    .map(|bid_price| Pricing::new(*bid_price, delta * energy_interval));
                ReconciledRow {
                    time: *time,
                    level_fpn: *level_fpn,
                    level_boal: level_boal.copied(),
                    level_after_boal,
                    delta,
                    pricing,
                }
            })
            .collect();
        let frame = ReconciledFrame(rows);
        debug!(
            n_rows = frame.len(),
            n_dispatch_minutes = dispatch.len(),
            is_priced = frame.is_priced(),
            "reconciled"
        );
        Ok(frame)
    }
}

/// Prices of the governing pair, or `None` if there are none.
///
/// When the pair has more than one price at the same time, the last one is used.
fn governing_prices(prices: &[BidOfferPrice]) -> Option<Series<PoundsPerMegawattHour>> {
    let mut governing = BTreeMap::new();
    for price in prices.iter().filter(|price| price.pair_number == PairNumber::GOVERNING) {
        if let Some(replaced) = governing.insert(price.time, price.bid_price)
            && replaced != price.bid_price
        {
            warn!(
                time = %price.time,
                %replaced,
                bid_price = %price.bid_price,
                "conflicting governing prices, using the last one"
            );
        }
    }
    if governing.is_empty() {
        warn!("no prices for the governing pair, the unit is treated as unpriced");
        None
    } else {
        Some(governing.into_iter().collect())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pricing {
    pub bid_price: PoundsPerMegawattHour,
    pub energy: MegawattHours,

    /// Positive when the unit is paid for reducing its output.
    pub cost: Pounds,
}

impl Pricing {
    pub fn new(bid_price: PoundsPerMegawattHour, energy: MegawattHours) -> Self {
        Self { bid_price, energy, cost: -(energy * bid_price) }
    }
}

/// Reconciled levels of a unit at a minute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReconciledRow {
    pub time: DateTime<Utc>,
    pub level_fpn: Megawatts,

    /// Resolved accepted level, if any acceptance covers the minute.
    pub level_boal: Option<Megawatts>,

    pub level_after_boal: Megawatts,

    /// Curtailed power, positive when the unit is held below its notified level.
    pub delta: Megawatts,

    pub pricing: Option<Pricing>,
}

/// Minute-by-minute reconciliation of a unit, one row per notified minute.
#[derive(Clone, Debug, Default, PartialEq, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
#[must_use]
pub struct ReconciledFrame(Vec<ReconciledRow>);

impl Deref for ReconciledFrame {
    type Target = [ReconciledRow];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ReconciledFrame {
    /// Keep only the rows with a price attached.
    pub fn into_priced(self) -> Self {
        Self(self.0.into_iter().filter(|row| row.pricing.is_some()).collect())
    }

    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.0.iter().any(|row| row.pricing.is_some())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;
    use crate::core::{minute::ONE_MINUTE, segment::AcceptId};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, hour, minute, 0).unwrap()
    }

    fn notified(from: DateTime<Utc>, to: DateTime<Utc>, level: f64) -> RampSegment {
        RampSegment::new(from, Megawatts::from(level), to, Megawatts::from(level))
    }

    fn accepted(from: DateTime<Utc>, to: DateTime<Utc>, level: f64) -> RampSegment<Acceptance> {
        notified(from, to, level)
            .with_meta(Acceptance { id: AcceptId(1), accepted_at: from - TimeDelta::hours(1) })
    }

    fn price(time: DateTime<Utc>, pair_number: i32, bid_price: f64) -> BidOfferPrice {
        BidOfferPrice {
            time,
            pair_number: PairNumber(pair_number),
            bid_price: PoundsPerMegawattHour::from(bid_price),
        }
    }

    #[test]
    fn test_curtailment_delta() -> Result {
        let notifications = [notified(at(10, 0), at(11, 0), 100.0)];
        let acceptances = [accepted(at(10, 20), at(10, 29), 60.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 61);
        assert_eq!(frame.iter().filter(|row| row.delta == Megawatts::from(40.0)).count(), 10);
        assert_eq!(frame.iter().filter(|row| row.delta == Megawatts::ZERO).count(), 51);
        assert_eq!(frame.iter().filter(|row| row.level_boal.is_some()).count(), 10);
        assert!(!frame.is_priced());
        Ok(())
    }

    #[test]
    fn test_without_acceptances() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&[])
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 31);
        assert!(frame.iter().all(|row| row.level_boal.is_none()));
        assert!(frame.iter().all(|row| row.level_after_boal == row.level_fpn));
        Ok(())
    }

    #[test]
    fn test_acceptance_outside_notifications_is_dropped() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let acceptances = [accepted(at(10, 25), at(10, 45), 0.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 31);
        assert_eq!(frame.iter().filter(|row| row.level_boal.is_some()).count(), 6);
        Ok(())
    }

    #[test]
    fn test_cost_over_settlement_period() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let acceptances = [accepted(at(10, 0), at(10, 30), 60.0)];
        let prices = [price(at(10, 0), 1, -50.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .prices(&prices)
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 31);
        let priced = frame.into_priced();
        assert_eq!(priced.len(), 1);
        let pricing = priced[0].pricing.unwrap();
        assert_abs_diff_eq!(pricing.energy.0, 20.0);
        assert_abs_diff_eq!(pricing.cost.0, 1000.0);
        Ok(())
    }

    #[test]
    fn test_cost_over_minutes() -> Result {
        let notifications = [notified(at(10, 0), at(10, 29), 100.0)];
        let acceptances = [accepted(at(10, 0), at(10, 29), 60.0)];
        let prices: Vec<_> = (0..30).map(|minute| price(at(10, minute), 1, -50.0)).collect();
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .prices(&prices)
            .energy_interval(ONE_MINUTE)
            .build()
            .reconcile()?
            .into_priced();
        assert_eq!(frame.len(), 30);
        let cost: Pounds =
            frame.iter().filter_map(|row| row.pricing).map(|pricing| pricing.cost).sum();
        assert_abs_diff_eq!(cost.0, 1000.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_only_governing_pair_is_priced() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let acceptances = [accepted(at(10, 0), at(10, 30), 60.0)];
        let prices = [price(at(10, 0), -1, -80.0), price(at(10, 30), -1, -80.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .prices(&prices)
            .build()
            .reconcile()?;
        assert_eq!(frame.len(), 31);
        assert!(!frame.is_priced());
        assert!(frame.into_priced().is_empty());
        Ok(())
    }

    #[test]
    fn test_unmatched_prices() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let acceptances = [accepted(at(10, 0), at(10, 30), 60.0)];
        let prices = [price(at(12, 0), 1, -50.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .prices(&prices)
            .build()
            .reconcile()?;
        assert!(frame.iter().all(|row| row.pricing.is_none()));
        Ok(())
    }

    #[test]
    fn test_empty() -> Result {
        let frame =
            UnitReconciler::builder().notifications(&[]).acceptances(&[]).build().reconcile()?;
        assert!(frame.is_empty());
        Ok(())
    }

    #[test]
    fn test_conflicting_governing_prices() -> Result {
        let notifications = [notified(at(10, 0), at(10, 30), 100.0)];
        let acceptances = [accepted(at(10, 0), at(10, 30), 60.0)];
        let prices = [price(at(10, 0), 1, -50.0), price(at(10, 0), 1, -80.0)];
        let frame = UnitReconciler::builder()
            .notifications(&notifications)
            .acceptances(&acceptances)
            .prices(&prices)
            .build()
            .reconcile()?
            .into_priced();
        assert_eq!(frame.len(), 1);
        assert_abs_diff_eq!(frame[0].pricing.unwrap().bid_price.0, -80.0);
        Ok(())
    }
}
