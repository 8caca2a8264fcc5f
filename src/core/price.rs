use chrono::{DateTime, Utc};

use crate::quantity::price::PoundsPerMegawattHour;

/// Bid-offer pair number: negative for bids, positive for offers.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
)]
pub struct PairNumber(pub i32);

impl PairNumber {
    /// The pair whose price governs the curtailment cost.
    pub const GOVERNING: Self = Self(1);
}

/// Accepted bid price of a unit at a settlement period start.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BidOfferPrice {
    pub time: DateTime<Utc>,
    pub pair_number: PairNumber,
    pub bid_price: PoundsPerMegawattHour,
}
