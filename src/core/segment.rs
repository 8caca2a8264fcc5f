use chrono::{DateTime, Utc};

use crate::quantity::power::Megawatts;

/// Balancing mechanism unit identifier, for example `T_WHILW-1`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, derive_more::Display, derive_more::From)]
pub struct UnitId(pub String);

impl From<&str> for UnitId {
    fn from(unit_id: &str) -> Self {
        Self(unit_id.to_owned())
    }
}

/// Bid-offer acceptance number.
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
pub struct AcceptId(pub u64);

/// Commitment batch identity: which acceptance the level belongs to and when it was issued.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Acceptance {
    pub id: AcceptId,
    pub accepted_at: DateTime<Utc>,
}

/// Linear transition of a unit's output level.
///
/// The metadata is carried through to every point the segment produces:
/// nothing for physical notifications, [`Acceptance`] for acceptance levels.
#[derive(Clone, Debug, PartialEq)]
pub struct RampSegment<M = ()> {
    pub time_from: DateTime<Utc>,
    pub level_from: Megawatts,
    pub time_to: DateTime<Utc>,
    pub level_to: Megawatts,
    pub meta: M,
}

impl RampSegment {
    pub const fn new(
        time_from: DateTime<Utc>,
        level_from: Megawatts,
        time_to: DateTime<Utc>,
        level_to: Megawatts,
    ) -> Self {
        Self { time_from, level_from, time_to, level_to, meta: () }
    }
}

impl<M> RampSegment<M> {
    pub fn with_meta<N>(self, meta: N) -> RampSegment<N> {
        RampSegment {
            time_from: self.time_from,
            level_from: self.level_from,
            time_to: self.time_to,
            level_to: self.level_to,
            meta,
        }
    }
}

/// Which end of a ramp segment a point comes from.
///
/// At identical timestamps, a segment start precedes a segment end.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Endpoint {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointSample<M = ()> {
    pub time: DateTime<Utc>,
    pub level: Megawatts,
    pub endpoint: Endpoint,
    pub meta: M,
}
