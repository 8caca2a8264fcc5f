use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{core::reconcile::ReconciledRow, quantity::power::Megawatts};

/// Persisted curtailment row.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurtailmentRecord {
    pub time: DateTime<Utc>,
    pub level_fpn: Megawatts,
    pub level_boal: Option<Megawatts>,
    pub level_after_boal: Megawatts,
    pub delta_mw: Megawatts,
}

impl From<&ReconciledRow> for CurtailmentRecord {
    fn from(row: &ReconciledRow) -> Self {
        Self {
            time: row.time,
            level_fpn: row.level_fpn,
            level_boal: row.level_boal,
            level_after_boal: row.level_after_boal,
            delta_mw: row.delta,
        }
    }
}
