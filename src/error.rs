use chrono::{DateTime, Utc};

use crate::core::segment::AcceptId;

/// Input that does not have the shape of ramp segments, acceptances or prices.
#[derive(Debug, thiserror::Error)]
pub enum DataShapeError {
    #[error("missing column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("line {line}: unparseable number in `{column}`: {value:?}")]
    UnparseableNumber { line: u64, column: &'static str, value: String },

    #[error("line {line}: unparseable timestamp in `{column}`: {value:?}")]
    UnparseableTime { line: u64, column: &'static str, value: String },

    #[error("line {line}: unparseable identifier in `{column}`: {value:?}")]
    UnparseableIdentifier { line: u64, column: &'static str, value: String },

    #[error("acceptance {id} is issued both at {first} and at {second}")]
    InconsistentAcceptTime { id: AcceptId, first: DateTime<Utc>, second: DateTime<Utc> },

    #[error("malformed row")]
    Csv(#[from] csv::Error),
}
