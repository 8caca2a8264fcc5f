use chrono::{DateTime, TimeDelta, Timelike, Utc};

pub const ONE_MINUTE: TimeDelta = TimeDelta::minutes(1);

/// Standard market accounting interval.
pub const SETTLEMENT_PERIOD: TimeDelta = TimeDelta::minutes(30);

/// Truncate the timestamp to the start of its minute.
#[must_use]
pub fn floor_minute(time: DateTime<Utc>) -> DateTime<Utc> {
    time - TimeDelta::seconds(i64::from(time.second()))
        - TimeDelta::nanoseconds(i64::from(time.nanosecond()))
}
