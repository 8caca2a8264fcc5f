use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;

use crate::{
    core::{
        minute::{ONE_MINUTE, floor_minute},
        series::Series,
    },
    quantity::power::Megawatts,
};

/// How the observations falling into the same minute are combined.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Aggregation {
    /// Keep the earliest observation.
    First,

    /// Average the observations.
    Mean,
}

impl Aggregation {
    fn apply(self, mut levels: impl Iterator<Item = Megawatts>) -> Option<Megawatts> {
        match self {
            Self::First => levels.next(),
            Self::Mean => {
                let (sum, count) = levels.fold((Megawatts::ZERO, 0_u32), |(sum, count), level| {
                    (sum + level, count + 1)
                });
                (count != 0).then(|| sum / f64::from(count))
            }
        }
    }
}

/// How the minutes without an observation are filled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Fill {
    /// Hold the previous level until the next observation.
    Forward,

    /// Ramp linearly between the neighbouring observations.
    Linear,
}

impl Fill {
    #[expect(clippy::cast_precision_loss)]
    fn apply(self, from: Megawatts, to: Megawatts, step: i64, n_steps: i64) -> Megawatts {
        match self {
            Self::Forward => from,
            Self::Linear => from + (to - from) * (step as f64 / n_steps as f64),
        }
    }
}

/// Minute resampling strategy of a signal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Resampler {
    pub aggregation: Aggregation,
    pub fill: Fill,
}

impl Resampler {
    /// Accepted levels hold until an acceptance changes them.
    pub const DISPATCH: Self = Self { aggregation: Aggregation::First, fill: Fill::Forward };

    /// Notified levels ramp linearly between the declared points.
    pub const NOTIFICATION: Self = Self { aggregation: Aggregation::Mean, fill: Fill::Linear };
}

impl<T> Upsample for T where T: ?Sized {}

pub trait Upsample {
    /// Resample the samples onto the one-minute grid spanning the earliest and the latest sample.
    ///
    /// The samples are stably sorted by time, so the caller's order decides which sample is
    /// the first one within a minute. NaN levels do not contribute to a minute's aggregate:
    /// a minute with only NaN levels is filled like an empty one, except that the minutes
    /// before the first defined level stay NaN. The last defined level holds until the end.
    fn upsample(self, resampler: Resampler) -> Series<Megawatts>
    where
        Self: Sized + IntoIterator<Item = (DateTime<Utc>, Megawatts)>,
    {
        let mut samples = self.into_iter().collect_vec();
        samples.sort_by_key(|(time, _)| *time);

        let bins = samples
            .into_iter()
            .chunk_by(|(time, _)| floor_minute(*time))
            .into_iter()
            .map(|(minute, bin)| {
                let levels = bin.map(|(_, level)| level).filter(|level| !level.is_nan());
                (minute, resampler.aggregation.apply(levels))
            })
            .collect_vec();
        let (Some(&(start, _)), Some(&(end, _))) = (bins.first(), bins.last()) else {
            return Series::default();
        };
        let observed = bins
            .into_iter()
            .filter_map(|(minute, level)| level.map(|level| (minute, level)))
            .collect_vec();

        let mut points = Vec::new();
        let first_defined = observed.first().map_or(end + ONE_MINUTE, |(minute, _)| *minute);
        let mut minute = start;
        while minute < first_defined {
            points.push((minute, Megawatts::NAN));
            minute += ONE_MINUTE;
        }
        for ((from_minute, from_level), (to_minute, to_level)) in
            observed.iter().copied().tuple_windows()
        {
            points.push((from_minute, from_level));
            let n_steps = (to_minute - from_minute).num_minutes();
            for step in 1..n_steps {
                points.push((
                    from_minute + TimeDelta::minutes(step),
                    resampler.fill.apply(from_level, to_level, step, n_steps),
                ));
            }
        }
        if let Some(&(mut minute, level)) = observed.last() {
            while minute <= end {
                points.push((minute, level));
                minute += ONE_MINUTE;
            }
        }
        Series(points)
    }
}
