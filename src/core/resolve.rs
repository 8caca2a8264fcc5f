use itertools::Itertools;

use crate::{
    core::{
        segment::{Acceptance, PointSample},
        series::{
            Series,
            resample::{Resampler, Upsample},
        },
    },
    error::DataShapeError,
    prelude::*,
    quantity::power::Megawatts,
};

/// Acceptance levels sharing the same acceptance number.
#[must_use]
pub struct CommitmentBatch {
    pub acceptance: Acceptance,

    /// Sorted by time, segment starts first at identical timestamps.
    points: Vec<PointSample<Acceptance>>,
}

impl CommitmentBatch {
    /// Partition the points by acceptance number and order the batches by authority:
    /// a later batch overrides an earlier one.
    ///
    /// Batches issued at the same time are ordered by acceptance number.
    pub fn partition(
        points: impl IntoIterator<Item = PointSample<Acceptance>>,
    ) -> Result<Vec<Self>, DataShapeError> {
        let mut batches = Vec::new();
        for (id, mut points) in points.into_iter().into_group_map_by(|point| point.meta.id) {
            let Some(acceptance) = points.first().map(|point| point.meta) else {
                continue;
            };
            if let Some(point) = points.iter().find(|point| point.meta != acceptance) {
                return Err(DataShapeError::InconsistentAcceptTime {
                    id,
                    first: acceptance.accepted_at,
                    second: point.meta.accepted_at,
                });
            }
            points.sort_by_key(|point| (point.time, point.endpoint));
            batches.push(Self { acceptance, points });
        }
        batches.sort_by_key(|batch| (batch.acceptance.accepted_at, batch.acceptance.id));
        Ok(batches)
    }

    /// Accepted levels at every minute between the earliest and the latest point of the batch.
    pub fn levels(&self) -> Series<Megawatts> {
        self.points.iter().map(|point| (point.time, point.level)).upsample(Resampler::DISPATCH)
    }
}

/// Resolve overlapping acceptance batches of a single unit into one level per minute.
///
/// For every minute, the batch with the latest accept time among those covering the minute wins.
/// Minutes not covered by any batch are absent.
#[instrument(skip_all)]
pub fn resolve(
    points: impl IntoIterator<Item = PointSample<Acceptance>>,
) -> Result<Series<Megawatts>, DataShapeError> {
    let batches = CommitmentBatch::partition(points)?;
    let resolved: Series<Megawatts> = batches.iter().flat_map(CommitmentBatch::levels).collect();
    debug!(
        n_batches = batches.len(),
        n_minutes = resolved.len(),
        span = ?resolved.span(),
        "resolved"
    );
    Ok(resolved)
}
