use crate::core::segment::{Endpoint, PointSample, RampSegment};

impl<M: Clone> RampSegment<M> {
    /// Split the segment into its start and end points.
    pub fn endpoints(self) -> [PointSample<M>; 2] {
        [
            PointSample {
                time: self.time_from,
                level: self.level_from,
                endpoint: Endpoint::Start,
                meta: self.meta.clone(),
            },
            PointSample {
                time: self.time_to,
                level: self.level_to,
                endpoint: Endpoint::End,
                meta: self.meta,
            },
        ]
    }
}

impl<T> Linearize for T where T: ?Sized {}

pub trait Linearize {
    /// Convert the from-to ramp segments into the point samples, two per segment.
    ///
    /// The output is not ordered by time.
    fn linearize<M>(self) -> impl Iterator<Item = PointSample<M>>
    where
        Self: Sized + IntoIterator<Item = RampSegment<M>>,
        M: Clone,
    {
        self.into_iter().flat_map(RampSegment::endpoints)
    }
}
