pub mod resample;

use std::{collections::BTreeMap, ops::RangeInclusive};

use chrono::{DateTime, Utc};

/// Time series: `(key, value)` pairs strictly increasing by key.
#[derive(Clone, Debug, PartialEq, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
#[must_use]
pub struct Series<V, K = DateTime<Utc>>(Vec<(K, V)>);

impl<V, K> Default for Series<V, K> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V, K: Ord> FromIterator<(K, V)> for Series<V, K> {
    /// Collect the points ordering them by key.
    ///
    /// When a key repeats, the value encountered last wins.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().collect::<BTreeMap<_, _>>().into_iter().collect())
    }
}

impl<V, K> Series<V, K> {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V, K: Copy> Series<V, K> {
    /// First and last key, if any.
    #[must_use]
    pub fn span(&self) -> Option<RangeInclusive<K>> {
        let (first, _) = self.0.first()?;
        let (last, _) = self.0.last()?;
        Some(*first..=*last)
    }
}

impl<V, K: Ord> Series<V, K> {
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.binary_search_by(|(probe, _)| probe.cmp(key)).ok().map(|index| &self.0[index].1)
    }

    /// Left-join the other series by key: every key of `self` is kept,
    /// the right value is present only where the other series has the same key.
    pub fn left_join<'a, W>(
        &'a self,
        other: &'a Series<W, K>,
    ) -> impl Iterator<Item = (&'a K, &'a V, Option<&'a W>)> {
        let mut right = other.0.iter().peekable();
        self.0.iter().map(move |(key, value)| {
            while right.next_if(|(right_key, _)| right_key < key).is_some() {}
            let matched = right.next_if(|(right_key, _)| right_key == key).map(|(_, value)| value);
            (key, value, matched)
        })
    }
}
