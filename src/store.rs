use serde::Serialize;
use tracing::debug;

use crate::error::LayoutError;

/// A finite, non-negative weight. Circle area is proportional to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Result<Self, LayoutError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(LayoutError::InvalidWeight(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = LayoutError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u64> for Weight {
    fn from(value: u64) -> Self {
        Self(value as f64)
    }
}

/// Input record for [`ResultStore::add_series`], before a series index is assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct Weighted<P> {
    pub weight: Weight,
    pub payload: P,
}

impl<P> Weighted<P> {
    pub fn new(weight: Weight, payload: P) -> Self {
        Self { weight, payload }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item<P> {
    weight: Weight,
    series_index: usize,
    payload: P,
}

impl<P> Item<P> {
    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn series_index(&self) -> usize {
        self.series_index
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series<P> {
    pub label: String,
    pub items: Vec<Item<P>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry<'a> {
    pub color_index: usize,
    pub label: &'a str,
}

/// Bounds applied by [`ResultStore::set_cap`].
///
/// Requests above `ceiling` are pinned to it; requests at or below zero fall
/// back to `fallback`, which is also the initial cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapPolicy {
    pub ceiling: usize,
    pub fallback: usize,
}

impl Default for CapPolicy {
    fn default() -> Self {
        Self {
            ceiling: 100,
            fallback: 5,
        }
    }
}

impl CapPolicy {
    pub fn clamp(self, requested: i64) -> usize {
        if requested <= 0 {
            return self.fallback.min(self.ceiling);
        }

        usize::try_from(requested)
            .unwrap_or(usize::MAX)
            .min(self.ceiling)
    }
}

/// Accumulates the result sets of successive queries.
///
/// Each series is tagged with its position at insertion time; the position is
/// never reassigned until [`ResultStore::clear`] resets the whole store.
#[derive(Clone, Debug)]
pub struct ResultStore<P> {
    series: Vec<Series<P>>,
    cap: usize,
    policy: CapPolicy,
}

impl<P> Default for ResultStore<P> {
    fn default() -> Self {
        Self::with_policy(CapPolicy::default())
    }
}

impl<P> ResultStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CapPolicy) -> Self {
        Self {
            series: Vec::new(),
            cap: policy.fallback.min(policy.ceiling),
            policy,
        }
    }

    pub fn add_series(
        &mut self,
        label: impl Into<String>,
        items: impl IntoIterator<Item = Weighted<P>>,
    ) -> usize {
        let series_index = self.series.len();
        let items = items
            .into_iter()
            .map(|entry| Item {
                weight: entry.weight,
                series_index,
                payload: entry.payload,
            })
            .collect::<Vec<_>>();
        let label = label.into();

        debug!(series_index, %label, items = items.len(), "added series");
        self.series.push(Series { label, items });
        series_index
    }

    pub fn clear(&mut self) {
        debug!(dropped = self.series.len(), "cleared result store");
        self.series.clear();
    }

    pub fn set_cap(&mut self, requested: i64) {
        self.cap = self.policy.clamp(requested);
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn policy(&self) -> CapPolicy {
        self.policy
    }

    /// Index the next added series will receive.
    pub fn next_index(&self) -> usize {
        self.series.len()
    }

    pub fn series(&self) -> &[Series<P>] {
        &self.series
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.series.iter().map(|series| series.items.len()).sum()
    }

    /// Capped items of every series, in series order, without cloning.
    pub fn capped_items(&self) -> impl Iterator<Item = &Item<P>> {
        let cap = self.cap;
        self.series
            .iter()
            .flat_map(move |series| series.items.iter().take(cap))
    }

    pub fn legend(&self) -> Vec<LegendEntry<'_>> {
        self.series
            .iter()
            .enumerate()
            .map(|(color_index, series)| LegendEntry {
                color_index,
                label: series.label.as_str(),
            })
            .collect()
    }
}

impl<P: Clone> ResultStore<P> {
    /// At most `cap` items from the front of each series, concatenated in
    /// series order. This is the order fed to the packer.
    pub fn flatten(&self) -> Vec<Item<P>> {
        self.capped_items().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(names: &[&'static str]) -> Vec<Weighted<&'static str>> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Weighted::new(Weight::from(index as u64 + 1), *name))
            .collect()
    }

    #[test]
    fn weight_rejects_negative_and_non_finite() {
        assert_eq!(Weight::new(-1.0), Err(LayoutError::InvalidWeight(-1.0)));
        assert!(Weight::new(f64::NAN).is_err());
        assert!(Weight::new(f64::INFINITY).is_err());
        assert_eq!(Weight::new(0.0).map(Weight::get), Ok(0.0));
    }

    #[test]
    fn add_series_tags_items_with_position() {
        let mut store = ResultStore::new();
        assert_eq!(store.add_series("rust", entries(&["a", "b"])), 0);
        assert_eq!(store.add_series("go", entries(&["c"])), 1);

        let indices = store
            .series()
            .iter()
            .flat_map(|series| series.items.iter().map(Item::series_index))
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![0, 0, 1]);
        assert_eq!(store.next_index(), store.series().len());
    }

    #[test]
    fn empty_series_still_takes_a_legend_slot() {
        let mut store = ResultStore::<&str>::new();
        store.add_series("nothing", Vec::new());
        store.add_series("rust", entries(&["a"]));

        assert_eq!(
            store.legend(),
            vec![
                LegendEntry {
                    color_index: 0,
                    label: "nothing"
                },
                LegendEntry {
                    color_index: 1,
                    label: "rust"
                },
            ]
        );
        assert_eq!(store.flatten().len(), 1);
        assert_eq!(store.flatten()[0].series_index(), 1);
    }

    #[test]
    fn flatten_takes_front_of_each_series() {
        let mut store = ResultStore::new();
        store.add_series("first", entries(&["a", "b", "c", "d", "e"]));
        store.add_series("second", entries(&["f"]));
        store.set_cap(2);

        let flat = store
            .flatten()
            .into_iter()
            .map(|item| (*item.payload(), item.series_index()))
            .collect::<Vec<_>>();
        assert_eq!(flat, vec![("a", 0), ("b", 0), ("f", 1)]);
    }

    #[test]
    fn cap_changes_do_not_touch_stored_items() {
        let mut store = ResultStore::new();
        store.add_series("first", entries(&["a", "b", "c"]));
        store.set_cap(1);
        assert_eq!(store.flatten().len(), 1);
        assert_eq!(store.total_items(), 3);
        store.set_cap(3);
        assert_eq!(store.flatten().len(), 3);
    }

    #[test]
    fn clear_resets_index_counter() {
        let mut store = ResultStore::new();
        store.add_series("a", entries(&["x"]));
        store.add_series("b", entries(&["y"]));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.next_index(), 0);
        assert_eq!(store.add_series("x", entries(&["z"])), 0);
        assert_eq!(store.flatten()[0].series_index(), 0);
    }

    #[test]
    fn set_cap_clamps_instead_of_failing() {
        let mut store = ResultStore::<()>::new();
        assert_eq!(store.cap(), 5);

        store.set_cap(500);
        assert_eq!(store.cap(), 100);
        store.set_cap(-3);
        assert_eq!(store.cap(), 5);
        store.set_cap(0);
        assert_eq!(store.cap(), 5);
        store.set_cap(1);
        assert_eq!(store.cap(), 1);
        store.set_cap(i64::MAX);
        assert_eq!(store.cap(), 100);
    }

    #[test]
    fn custom_policy_bounds_are_honoured() {
        let mut store = ResultStore::<()>::with_policy(CapPolicy {
            ceiling: 10,
            fallback: 3,
        });
        assert_eq!(store.cap(), 3);
        store.set_cap(11);
        assert_eq!(store.cap(), 10);
        store.set_cap(-1);
        assert_eq!(store.cap(), 3);
    }
}
