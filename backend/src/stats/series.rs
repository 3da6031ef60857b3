//! Per-property time series and the snapshot of the latest period

use crate::stats::property::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values of one property, one point per recorded period
///
/// Min, max and sum are kept as running aggregates so summaries stay O(1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<(usize, f64)>,
    min: Option<f64>,
    max: Option<f64>,
    sum: f64,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, period: usize, value: f64) {
        self.points.push((period, value));
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        self.sum += value;
    }

    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Arithmetic mean; `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.sum / self.points.len() as f64)
        }
    }

    pub fn last(&self) -> Option<f64> {
        self.points.last().map(|(_, v)| *v)
    }

    pub fn value_at(&self, period: usize) -> Option<f64> {
        self.points
            .iter()
            .find(|(p, _)| *p == period)
            .map(|(_, v)| *v)
    }
}

/// Property values captured in one period
///
/// Conditional pages are evaluated against the snapshot of the most recent
/// period; before the first capture it is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot(BTreeMap<Property, f64>);

impl PropertySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: Property) -> Option<f64> {
        self.0.get(&property).copied()
    }

    pub fn insert(&mut self, property: Property, value: f64) {
        self.0.insert(property, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }
}

impl FromIterator<(Property, f64)> for PropertySnapshot {
    fn from_iter<I: IntoIterator<Item = (Property, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Statistics store: one series per tracked property
///
/// # Example
/// ```
/// use econ_sim_core::stats::{Property, PropertySnapshot, StatsStore};
///
/// let mut store = StatsStore::new(vec![Property::Period, Property::GovBal]);
/// store.record(1, [(Property::Period, 1.0), (Property::GovBal, -150.0)].into_iter().collect());
/// store.record(2, [(Property::Period, 2.0), (Property::GovBal, -300.0)].into_iter().collect());
///
/// let gov = store.series(Property::GovBal).unwrap();
/// assert_eq!(gov.min(), Some(-300.0));
/// assert_eq!(gov.mean(), Some(-225.0));
/// assert_eq!(store.latest().get(Property::GovBal), Some(-300.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsStore {
    order: Vec<Property>,
    series: BTreeMap<Property, TimeSeries>,
    latest: PropertySnapshot,
    periods_recorded: usize,
}

impl StatsStore {
    pub fn new(order: Vec<Property>) -> Self {
        let series = order.iter().map(|p| (*p, TimeSeries::new())).collect();
        Self {
            order,
            series,
            latest: PropertySnapshot::new(),
            periods_recorded: 0,
        }
    }

    /// Tracked properties in capture order
    pub fn order(&self) -> &[Property] {
        &self.order
    }

    /// Append a period's snapshot; untracked properties are ignored
    pub fn record(&mut self, period: usize, snapshot: PropertySnapshot) {
        for (property, value) in snapshot.iter() {
            if let Some(series) = self.series.get_mut(&property) {
                series.push(period, value);
            }
        }
        self.latest = snapshot;
        self.periods_recorded += 1;
    }

    pub fn series(&self, property: Property) -> Option<&TimeSeries> {
        self.series.get(&property)
    }

    pub fn latest(&self) -> &PropertySnapshot {
        &self.latest
    }

    pub fn periods_recorded(&self) -> usize {
        self.periods_recorded
    }

    /// Replace the latest snapshot without recording a period
    pub(crate) fn restore_latest(&mut self, snapshot: PropertySnapshot) {
        self.latest = snapshot;
    }
}
