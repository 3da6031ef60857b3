//! Statistics: tracked properties, their time series, inequality measures

pub mod inequality;
pub mod property;
pub mod series;

pub use inequality::{aggregate_productivity, gini};
pub use property::{validate_order, Property, DEFAULT_ORDER};
pub use series::{PropertySnapshot, StatsStore, TimeSeries};
