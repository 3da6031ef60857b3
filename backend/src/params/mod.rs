//! Parameters: keys, models with conditional pages, the model registry
//!
//! # Flow
//!
//! ```text
//! SettingsPage (strings) --bind--> ModelConfig --resolve(snapshot)--> Parameters
//! ```
//!
//! Binding happens once, before a run. Resolution happens at the start of
//! every period against the statistics captured at the end of the previous
//! one.

pub mod condition;
pub mod model;
pub mod registry;
pub mod types;

pub use condition::{Condition, Operator};
pub use model::{
    ConditionalPage, ConfigError, ConfigWarning, ModelConfig, SettingsCondition, SettingsPage,
    ALWAYS,
};
pub use registry::{ModelRegistry, SettingsFile};
pub use types::{ParamKey, Parameters, RunControls};
