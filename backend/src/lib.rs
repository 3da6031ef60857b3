//! Money Simulator Core - Rust Engine
//!
//! Closed-economy agent-based simulator with deterministic execution.
//! Workers, firms, a money-issuing government and banks trade, borrow and
//! pay taxes one discrete period at a time.
//!
//! # Architecture
//!
//! - **core**: Period clock and integer money arithmetic
//! - **models**: Account variants (Worker, Firm, Government, Bank) and events
//! - **params**: Parameter keys, models with conditional pages, registry
//! - **stats**: Tracked properties, time series, Gini
//! - **orchestrator**: The economy container and its period loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 currency units
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Money only moves between accounts; all balances sum to zero

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod rng;
pub mod stats;

// Re-exports for convenience
pub use crate::core::time::PeriodClock;
pub use models::{
    Account, AccountRef, Bank, BankId, Event, EventLog, Firm, FirmId, Government, Worker, WorkerId,
};
pub use orchestrator::{
    Economy, EconomyConfig, EconomySnapshot, PeriodResult, RunSummary, SimulationError,
};
pub use params::{ConfigError, ModelConfig, ModelRegistry, ParamKey, Parameters, RunControls};
pub use rng::{RngManager, RngSeed};
pub use stats::{Property, PropertySnapshot, StatsStore};
