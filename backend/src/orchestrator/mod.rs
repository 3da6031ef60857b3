//! Orchestrator - the economy container and its period loop
//!
//! `engine.rs` holds the container and the period driver; the behaviour it
//! drives is split by concern:
//!
//! - `ledger.rs`: transfers, loans, government spending
//! - `labour.rs`: payroll, hiring, firing
//! - `phases.rs`: per-variant triggers and epilogues, statistics capture
//! - `checkpoint.rs`: snapshots and config hashing

pub mod checkpoint;
pub mod engine;
pub mod labour;
pub mod ledger;
pub mod phases;

// Re-export main types for convenience
pub use engine::{Economy, EconomyConfig, PeriodResult, RunSummary, SimulationError};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, EconomySnapshot};
