//! Checkpoint - Capture and Restore Economy State
//!
//! A snapshot holds every account, the clock, the random stream position and
//! the statistics of the last captured period, which is all a resumed run
//! needs to continue bit-identically. Time series history is not included.
//!
//! # Critical Invariants
//!
//! - **Determinism**: restoring a snapshot and stepping reproduces the
//!   original run
//! - **Money Conservation**: all balances sum to zero
//! - **Employment Integrity**: every employer exists; the state-supported
//!   firm is `FirmId(0)` and unique
//! - **Config Matching**: state can only be restored with matching config

use crate::core::time::PeriodClock;
use crate::models::account::{Account, FirmId};
use crate::models::bank::Bank;
use crate::models::event::EventLog;
use crate::models::firm::Firm;
use crate::models::government::Government;
use crate::models::worker::Worker;
use crate::orchestrator::engine::{Economy, EconomyConfig, SimulationError};
use crate::rng::RngManager;
use crate::stats::{PropertySnapshot, StatsStore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete economy state at a period boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub period: usize,
    pub start_period: usize,

    /// Seed the run started from
    pub seed: u64,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    pub government: Government,
    pub banks: Vec<Bank>,
    pub firms: Vec<Firm>,
    pub workers: Vec<Worker>,

    /// Properties captured at the end of `period`
    pub latest_stats: PropertySnapshot,

    /// SHA256 hash of original config (for validation)
    pub config_hash: String,
}

impl EconomySnapshot {
    pub fn total_balance(&self) -> i64 {
        self.government.balance()
            + self.banks.iter().map(|b| b.balance()).sum::<i64>()
            + self.firms.iter().map(|f| f.balance()).sum::<i64>()
            + self.workers.iter().map(|w| w.balance()).sum::<i64>()
    }
}

impl Economy {
    /// Capture the current state
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            period: self.clock.current_period(),
            start_period: self.clock.start_period(),
            seed: self.seed,
            rng_state: self.rng.get_state(),
            government: self.government.clone(),
            banks: self.banks.clone(),
            firms: self.firms.clone(),
            workers: self.workers.clone(),
            latest_stats: self.stats.latest().clone(),
            config_hash: self.config_hash.clone(),
        }
    }

    /// Rebuild an economy from a snapshot taken under the same config
    pub fn from_snapshot(
        config: EconomyConfig,
        snapshot: EconomySnapshot,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let config_hash = compute_config_hash(&config)?;
        if config_hash != snapshot.config_hash {
            return Err(SimulationError::InvalidConfig(
                "snapshot was taken under a different configuration".to_string(),
            ));
        }
        validate_snapshot(&snapshot)?;

        let mut clock = PeriodClock::new(snapshot.start_period);
        while clock.current_period() < snapshot.period {
            clock.advance_period();
        }

        let unemployed = snapshot
            .workers
            .iter()
            .filter(|w| w.is_unemployed())
            .map(|w| w.index().0)
            .collect();

        let next_account_id = std::iter::once(snapshot.government.id())
            .chain(snapshot.banks.iter().map(|b| b.id()))
            .chain(snapshot.firms.iter().map(|f| f.id()))
            .chain(snapshot.workers.iter().map(|w| w.id()))
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or(1);

        let mut stats = StatsStore::new(config.tracked.clone());
        stats.restore_latest(snapshot.latest_stats);
        let params = config.model.resolve(stats.latest());

        Ok(Economy {
            config_hash,
            seed: snapshot.seed,
            params,
            clock,
            rng: RngManager::new(snapshot.rng_state),
            government: snapshot.government,
            banks: snapshot.banks,
            firms: snapshot.firms,
            workers: snapshot.workers,
            unemployed,
            next_account_id,
            stats,
            events: EventLog::new(),
            config,
        })
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - Money conservation (balances sum to zero)
/// - Exactly one state-supported firm, at index 0
/// - Every employer refers to an existing firm
/// - Indices match positions
pub fn validate_snapshot(snapshot: &EconomySnapshot) -> Result<(), SimulationError> {
    let violation = |message: String| SimulationError::InvariantViolation {
        period: snapshot.period,
        message,
    };

    // 1. Money conservation
    let total = snapshot.total_balance();
    if total != 0 {
        return Err(violation(format!(
            "Money conservation violated: balances sum to {}",
            total
        )));
    }

    // 2. State-supported firm
    let state_firms: Vec<FirmId> = snapshot
        .firms
        .iter()
        .filter(|f| f.is_state_supported())
        .map(|f| f.index())
        .collect();
    if state_firms != vec![FirmId(0)] || snapshot.government.state_firm() != FirmId(0) {
        return Err(violation(format!(
            "Expected a single state-supported firm at index 0, found {:?}",
            state_firms
        )));
    }

    // 3. Index integrity
    for (i, firm) in snapshot.firms.iter().enumerate() {
        if firm.index().0 != i {
            return Err(violation(format!("Firm at position {} has index {}", i, firm.index().0)));
        }
        if firm.bank().0 >= snapshot.banks.len() {
            return Err(violation(format!("Firm {} banks with missing bank {}", i, firm.bank().0)));
        }
    }

    // 4. Employment integrity
    for (i, worker) in snapshot.workers.iter().enumerate() {
        if worker.index().0 != i {
            return Err(violation(format!("Worker at position {} has index {}", i, worker.index().0)));
        }
        if let Some(employer) = worker.employer() {
            if employer.0 >= snapshot.firms.len() {
                return Err(violation(format!(
                    "Worker {} employed by missing firm {}",
                    i, employer.0
                )));
            }
        }
    }

    Ok(())
}
