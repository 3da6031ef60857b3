//! Economy Engine
//!
//! The container that owns every account of one closed economy and drives
//! it one period at a time.
//!
//! # Architecture
//!
//! ```text
//! For each period p:
//! 1. Advance the clock
//! 2. Init: reset per-period accumulators, resolve parameters against the
//!    statistics captured at the end of p-1, refresh loan interest rates
//! 3. Trigger: Government, Banks, Firms (index order), Workers
//! 4. Epilogue: Firms, then Workers
//! 5. Capture every tracked property in dependency order
//! 6. Exogenous step: maybe start a new firm
//! ```
//!
//! Money moves only through the ledger primitives in `ledger.rs`, so the sum
//! of all balances is zero at every period boundary.
//!
//! # Example
//!
//! ```rust
//! use econ_sim_core::{Economy, EconomyConfig};
//!
//! let mut config = EconomyConfig::default();
//! config.controls.population = 100;
//! config.controls.government_employees = 20;
//! config.controls.startups = 3;
//!
//! let mut economy = Economy::new(config).unwrap();
//! for _ in 0..5 {
//!     let result = economy.step().unwrap();
//!     println!("period {}: {} employed", result.period, result.num_employed);
//! }
//! assert_eq!(economy.total_balance(), 0);
//! ```

use crate::core::time::PeriodClock;
use crate::models::account::{Account, AccountRef, BankId, FirmId, WorkerId};
use crate::models::bank::Bank;
use crate::models::event::{Event, EventLog};
use crate::models::firm::Firm;
use crate::models::government::Government;
use crate::models::worker::Worker;
use crate::models::AccountId;
use crate::orchestrator::checkpoint::compute_config_hash;
use crate::params::{ConfigError, ModelConfig, Parameters, RunControls};
use crate::rng::RngManager;
use crate::stats::{validate_order, Property, PropertySnapshot, StatsStore, DEFAULT_ORDER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete configuration of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Behavioural parameters and their conditional pages
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub controls: RunControls,

    /// Properties captured each period, in capture order
    #[serde(default = "default_tracked")]
    pub tracked: Vec<Property>,
}

fn default_tracked() -> Vec<Property> {
    DEFAULT_ORDER.to_vec()
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            controls: RunControls::default(),
            tracked: default_tracked(),
        }
    }
}

impl EconomyConfig {
    pub fn new(model: ModelConfig, controls: RunControls) -> Self {
        Self {
            model,
            controls,
            tracked: default_tracked(),
        }
    }

    /// Structural validation, run once by [`Economy::new`]
    pub fn validate(&self) -> Result<(), SimulationError> {
        let c = &self.controls;

        if c.population == 0 {
            return Err(SimulationError::InvalidConfig(
                "population must be > 0".to_string(),
            ));
        }

        if c.standard_wage <= 0 {
            return Err(SimulationError::InvalidConfig(
                "standard_wage must be > 0".to_string(),
            ));
        }

        if c.banks == 0 {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one bank".to_string(),
            ));
        }

        if c.government_employees > c.population {
            return Err(SimulationError::InvalidConfig(format!(
                "government_employees ({}) exceeds population ({})",
                c.government_employees, c.population
            )));
        }

        self.model.validate()?;
        validate_order(&self.tracked)?;
        self.model.check_tracked(&self.tracked)?;

        Ok(())
    }
}

// ============================================================================
// Results and Errors
// ============================================================================

/// Result of a single period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodResult {
    pub period: usize,
    pub num_employed: usize,
    pub num_firms: usize,
    pub num_hired: usize,
    pub num_fired: usize,
    pub government_balance: i64,
    pub firm_created: Option<FirmId>,
    /// Every tracked property captured at the end of the period
    pub snapshot: PropertySnapshot,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub seed: u64,
    pub config_hash: String,
    pub periods_run: usize,
    pub final_period: usize,
    pub gini: Option<f64>,
    pub productivity: Option<f64>,
}

/// Simulation errors
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Accounting or state invariant broken; the run must stop
    #[error("Invariant violated in period {period}: {message}")]
    InvariantViolation { period: usize, message: String },

    /// Account id out of range
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Economy
// ============================================================================

/// One closed economy
pub struct Economy {
    pub(crate) config: EconomyConfig,
    pub(crate) config_hash: String,
    pub(crate) seed: u64,
    pub(crate) params: Parameters,
    pub(crate) clock: PeriodClock,
    pub(crate) rng: RngManager,

    pub(crate) government: Government,
    pub(crate) banks: Vec<Bank>,
    pub(crate) firms: Vec<Firm>,
    pub(crate) workers: Vec<Worker>,

    /// Indices of workers without an employer, lowest first
    pub(crate) unemployed: BTreeSet<usize>,

    pub(crate) next_account_id: u64,
    pub(crate) stats: StatsStore,
    pub(crate) events: EventLog,
}

impl Economy {
    /// Build an economy at `controls.start_period`
    ///
    /// Creates the government, the banks, the state-supported firm
    /// (`FirmId(0)`) and the start-up firms, then staffs the state firm.
    pub fn new(config: EconomyConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let config_hash = compute_config_hash(&config)?;
        let seed = config.controls.seed.resolve();
        let params = config.model.resolve(&PropertySnapshot::new());
        let start = config.controls.start_period;

        let mut economy = Self {
            government: Government::new(AccountId(0), FirmId(0)),
            banks: Vec::with_capacity(config.controls.banks),
            firms: Vec::new(),
            workers: Vec::with_capacity(config.controls.population),
            unemployed: BTreeSet::new(),
            next_account_id: 1,
            stats: StatsStore::new(config.tracked.clone()),
            events: EventLog::new(),
            clock: PeriodClock::new(start),
            rng: RngManager::new(seed),
            params,
            seed,
            config_hash,
            config,
        };

        for b in 0..economy.config.controls.banks {
            let id = economy.allocate_account_id();
            economy.banks.push(Bank::new(id, BankId(b)));
        }

        economy.open_firm(true);
        for _ in 0..economy.config.controls.startups {
            economy.open_firm(false);
        }

        let state_firm = economy.government.state_firm();
        let staffed =
            economy.hire_some(state_firm, economy.config.controls.government_employees, start)?;

        info!(
            seed = economy.seed,
            population = economy.config.controls.population,
            firms = economy.firms.len(),
            banks = economy.banks.len(),
            government_employees = staffed,
            start_period = start,
            "economy constructed"
        );

        Ok(economy)
    }

    pub(crate) fn allocate_account_id(&mut self) -> AccountId {
        let id = AccountId(self.next_account_id);
        self.next_account_id += 1;
        id
    }

    /// Add a firm without logging; `create_firm` is the public entry point
    pub(crate) fn open_firm(&mut self, state_supported: bool) -> FirmId {
        let index = FirmId(self.firms.len());
        let bank = BankId(self.firms.len() % self.banks.len());
        let id = self.allocate_account_id();
        let mut firm = Firm::new(id, index, state_supported, bank);
        if !state_supported {
            firm.core_mut().set_interest_rate(self.params.bus_interest);
        }
        self.firms.push(firm);
        self.events.log(Event::FirmCreated {
            period: self.clock.current_period(),
            firm: index,
            state_supported,
        });
        index
    }

    /// Start a new ordinary firm with no balance and no employees
    pub fn create_firm(&mut self) -> FirmId {
        let firm = self.open_firm(false);
        debug!(period = self.clock.current_period(), firm = firm.0, "firm created");
        firm
    }

    // ========================================================================
    // Period Driver
    // ========================================================================

    /// Execute one period
    pub fn step(&mut self) -> Result<PeriodResult, SimulationError> {
        // STEP 1: ADVANCE THE CLOCK
        let period = self.clock.advance_period();

        // STEP 2: INIT
        self.begin_period();

        // STEP 3: TRIGGER
        self.trigger_government(period)?;
        for b in 0..self.banks.len() {
            self.trigger_bank(BankId(b), period)?;
        }
        for f in 0..self.firms.len() {
            self.trigger_firm(FirmId(f), period)?;
        }
        for w in 0..self.workers.len() {
            self.trigger_worker(WorkerId(w), period)?;
        }

        // STEP 4: EPILOGUE
        for f in 0..self.firms.len() {
            self.firm_epilogue(FirmId(f), period)?;
        }
        for w in 0..self.workers.len() {
            self.worker_epilogue(WorkerId(w), period)?;
        }

        // STEP 5: STATISTICS
        let snapshot = self.capture_statistics(period)?;

        // STEP 6: EXOGENOUS FIRM CREATION
        let firm_created = if self.rng.chance(self.params.firm_creation_prob) {
            Some(self.create_firm())
        } else {
            None
        };

        let result = PeriodResult {
            period,
            num_employed: self.num_employed(),
            num_firms: self.firms.len(),
            num_hired: self.firms.iter().map(|f| f.num_hired()).sum(),
            num_fired: self.firms.iter().map(|f| f.num_fired()).sum(),
            government_balance: self.government.balance(),
            firm_created,
            snapshot,
        };

        debug!(
            period,
            employed = result.num_employed,
            firms = result.num_firms,
            hired = result.num_hired,
            fired = result.num_fired,
            gov_balance = result.government_balance,
            "period complete"
        );

        Ok(result)
    }

    /// Execute `n` periods, stopping at the first error
    pub fn run_periods(&mut self, n: usize) -> Result<Vec<PeriodResult>, SimulationError> {
        (0..n).map(|_| self.step()).collect()
    }

    /// Execute `controls.iterations` periods and summarise the run
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        let iterations = self.config.controls.iterations;
        let before = self.stats.periods_recorded();
        for _ in 0..iterations {
            self.step()?;
        }
        let summary = self.summary(self.stats.periods_recorded() - before);
        info!(
            run_id = %summary.run_id,
            seed = summary.seed,
            periods = summary.periods_run,
            final_period = summary.final_period,
            "run complete"
        );
        Ok(summary)
    }

    fn summary(&self, periods_run: usize) -> RunSummary {
        let latest = self.stats.latest();
        RunSummary {
            run_id: Uuid::new_v4(),
            seed: self.seed,
            config_hash: self.config_hash.clone(),
            periods_run,
            final_period: self.clock.current_period(),
            gini: latest.get(Property::Gini),
            productivity: latest.get(Property::Productivity),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Seed the random stream was started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Parameters in force for the current period
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn current_period(&self) -> usize {
        self.clock.current_period()
    }

    pub fn clock(&self) -> &PeriodClock {
        &self.clock
    }

    pub fn government(&self) -> &Government {
        &self.government
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn bank(&self, bank: BankId) -> Option<&Bank> {
        self.banks.get(bank.0)
    }

    pub fn firms(&self) -> &[Firm] {
        &self.firms
    }

    pub fn firm(&self, firm: FirmId) -> Option<&Firm> {
        self.firms.get(firm.0)
    }

    /// Mutable firm access for scripted setups
    ///
    /// Changing a balance directly bypasses the ledger.
    pub fn firm_mut(&mut self, firm: FirmId) -> Option<&mut Firm> {
        self.firms.get_mut(firm.0)
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker(&self, worker: WorkerId) -> Option<&Worker> {
        self.workers.get(worker.0)
    }

    /// Mutable worker access for scripted setups
    pub fn worker_mut(&mut self, worker: WorkerId) -> Option<&mut Worker> {
        self.workers.get_mut(worker.0)
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn num_employed(&self) -> usize {
        self.workers.len() - self.unemployed.len()
    }

    pub fn num_unemployed(&self) -> usize {
        self.unemployed.len()
    }

    /// Current employees of a firm, in worker index order
    pub fn employees_of(&self, firm: FirmId) -> Vec<WorkerId> {
        self.workers
            .iter()
            .filter(|w| w.is_employed_by(firm))
            .map(|w| w.index())
            .collect()
    }

    /// Sum of every balance in the economy; zero unless the ledger was bypassed
    pub fn total_balance(&self) -> i64 {
        self.government.balance()
            + self.banks.iter().map(|b| b.balance()).sum::<i64>()
            + self.firms.iter().map(|f| f.balance()).sum::<i64>()
            + self.workers.iter().map(|w| w.balance()).sum::<i64>()
    }

    pub(crate) fn account(&self, account: AccountRef) -> Result<&dyn Account, SimulationError> {
        let found: Option<&dyn Account> = match account {
            AccountRef::Government => Some(&self.government),
            AccountRef::Bank(BankId(i)) => self.banks.get(i).map(|b| b as &dyn Account),
            AccountRef::Firm(FirmId(i)) => self.firms.get(i).map(|f| f as &dyn Account),
            AccountRef::Worker(WorkerId(i)) => self.workers.get(i).map(|w| w as &dyn Account),
        };
        found.ok_or_else(|| SimulationError::UnknownAccount(account.to_string()))
    }

    pub(crate) fn account_mut(
        &mut self,
        account: AccountRef,
    ) -> Result<&mut dyn Account, SimulationError> {
        let found: Option<&mut dyn Account> = match account {
            AccountRef::Government => Some(&mut self.government),
            AccountRef::Bank(BankId(i)) => self.banks.get_mut(i).map(|b| b as &mut dyn Account),
            AccountRef::Firm(FirmId(i)) => self.firms.get_mut(i).map(|f| f as &mut dyn Account),
            AccountRef::Worker(WorkerId(i)) => {
                self.workers.get_mut(i).map(|w| w as &mut dyn Account)
            }
        };
        found.ok_or_else(|| SimulationError::UnknownAccount(account.to_string()))
    }

    pub(crate) fn invariant(&self, message: impl Into<String>) -> SimulationError {
        SimulationError::InvariantViolation {
            period: self.clock.current_period(),
            message: message.into(),
        }
    }
}
