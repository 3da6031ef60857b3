//! Event log for auditing labour-market and credit activity.
//!
//! The statistics store captures aggregates; the event log keeps the
//! individual decisions behind them so a run can be inspected after the
//! fact (who was fired in which period, which loans were granted, when a
//! firm's interest was capitalised).
//!
//! # Example
//!
//! ```rust
//! use econ_sim_core::models::{Event, EventLog, FirmId, WorkerId};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Hired { period: 3, worker: WorkerId(0), firm: FirmId(1), wage: 100 });
//! assert_eq!(log.events_at_period(3).len(), 1);
//! assert_eq!(log.events_of_type("Hired").len(), 1);
//! ```

use crate::models::account::{BankId, FirmId, WorkerId};

/// Simulation event capturing a state change.
///
/// Events are logged in the order they occur within a period.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A firm was created (at construction or by the exogenous step)
    FirmCreated {
        period: usize,
        firm: FirmId,
        state_supported: bool,
    },

    /// A worker account was created to fill a vacancy
    WorkerCreated { period: usize, worker: WorkerId },

    Hired {
        period: usize,
        worker: WorkerId,
        firm: FirmId,
        wage: i64,
    },

    /// Employment ended, either scripted or for lack of wage funds
    Fired {
        period: usize,
        worker: WorkerId,
        firm: FirmId,
        for_funds: bool,
    },

    LoanGranted {
        period: usize,
        firm: FirmId,
        bank: BankId,
        amount: i64,
    },

    /// Interest exceeded the firm's balance and was added to the loan
    InterestDeferred {
        period: usize,
        firm: FirmId,
        amount: i64,
    },

    /// Surplus spent on another firm's output, raising productivity
    CapitalPurchase {
        period: usize,
        buyer: FirmId,
        seller: FirmId,
        amount: i64,
        productivity: f64,
    },
}

impl Event {
    /// Get the period this event occurred in
    pub fn period(&self) -> usize {
        match self {
            Event::FirmCreated { period, .. }
            | Event::WorkerCreated { period, .. }
            | Event::Hired { period, .. }
            | Event::Fired { period, .. }
            | Event::LoanGranted { period, .. }
            | Event::InterestDeferred { period, .. }
            | Event::CapitalPurchase { period, .. } => *period,
        }
    }

    /// Get event type name as string
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::FirmCreated { .. } => "FirmCreated",
            Event::WorkerCreated { .. } => "WorkerCreated",
            Event::Hired { .. } => "Hired",
            Event::Fired { .. } => "Fired",
            Event::LoanGranted { .. } => "LoanGranted",
            Event::InterestDeferred { .. } => "InterestDeferred",
            Event::CapitalPurchase { .. } => "CapitalPurchase",
        }
    }

    /// Get firm if the event concerns one
    pub fn firm(&self) -> Option<FirmId> {
        match self {
            Event::FirmCreated { firm, .. }
            | Event::Hired { firm, .. }
            | Event::Fired { firm, .. }
            | Event::LoanGranted { firm, .. }
            | Event::InterestDeferred { firm, .. } => Some(*firm),
            Event::CapitalPurchase { buyer, .. } => Some(*buyer),
            Event::WorkerCreated { .. } => None,
        }
    }

    /// Get worker if the event concerns one
    pub fn worker(&self) -> Option<WorkerId> {
        match self {
            Event::WorkerCreated { worker, .. }
            | Event::Hired { worker, .. }
            | Event::Fired { worker, .. } => Some(*worker),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific period
    pub fn events_at_period(&self, period: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.period() == period).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific firm
    pub fn events_for_firm(&self, firm: FirmId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.firm() == Some(firm)).collect()
    }

    /// Get events for a specific worker
    pub fn events_for_worker(&self, worker: WorkerId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.worker() == Some(worker))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
