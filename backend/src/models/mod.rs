//! Domain models for the money simulator

pub mod account;
pub mod bank;
pub mod event;
pub mod firm;
pub mod government;
pub mod worker;

// Re-exports
pub use account::{Account, AccountCore, AccountError, AccountId, AccountRef, BankId, FirmId, Receipt, WorkerId};
pub use bank::Bank;
pub use event::{Event, EventLog};
pub use firm::{Firm, SurplusPlan};
pub use government::{Government, Spend};
pub use worker::Worker;
