//! Government account
//!
//! The single money-issuing account. Its transfers skip the funds check, so
//! every unit it pays out beyond its receipts is new money.

use crate::models::account::{Account, AccountCore, AccountError, AccountId, AccountRef, FirmId, Receipt};
use serde::{Deserialize, Serialize};

/// Purpose of a government payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spend {
    /// Unemployment benefit
    Benefit,
    /// Purchase of firm output
    Procurement,
    /// On-demand funding of the state-supported firm
    Support,
}

/// The government of one economy
///
/// # Example
/// ```
/// use econ_sim_core::models::{Account, AccountId, FirmId, Government, Spend};
///
/// let mut gov = Government::new(AccountId(0), FirmId(0));
/// gov.record_spend(Spend::Benefit, 60);
/// gov.record_spend(Spend::Support, 100);
/// assert_eq!(gov.expenditure(), 160);
/// assert_eq!(gov.unbudgeted_expenditure(), 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Government {
    core: AccountCore,

    /// The state-supported firm this government owns
    state_firm: FirmId,

    // Per-period accumulators
    expenditure: i64,
    unbudgeted_expenditure: i64,
    benefits_paid: i64,
    procurement_expenditure: i64,
    receipts: i64,
}

impl Government {
    pub fn new(id: AccountId, state_firm: FirmId) -> Self {
        Self {
            core: AccountCore::new(id),
            state_firm,
            expenditure: 0,
            unbudgeted_expenditure: 0,
            benefits_paid: 0,
            procurement_expenditure: 0,
            receipts: 0,
        }
    }

    pub fn state_firm(&self) -> FirmId {
        self.state_firm
    }

    pub fn expenditure(&self) -> i64 {
        self.expenditure
    }

    pub fn unbudgeted_expenditure(&self) -> i64 {
        self.unbudgeted_expenditure
    }

    pub fn benefits_paid(&self) -> i64 {
        self.benefits_paid
    }

    pub fn procurement_expenditure(&self) -> i64 {
        self.procurement_expenditure
    }

    pub fn receipts(&self) -> i64 {
        self.receipts
    }

    pub fn reset_period(&mut self) {
        self.expenditure = 0;
        self.unbudgeted_expenditure = 0;
        self.benefits_paid = 0;
        self.procurement_expenditure = 0;
        self.receipts = 0;
    }

    pub fn record_spend(&mut self, spend: Spend, amount: i64) {
        self.expenditure += amount;
        match spend {
            Spend::Benefit => self.benefits_paid += amount,
            Spend::Procurement => self.procurement_expenditure += amount,
            Spend::Support => self.unbudgeted_expenditure += amount,
        }
    }
}

impl Account for Government {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }

    fn may_overdraw(&self) -> bool {
        true
    }

    fn credit(
        &mut self,
        amount: i64,
        _payer: Option<AccountRef>,
        _force: bool,
    ) -> Result<Receipt, AccountError> {
        self.core.deposit(amount);
        self.receipts += amount;
        Ok(Receipt::Revenue)
    }
}
