//! Bank account
//!
//! A minimal commercial bank. Lending is uninsured: the bank debits itself
//! by the amount lent with no reserve check, so its balance goes negative
//! as its loan book grows. A negative bank pays central-bank interest to
//! the government.

use crate::core::money::percent_of;
use crate::models::account::{Account, AccountCore, AccountError, AccountId, AccountRef, BankId, Receipt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    core: AccountCore,
    index: BankId,

    /// Principal lent since construction
    total_lent: i64,

    // Per-period accumulators
    loans_made: i64,
    interest_received: i64,
    central_interest_paid: i64,
}

impl Bank {
    pub fn new(id: AccountId, index: BankId) -> Self {
        Self {
            core: AccountCore::new(id),
            index,
            total_lent: 0,
            loans_made: 0,
            interest_received: 0,
            central_interest_paid: 0,
        }
    }

    pub fn index(&self) -> BankId {
        self.index
    }

    pub fn total_lent(&self) -> i64 {
        self.total_lent
    }

    pub fn loans_made(&self) -> i64 {
        self.loans_made
    }

    pub fn interest_received(&self) -> i64 {
        self.interest_received
    }

    pub fn central_interest_paid(&self) -> i64 {
        self.central_interest_paid
    }

    pub fn reset_period(&mut self) {
        self.loans_made = 0;
        self.interest_received = 0;
        self.central_interest_paid = 0;
    }

    /// Debit the bank for a new loan; the caller credits the borrower
    pub(crate) fn advance_loan(&mut self, amount: i64) {
        self.core.overdraw(amount);
        self.total_lent += amount;
        self.loans_made += amount;
    }

    /// Interest owed to the government on a negative balance
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::{Account, AccountId, Bank, BankId};
    ///
    /// let mut bank = Bank::new(AccountId(1), BankId(0));
    /// assert_eq!(bank.central_interest_due(1.0), 0);
    /// bank.core_mut().set_balance(-1_000);
    /// assert_eq!(bank.central_interest_due(1.0), 10);
    /// ```
    pub fn central_interest_due(&self, boe_interest_pct: f64) -> i64 {
        let balance = self.core.balance();
        if balance >= 0 {
            return 0;
        }
        percent_of(-balance, boe_interest_pct)
    }

    /// Debit central-bank interest; the caller credits the government
    pub(crate) fn pay_central_interest(&mut self, amount: i64) {
        self.core.overdraw(amount);
        self.central_interest_paid += amount;
    }
}

impl Account for Bank {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }

    fn credit(
        &mut self,
        amount: i64,
        _payer: Option<AccountRef>,
        _force: bool,
    ) -> Result<Receipt, AccountError> {
        self.core.deposit(amount);
        self.interest_received += amount;
        Ok(Receipt::Deposit)
    }
}
