//! Account ledger primitive
//!
//! Every participant in the economy (workers, firms, the government, banks)
//! holds an [`AccountCore`]: identity, balance, loan position and the
//! per-period trigger guard. Variant-specific state lives in the variant
//! structs, which expose the shared core through the [`Account`] trait.
//!
//! CRITICAL: All money values are i64 currency units. Only the government
//! may overdraw through a transfer it initiates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique, monotonically assigned account identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

/// Index of a firm within its economy (`FirmId(0)` is the government firm)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FirmId(pub usize);

/// Index of a worker within its economy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub usize);

/// Index of a bank within its economy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BankId(pub usize);

/// Address of an account inside an economy
///
/// Used both as a transfer endpoint and as the payer attribution passed to
/// [`Account::credit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRef {
    Government,
    Bank(BankId),
    Firm(FirmId),
    Worker(WorkerId),
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRef::Government => write!(f, "government"),
            AccountRef::Bank(BankId(i)) => write!(f, "bank#{}", i),
            AccountRef::Firm(FirmId(i)) => write!(f, "firm#{}", i),
            AccountRef::Worker(WorkerId(i)) => write!(f, "worker#{}", i),
        }
    }
}

/// Errors raised by account operations
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("{account} cannot classify a credit of {amount} from {payer}")]
    UnclassifiedCredit {
        account: AccountRef,
        payer: String,
        amount: i64,
    },

    #[error("Negative amount {0} is not a valid transfer")]
    NegativeAmount(i64),
}

/// How an incoming payment was classified by the receiving account
///
/// The container uses the classification to apply the variant's side
/// effects (income tax on wages, sales tax on sales).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Wage or bonus from the worker's employer
    Wage,
    /// Unemployment benefit from the government
    Benefit,
    /// Gross-of-tax sales receipts
    Sale,
    /// Bank loan proceeds
    Loan,
    /// Government funding that is not a purchase
    Support,
    /// Government income (taxes, deductions, interest)
    Revenue,
    /// Plain bookkeeping with no side effect
    Deposit,
}

/// State shared by every account variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCore {
    id: AccountId,

    /// Current balance (i64 units); negative only for the government or an
    /// overextended bank
    balance: i64,

    /// Interest rate charged on `amount_owed`, percent per period
    interest_rate: f64,

    /// Outstanding bank borrowing, including capitalised interest
    amount_owed: i64,

    /// Last period this account was triggered
    last_triggered: Option<usize>,

    /// Last period this account ran its epilogue
    #[serde(default)]
    last_epilogue: Option<usize>,
}

impl AccountCore {
    /// Create an empty account
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::account::{AccountCore, AccountId};
    ///
    /// let core = AccountCore::new(AccountId(1));
    /// assert_eq!(core.balance(), 0);
    /// assert_eq!(core.amount_owed(), 0);
    /// ```
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balance: 0,
            interest_rate: 0.0,
            amount_owed: 0,
            last_triggered: None,
            last_epilogue: None,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn set_interest_rate(&mut self, rate_pct: f64) {
        self.interest_rate = rate_pct;
    }

    pub fn amount_owed(&self) -> i64 {
        self.amount_owed
    }

    pub fn last_triggered(&self) -> Option<usize> {
        self.last_triggered
    }

    /// Check whether `amount` can be paid out of the current balance
    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    /// Withdraw funds, refusing to go negative
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::account::{AccountCore, AccountId};
    ///
    /// let mut core = AccountCore::new(AccountId(1));
    /// core.deposit(100);
    /// assert!(core.withdraw(150).is_err());
    /// assert_eq!(core.balance(), 100); // unchanged
    /// core.withdraw(60).unwrap();
    /// assert_eq!(core.balance(), 40);
    /// ```
    pub fn withdraw(&mut self, amount: i64) -> Result<(), AccountError> {
        if amount < 0 {
            return Err(AccountError::NegativeAmount(amount));
        }
        if !self.can_afford(amount) {
            return Err(AccountError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Withdraw without a funds check (money creation / uninsured lending)
    pub(crate) fn overdraw(&mut self, amount: i64) {
        self.balance -= amount;
    }

    /// Add funds
    pub fn deposit(&mut self, amount: i64) {
        self.balance += amount;
    }

    /// Record new borrowing (or capitalised interest)
    pub fn add_debt(&mut self, amount: i64) {
        self.amount_owed += amount;
    }

    /// Interest due this period on the outstanding loan
    pub fn interest_due(&self) -> i64 {
        crate::core::money::percent_of(self.amount_owed, self.interest_rate)
    }

    /// Per-period trigger guard
    ///
    /// Returns `true` (and records the period) only the first time a period
    /// later than the last triggered one is seen.
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::account::{AccountCore, AccountId};
    ///
    /// let mut core = AccountCore::new(AccountId(1));
    /// assert!(core.begin_period(1));
    /// assert!(!core.begin_period(1)); // already triggered
    /// assert!(!core.begin_period(0)); // stale
    /// assert!(core.begin_period(2));
    /// ```
    pub fn begin_period(&mut self, period: usize) -> bool {
        match self.last_triggered {
            Some(last) if period <= last => false,
            _ => {
                self.last_triggered = Some(period);
                true
            }
        }
    }

    /// Per-period epilogue guard, same contract as [`Self::begin_period`]
    pub fn begin_epilogue(&mut self, period: usize) -> bool {
        match self.last_epilogue {
            Some(last) if period <= last => false,
            _ => {
                self.last_epilogue = Some(period);
                true
            }
        }
    }

    /// Overwrite the balance
    ///
    /// Bypasses the ledger; intended for restoring state and for scripted
    /// test setups. Breaks conservation if used mid-run.
    pub fn set_balance(&mut self, balance: i64) {
        self.balance = balance;
    }
}

/// Capability interface shared by all account variants
pub trait Account {
    fn core(&self) -> &AccountCore;

    fn core_mut(&mut self) -> &mut AccountCore;

    fn id(&self) -> AccountId {
        self.core().id()
    }

    fn balance(&self) -> i64 {
        self.core().balance()
    }

    /// Whether a transfer initiated by this account may overdraw it
    fn may_overdraw(&self) -> bool {
        false
    }

    /// Book an incoming payment and classify it
    ///
    /// `payer` attributes the payment; `force` asks a firm to treat a
    /// government payment as a purchase. Implementations add the amount to
    /// the balance and update their own accumulators; cross-account side
    /// effects are applied by the container based on the returned
    /// [`Receipt`].
    fn credit(
        &mut self,
        amount: i64,
        payer: Option<AccountRef>,
        force: bool,
    ) -> Result<Receipt, AccountError>;

    /// Per-period trigger guard, see [`AccountCore::begin_period`]
    fn begin_trigger(&mut self, period: usize) -> bool {
        self.core_mut().begin_period(period)
    }

    fn begin_epilogue(&mut self, period: usize) -> bool {
        self.core_mut().begin_epilogue(period)
    }
}

pub(crate) fn describe_payer(payer: Option<AccountRef>) -> String {
    match payer {
        Some(account) => account.to_string(),
        None => "nobody".to_string(),
    }
}
