//! Worker account
//!
//! A worker earns wages (and bonuses) from at most one employer, receives
//! unemployment benefit from the government while unemployed, and spends
//! part of its balance each period.

use crate::core::money::percent_of;
use crate::models::account::{
    describe_payer, Account, AccountCore, AccountError, AccountId, AccountRef, FirmId, Receipt,
    WorkerId,
};
use serde::{Deserialize, Serialize};

/// A member of the labour force
///
/// # Example
/// ```
/// use econ_sim_core::models::{Account, AccountId, FirmId, WorkerId, Worker};
///
/// let mut worker = Worker::new(AccountId(7), WorkerId(0));
/// assert!(worker.is_unemployed());
///
/// worker.employ(FirmId(2), 100, 0);
/// assert_eq!(worker.employer(), Some(FirmId(2)));
/// assert_eq!(worker.agreed_wage(), 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    core: AccountCore,
    index: WorkerId,

    employer: Option<FirmId>,
    agreed_wage: i64,
    period_hired: Option<usize>,
    period_fired: Option<usize>,

    // Per-period accumulators
    wages_received: i64,
    benefits_received: i64,
    purchases_made: i64,
    income_tax_paid: i64,

    /// Exponential rolling average of wages received
    average_wage: f64,
}

impl Worker {
    pub fn new(id: AccountId, index: WorkerId) -> Self {
        Self {
            core: AccountCore::new(id),
            index,
            employer: None,
            agreed_wage: 0,
            period_hired: None,
            period_fired: None,
            wages_received: 0,
            benefits_received: 0,
            purchases_made: 0,
            income_tax_paid: 0,
            average_wage: 0.0,
        }
    }

    pub fn index(&self) -> WorkerId {
        self.index
    }

    pub fn employer(&self) -> Option<FirmId> {
        self.employer
    }

    pub fn is_unemployed(&self) -> bool {
        self.employer.is_none()
    }

    pub fn is_employed_by(&self, firm: FirmId) -> bool {
        self.employer == Some(firm)
    }

    pub fn agreed_wage(&self) -> i64 {
        self.agreed_wage
    }

    pub fn period_hired(&self) -> Option<usize> {
        self.period_hired
    }

    pub fn period_fired(&self) -> Option<usize> {
        self.period_fired
    }

    pub fn wages_received(&self) -> i64 {
        self.wages_received
    }

    pub fn benefits_received(&self) -> i64 {
        self.benefits_received
    }

    pub fn purchases_made(&self) -> i64 {
        self.purchases_made
    }

    pub fn income_tax_paid(&self) -> i64 {
        self.income_tax_paid
    }

    pub fn average_wage(&self) -> f64 {
        self.average_wage
    }

    /// Take a job at `wage`
    pub fn employ(&mut self, firm: FirmId, wage: i64, period: usize) {
        self.employer = Some(firm);
        self.agreed_wage = wage;
        self.period_hired = Some(period);
    }

    /// Leave the current job, returning the former employer
    pub fn dismiss(&mut self, period: usize) -> Option<FirmId> {
        let former = self.employer.take();
        if former.is_some() {
            self.period_fired = Some(period);
        }
        former
    }

    /// Reset per-period accumulators
    pub fn reset_period(&mut self) {
        self.wages_received = 0;
        self.benefits_received = 0;
        self.purchases_made = 0;
        self.income_tax_paid = 0;
    }

    /// Amount this worker intends to spend this period
    ///
    /// Everything at or below `threshold` is spent; above it, the threshold
    /// plus `propensity_pct` of the excess.
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::{Account, AccountId, WorkerId, Worker};
    ///
    /// let mut worker = Worker::new(AccountId(1), WorkerId(0));
    /// worker.core_mut().set_balance(40);
    /// assert_eq!(worker.purchase_amount(50, 80.0), 40);
    ///
    /// worker.core_mut().set_balance(150);
    /// assert_eq!(worker.purchase_amount(50, 80.0), 50 + 80);
    /// ```
    pub fn purchase_amount(&self, threshold: i64, propensity_pct: f64) -> i64 {
        let balance = self.core.balance();
        if balance <= 0 {
            return 0;
        }
        if balance <= threshold {
            return balance;
        }
        let threshold = threshold.max(0);
        (threshold + percent_of(balance - threshold, propensity_pct)).min(balance)
    }

    /// Record a wage whose income tax was remitted
    pub fn record_wage(&mut self, gross: i64, income_tax: i64) {
        self.wages_received += gross;
        self.income_tax_paid += income_tax;
    }

    pub fn record_purchase(&mut self, amount: i64) {
        self.purchases_made += amount;
    }

    /// Fold this period's wages into the rolling average
    pub fn roll_average_wage(&mut self) {
        self.average_wage = (self.wages_received as f64 + self.average_wage) / 2.0;
    }
}

impl Account for Worker {
    fn core(&self) -> &AccountCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AccountCore {
        &mut self.core
    }

    fn credit(
        &mut self,
        amount: i64,
        payer: Option<AccountRef>,
        _force: bool,
    ) -> Result<Receipt, AccountError> {
        let receipt = match payer {
            Some(AccountRef::Firm(firm)) if self.employer == Some(firm) => Receipt::Wage,
            Some(AccountRef::Government) => Receipt::Benefit,
            _ => {
                return Err(AccountError::UnclassifiedCredit {
                    account: AccountRef::Worker(self.index),
                    payer: describe_payer(payer),
                    amount,
                })
            }
        };
        self.core.deposit(amount);
        if receipt == Receipt::Benefit {
            self.benefits_received += amount;
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_from_stranger_fails_without_booking() {
        let mut worker = Worker::new(AccountId(1), WorkerId(0));
        worker.employ(FirmId(1), 100, 0);

        let result = worker.credit(100, Some(AccountRef::Firm(FirmId(2))), false);
        assert!(matches!(result, Err(AccountError::UnclassifiedCredit { .. })));
        assert_eq!(worker.balance(), 0);
    }

    #[test]
    fn test_credit_without_payer_is_unclassified() {
        let mut worker = Worker::new(AccountId(1), WorkerId(0));
        assert!(worker.credit(5, None, false).is_err());
    }

    #[test]
    fn test_benefit_recorded_on_credit() {
        let mut worker = Worker::new(AccountId(1), WorkerId(0));
        let receipt = worker.credit(60, Some(AccountRef::Government), false).unwrap();
        assert_eq!(receipt, Receipt::Benefit);
        assert_eq!(worker.benefits_received(), 60);
        assert_eq!(worker.balance(), 60);
    }

    #[test]
    fn test_dismiss_records_period_only_when_employed() {
        let mut worker = Worker::new(AccountId(1), WorkerId(0));
        assert_eq!(worker.dismiss(3), None);
        assert_eq!(worker.period_fired(), None);

        worker.employ(FirmId(0), 100, 1);
        assert_eq!(worker.dismiss(4), Some(FirmId(0)));
        assert_eq!(worker.period_fired(), Some(4));
    }

    #[test]
    fn test_average_wage_rolls() {
        let mut worker = Worker::new(AccountId(1), WorkerId(0));
        worker.record_wage(100, 10);
        worker.roll_average_wage();
        assert_eq!(worker.average_wage(), 50.0);
        worker.reset_period();
        worker.record_wage(100, 10);
        worker.roll_average_wage();
        assert_eq!(worker.average_wage(), 75.0);
    }
}
