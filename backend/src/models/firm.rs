//! Firm account
//!
//! Firms employ workers, sell output to workers, other firms and the
//! government, borrow from their bank and reinvest surplus. Exactly one firm
//! per economy is state-supported: it is funded on demand by the government
//! and never invests.

use crate::core::money::percent_of;
use crate::models::account::{
    Account, AccountCore, AccountError, AccountId, AccountRef, BankId, FirmId, Receipt,
};
use serde::{Deserialize, Serialize};

/// How a firm intends to split its surplus after paying wages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurplusPlan {
    /// Balance above the wage bill just paid
    pub available: i64,
    /// Share earmarked for hiring and capital
    pub investible: i64,
    /// Share to be distributed to employees as bonuses
    pub bonus_pool: i64,
}

/// A producer
///
/// # Example
/// ```
/// use econ_sim_core::models::{Account, AccountId, BankId, Firm, FirmId};
///
/// let firm = Firm::new(AccountId(3), FirmId(1), false, BankId(0));
/// assert!(!firm.is_state_supported());
/// assert_eq!(firm.productivity(), 1.0);
/// assert_eq!(firm.wage_rate(100), 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firm {
    core: AccountCore,
    index: FirmId,
    state_supported: bool,
    bank: BankId,

    /// Wage-rate multiplier, raised by capital purchases
    productivity: f64,

    // Per-period accumulators
    wages_paid: i64,
    bonuses_paid: i64,
    deductions_paid: i64,
    sales_tax_paid: i64,
    sales_receipts: i64,
    interest_paid: i64,
    support_received: i64,
    num_hired: usize,
    num_fired: usize,
}

impl Firm {
    pub fn new(id: AccountId, index: FirmId, state_supported: bool, bank: BankId) -> Self {
        Self {
            core: AccountCore::new(id),
            index,
            state_supported,
            bank,
            productivity: 1.0,
            wages_paid: 0,
            bonuses_paid: 0,
            deductions_paid: 0,
            sales_tax_paid: 0,
            sales_receipts: 0,
            interest_paid: 0,
            support_received: 0,
            num_hired: 0,
            num_fired: 0,
        }
    }

    pub fn index(&self) -> FirmId {
        self.index
    }

    pub fn is_state_supported(&self) -> bool {
        self.state_supported
    }

    pub fn bank(&self) -> BankId {
        self.bank
    }

    pub fn productivity(&self) -> f64 {
        self.productivity
    }

    pub fn wages_paid(&self) -> i64 {
        self.wages_paid
    }

    pub fn bonuses_paid(&self) -> i64 {
        self.bonuses_paid
    }

    pub fn deductions_paid(&self) -> i64 {
        self.deductions_paid
    }

    pub fn sales_tax_paid(&self) -> i64 {
        self.sales_tax_paid
    }

    pub fn sales_receipts(&self) -> i64 {
        self.sales_receipts
    }

    pub fn interest_paid(&self) -> i64 {
        self.interest_paid
    }

    pub fn support_received(&self) -> i64 {
        self.support_received
    }

    pub fn num_hired(&self) -> usize {
        self.num_hired
    }

    pub fn num_fired(&self) -> usize {
        self.num_fired
    }

    /// Wage offered to new hires
    pub fn wage_rate(&self, standard_wage: i64) -> i64 {
        (self.productivity * standard_wage as f64).floor() as i64
    }

    /// Reset per-period accumulators
    pub fn reset_period(&mut self) {
        self.wages_paid = 0;
        self.bonuses_paid = 0;
        self.deductions_paid = 0;
        self.sales_tax_paid = 0;
        self.sales_receipts = 0;
        self.interest_paid = 0;
        self.support_received = 0;
        self.num_hired = 0;
        self.num_fired = 0;
    }

    /// Split the surplus over this period's wage bill
    ///
    /// Returns `None` when nothing is left above the wage bill, and always
    /// for the state-supported firm.
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::models::{Account, AccountId, BankId, Firm, FirmId};
    ///
    /// let mut firm = Firm::new(AccountId(3), FirmId(1), false, BankId(0));
    /// firm.core_mut().set_balance(1_000);
    ///
    /// // 50% invested, half of the remainder retained
    /// let plan = firm.plan_surplus(50.0, 50.0).unwrap();
    /// assert_eq!(plan.available, 1_000);
    /// assert_eq!(plan.investible, 500);
    /// assert_eq!(plan.bonus_pool, 250);
    /// ```
    pub fn plan_surplus(&self, prop_invest_pct: f64, reserve_rate_pct: f64) -> Option<SurplusPlan> {
        if self.state_supported {
            return None;
        }
        let available = self.core.balance() - self.wages_paid;
        if available <= 0 {
            return None;
        }
        let investible = percent_of(available, prop_invest_pct).min(available);
        let distribution_pct = (100.0 - reserve_rate_pct).max(0.0);
        let bonus_pool = percent_of(available - investible, distribution_pct).min(available - investible);
        Some(SurplusPlan {
            available,
            investible,
            bonus_pool,
        })
    }

    /// Raise productivity after buying capital worth `outlay`
    ///
    /// The purchase is recouped over `recoup_periods` periods through a
    /// higher wage rate across `headcount` employees.
    pub fn raise_productivity(
        &mut self,
        outlay: i64,
        recoup_periods: f64,
        headcount: usize,
        standard_wage: i64,
    ) {
        if outlay <= 0 || standard_wage <= 0 {
            return;
        }
        let horizon = recoup_periods.max(1.0);
        let heads = headcount.max(1) as f64;
        self.productivity += outlay as f64 / (horizon * heads * standard_wage as f64);
    }

    pub fn record_wages(&mut self, wages: i64) {
        self.wages_paid += wages;
    }

    pub fn record_deductions(&mut self, deductions: i64) {
        self.deductions_paid += deductions;
    }

    pub fn record_bonus(&mut self, bonus: i64) {
        self.bonuses_paid += bonus;
    }

    pub fn record_sales_tax(&mut self, tax: i64) {
        self.sales_tax_paid += tax;
    }

    pub fn record_interest(&mut self, interest: i64) {
        self.interest_paid += interest;
    }

    pub fn record_hire(&mut self) {
        self.num_hired += 1;
    }

    pub fn record_firing(&mut self) {
        self.num_fired += 1;
    }
}

impl Account for Firm {
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
        force: bool,
    ) -> Result<Receipt, AccountError> {
        self.core.deposit(amount);
        let receipt = match payer {
            None => Receipt::Deposit,
            Some(AccountRef::Government) if !force => {
                self.support_received += amount;
                Receipt::Support
            }
            Some(AccountRef::Bank(_)) => Receipt::Loan,
            Some(_) => {
                self.sales_receipts += amount;
                Receipt::Sale
            }
        };
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::WorkerId;

    fn firm() -> Firm {
        Firm::new(AccountId(1), FirmId(1), false, BankId(0))
    }

    #[test]
    fn test_credit_classification() {
        let mut f = firm();
        assert_eq!(f.credit(10, Some(AccountRef::Government), false), Ok(Receipt::Support));
        assert_eq!(f.credit(10, Some(AccountRef::Government), true), Ok(Receipt::Sale));
        assert_eq!(f.credit(10, Some(AccountRef::Bank(BankId(0))), false), Ok(Receipt::Loan));
        assert_eq!(f.credit(10, Some(AccountRef::Worker(WorkerId(0))), false), Ok(Receipt::Sale));
        assert_eq!(f.credit(10, None, false), Ok(Receipt::Deposit));
        assert_eq!(f.balance(), 50);
        assert_eq!(f.sales_receipts(), 20);
        assert_eq!(f.support_received(), 10);
    }

    #[test]
    fn test_state_supported_firm_never_plans_surplus() {
        let mut f = Firm::new(AccountId(1), FirmId(0), true, BankId(0));
        f.core_mut().set_balance(10_000);
        assert_eq!(f.plan_surplus(50.0, 50.0), None);
    }

    #[test]
    fn test_surplus_excludes_wage_bill() {
        let mut f = firm();
        f.core_mut().set_balance(300);
        f.record_wages(300);
        assert_eq!(f.plan_surplus(50.0, 0.0), None);

        f.core_mut().set_balance(400);
        let plan = f.plan_surplus(50.0, 0.0).unwrap();
        assert_eq!(plan.available, 100);
        assert_eq!(plan.investible, 50);
        assert_eq!(plan.bonus_pool, 50);
    }

    #[test]
    fn test_raise_productivity_amortises_over_horizon() {
        let mut f = firm();
        // 1000 spread over 10 periods and 1 employee at wage 100 → +1.0
        f.raise_productivity(1_000, 10.0, 1, 100);
        assert!((f.productivity() - 2.0).abs() < 1e-12);
        assert_eq!(f.wage_rate(100), 200);
    }
}
