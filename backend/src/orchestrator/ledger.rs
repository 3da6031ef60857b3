//! Ledger primitives
//!
//! Every movement of money goes through one of these:
//!
//! - [`Economy::transfer_safely`]: balance-checked transfer (unchecked only
//!   when the government pays)
//! - [`Economy::lend`]: uninsured bank loan
//! - [`Economy::collect_central_interest`]: bank pays interest on a negative
//!   balance to the government
//!
//! The receiving account classifies each credit; the container then applies
//! the cross-account consequence (income tax on wages, sales tax on sales).

use crate::core::money::{percent_of, tax_inclusive_share};
use crate::models::account::{Account, AccountError, AccountRef, BankId, FirmId, Receipt};
use crate::models::event::Event;
use crate::models::government::Spend;
use crate::orchestrator::engine::{Economy, SimulationError};
use tracing::debug;

impl Economy {
    /// Move `amount` from one account to another
    ///
    /// Returns `Ok(false)` with no state change when the payer cannot cover
    /// the amount. The government is never refused. An amount of zero is a
    /// successful no-op; a negative amount, or a credit the recipient cannot
    /// classify, is an invariant violation and leaves both balances as they
    /// were.
    ///
    /// `force` asks a receiving firm to book a government payment as a sale
    /// rather than as support.
    pub fn transfer_safely(
        &mut self,
        from: AccountRef,
        to: AccountRef,
        amount: i64,
        force: bool,
    ) -> Result<bool, SimulationError> {
        if amount < 0 {
            return Err(self.invariant(format!(
                "negative transfer of {} from {} to {}",
                amount, from, to
            )));
        }
        self.account(to)?;
        if amount == 0 {
            self.account(from)?;
            return Ok(true);
        }
        if from == to {
            return Err(self.invariant(format!("{} cannot pay itself", from)));
        }

        let payer = self.account_mut(from)?;
        if payer.may_overdraw() {
            payer.core_mut().overdraw(amount);
        } else {
            match payer.core_mut().withdraw(amount) {
                Ok(()) => {}
                Err(AccountError::InsufficientFunds { .. }) => return Ok(false),
                Err(err) => return Err(self.invariant(err.to_string())),
            }
        }

        let receipt = match self.account_mut(to)?.credit(amount, Some(from), force) {
            Ok(receipt) => receipt,
            Err(err) => {
                self.account_mut(from)?.core_mut().deposit(amount);
                return Err(self.invariant(err.to_string()));
            }
        };

        self.apply_receipt(to, amount, receipt)?;
        Ok(true)
    }

    /// Cross-account side effects of a classified credit
    fn apply_receipt(
        &mut self,
        to: AccountRef,
        amount: i64,
        receipt: Receipt,
    ) -> Result<(), SimulationError> {
        match (receipt, to) {
            (Receipt::Wage, AccountRef::Worker(worker)) => {
                let tax = percent_of(amount, self.params.income_tax_rate);
                if self.transfer_safely(to, AccountRef::Government, tax, false)? {
                    self.workers[worker.0].record_wage(amount, tax);
                }
            }
            (Receipt::Sale, AccountRef::Firm(firm)) => {
                let tax = tax_inclusive_share(amount, self.params.sales_tax_rate);
                if self.transfer_safely(to, AccountRef::Government, tax, false)? {
                    self.firms[firm.0].record_sales_tax(tax);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Government payment for a stated purpose
    ///
    /// Always succeeds; the government's balance may go negative.
    pub fn government_pay(
        &mut self,
        to: AccountRef,
        amount: i64,
        spend: Spend,
        force: bool,
    ) -> Result<(), SimulationError> {
        if self.transfer_safely(AccountRef::Government, to, amount, force)? {
            self.government.record_spend(spend, amount);
            Ok(())
        } else {
            Err(self.invariant("government payment refused"))
        }
    }

    /// Lend `amount` from a bank to a firm
    ///
    /// The bank debits itself with no reserve check; the firm's debt grows
    /// by the principal.
    pub fn lend(&mut self, bank: BankId, firm: FirmId, amount: i64) -> Result<(), SimulationError> {
        if amount <= 0 {
            return Ok(());
        }
        let lender = AccountRef::Bank(bank);
        self.account(lender)?;
        self.account(AccountRef::Firm(firm))?;

        self.banks[bank.0].advance_loan(amount);
        if let Err(err) = self.firms[firm.0].credit(amount, Some(lender), false) {
            return Err(self.invariant(err.to_string()));
        }
        self.firms[firm.0].core_mut().add_debt(amount);

        let period = self.clock.current_period();
        self.events.log(Event::LoanGranted {
            period,
            firm,
            bank,
            amount,
        });
        debug!(period, firm = firm.0, bank = bank.0, amount, "loan granted");
        Ok(())
    }

    /// Charge central-bank interest on a bank's negative balance
    ///
    /// Returns the interest moved to the government.
    pub fn collect_central_interest(&mut self, bank: BankId) -> Result<i64, SimulationError> {
        self.account(AccountRef::Bank(bank))?;
        let due = self.banks[bank.0].central_interest_due(self.params.boe_interest);
        if due <= 0 {
            return Ok(0);
        }
        self.banks[bank.0].pay_central_interest(due);
        if let Err(err) = self
            .government
            .credit(due, Some(AccountRef::Bank(bank)), false)
        {
            return Err(self.invariant(err.to_string()));
        }
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::account::{Account, AccountRef, BankId, FirmId, WorkerId};
    use crate::orchestrator::engine::{Economy, EconomyConfig, SimulationError};

    fn economy() -> Economy {
        let mut config = EconomyConfig::default();
        config.controls.population = 10;
        config.controls.government_employees = 2;
        config.controls.startups = 1;
        config.model.defaults.income_tax_rate = 10.0;
        config.model.defaults.sales_tax_rate = 10.0;
        Economy::new(config).unwrap()
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut econ = economy();
        let ok = econ
            .transfer_safely(AccountRef::Firm(FirmId(1)), AccountRef::Firm(FirmId(0)), 10, false)
            .unwrap();
        assert!(!ok);
        assert_eq!(econ.firms()[1].balance(), 0);
        assert_eq!(econ.firms()[0].balance(), 0);
    }

    #[test]
    fn test_wage_is_taxed_at_source() {
        let mut econ = economy();
        econ.government_pay(AccountRef::Firm(FirmId(0)), 100, crate::models::Spend::Support, false)
            .unwrap();
        assert!(econ
            .transfer_safely(AccountRef::Firm(FirmId(0)), AccountRef::Worker(WorkerId(0)), 100, false)
            .unwrap());
        let worker = econ.worker(WorkerId(0)).unwrap();
        assert_eq!(worker.balance(), 90);
        assert_eq!(worker.wages_received(), 100);
        assert_eq!(worker.income_tax_paid(), 10);
        assert_eq!(econ.total_balance(), 0);
    }

    #[test]
    fn test_sale_remits_tax_inclusive_share() {
        let mut econ = economy();
        econ.government_pay(
            AccountRef::Firm(FirmId(1)),
            110,
            crate::models::Spend::Procurement,
            true,
        )
        .unwrap();
        let firm = econ.firm(FirmId(1)).unwrap();
        assert_eq!(firm.sales_receipts(), 110);
        assert_eq!(firm.sales_tax_paid(), 10);
        assert_eq!(firm.balance(), 100);
    }

    #[test]
    fn test_unclassified_credit_rolls_back() {
        let mut econ = economy();
        econ.government_pay(AccountRef::Firm(FirmId(1)), 50, crate::models::Spend::Support, false)
            .unwrap();
        // worker 0 works for the state firm, not firm 1
        let result =
            econ.transfer_safely(AccountRef::Firm(FirmId(1)), AccountRef::Worker(WorkerId(0)), 50, false);
        assert!(matches!(result, Err(SimulationError::InvariantViolation { .. })));
        assert_eq!(econ.firm(FirmId(1)).unwrap().balance(), 50);
        assert_eq!(econ.worker(WorkerId(0)).unwrap().balance(), 0);
    }

    #[test]
    fn test_negative_amount_is_invariant_violation() {
        let mut econ = economy();
        let result =
            econ.transfer_safely(AccountRef::Government, AccountRef::Firm(FirmId(0)), -1, false);
        assert!(matches!(result, Err(SimulationError::InvariantViolation { .. })));
    }

    #[test]
    fn test_lend_and_central_interest_conserve_money() {
        let mut econ = economy();
        econ.lend(BankId(0), FirmId(1), 1_000).unwrap();
        assert_eq!(econ.firm(FirmId(1)).unwrap().balance(), 1_000);
        assert_eq!(econ.firm(FirmId(1)).unwrap().core().amount_owed(), 1_000);
        assert_eq!(econ.bank(BankId(0)).unwrap().balance(), -1_000);

        // default boe-interest is 1%
        assert_eq!(econ.collect_central_interest(BankId(0)).unwrap(), 10);
        assert_eq!(econ.bank(BankId(0)).unwrap().balance(), -1_010);
        assert_eq!(econ.government().balance(), 10);
        assert_eq!(econ.total_balance(), 0);
    }
}
