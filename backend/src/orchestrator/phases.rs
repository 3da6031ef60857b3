//! Per-period behaviour of each account variant
//!
//! Triggers and epilogues are public so scripted scenarios can drive single
//! accounts; each runs at most once per period and returns `false` when it
//! has already run.

use crate::core::money::percent_of;
use crate::models::account::{Account, AccountRef, BankId, FirmId, WorkerId};
use crate::models::event::Event;
use crate::models::government::Spend;
use crate::orchestrator::engine::{Economy, SimulationError};
use crate::stats::{aggregate_productivity, gini, Property, PropertySnapshot};
use tracing::debug;

impl Economy {
    // ========================================================================
    // Init
    // ========================================================================

    /// Reset accumulators and resolve this period's parameters
    pub(crate) fn begin_period(&mut self) {
        self.government.reset_period();
        for bank in &mut self.banks {
            bank.reset_period();
        }
        for firm in &mut self.firms {
            firm.reset_period();
        }
        for worker in &mut self.workers {
            worker.reset_period();
        }

        self.params = self.config.model.resolve(self.stats.latest());

        let rate = self.params.bus_interest;
        for firm in self.firms.iter_mut().filter(|f| !f.is_state_supported()) {
            firm.core_mut().set_interest_rate(rate);
        }
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// Pay benefits to the unemployed, then spend on procurement
    pub fn trigger_government(&mut self, period: usize) -> Result<bool, SimulationError> {
        if !self.government.begin_trigger(period) {
            return Ok(false);
        }

        let standard_wage = self.config.controls.standard_wage;
        let benefit = percent_of(standard_wage, self.params.unempl_benefit_rate);
        let claimants: Vec<usize> = self.unemployed.iter().copied().collect();
        for worker in claimants {
            self.government_pay(AccountRef::Worker(WorkerId(worker)), benefit, Spend::Benefit, false)?;
        }

        let population = self.config.controls.population as i64;
        let budget = percent_of(standard_wage * population, self.params.govt_procurement);
        let suppliers: Vec<FirmId> = self
            .firms
            .iter()
            .filter(|f| !f.is_state_supported())
            .map(|f| f.index())
            .collect();
        if budget > 0 && !suppliers.is_empty() {
            let share = budget / suppliers.len() as i64;
            for firm in suppliers {
                self.government_pay(AccountRef::Firm(firm), share, Spend::Procurement, true)?;
            }
        }

        Ok(true)
    }

    /// Charge central-bank interest if the bank is overextended
    pub fn trigger_bank(&mut self, bank: BankId, period: usize) -> Result<bool, SimulationError> {
        self.account(AccountRef::Bank(bank))?;
        if !self.banks[bank.0].begin_trigger(period) {
            return Ok(false);
        }
        self.collect_central_interest(bank)?;
        Ok(true)
    }

    /// Service the firm's loan, then pay its wage bill
    pub fn trigger_firm(&mut self, firm: FirmId, period: usize) -> Result<bool, SimulationError> {
        self.account(AccountRef::Firm(firm))?;
        if !self.firms[firm.0].begin_trigger(period) {
            return Ok(false);
        }

        if !self.firms[firm.0].is_state_supported() {
            let interest = self.firms[firm.0].core().interest_due();
            if interest > 0 {
                let bank = AccountRef::Bank(self.firms[firm.0].bank());
                if self.transfer_safely(AccountRef::Firm(firm), bank, interest, false)? {
                    self.firms[firm.0].record_interest(interest);
                } else {
                    self.firms[firm.0].core_mut().add_debt(interest);
                    self.events.log(Event::InterestDeferred {
                        period,
                        firm,
                        amount: interest,
                    });
                    debug!(period, firm = firm.0, interest, "interest capitalised");
                }
            }
        }

        self.pay_wages(firm, period)?;
        Ok(true)
    }

    /// Spend part of the worker's balance at a random firm
    pub fn trigger_worker(&mut self, worker: WorkerId, period: usize) -> Result<bool, SimulationError> {
        self.account(AccountRef::Worker(worker))?;
        if !self.workers[worker.0].begin_trigger(period) {
            return Ok(false);
        }

        let amount = self.workers[worker.0].purchase_amount(
            self.params.income_threshold_units(),
            self.params.propensity_to_consume,
        );
        let seller = FirmId(self.rng.pick(self.firms.len()));
        if amount > 0
            && self.transfer_safely(AccountRef::Worker(worker), AccountRef::Firm(seller), amount, false)?
        {
            self.workers[worker.0].record_purchase(amount);
        }
        Ok(true)
    }

    // ========================================================================
    // Epilogues
    // ========================================================================

    /// Distribute bonuses, hire with the investible surplus and spend what
    /// is left on capital
    pub fn firm_epilogue(&mut self, firm: FirmId, period: usize) -> Result<bool, SimulationError> {
        self.account(AccountRef::Firm(firm))?;
        if !self.firms[firm.0].begin_epilogue(period) {
            return Ok(false);
        }

        let Some(plan) = self.firms[firm.0].plan_surplus(self.params.prop_invest, self.params.reserve_rate)
        else {
            return Ok(true);
        };

        // Bonuses, taxed as wages
        let employees = self.employees_of(firm);
        let mut bonus_spent = 0;
        if plan.bonus_pool > 0 && !employees.is_empty() {
            let per_head = plan.bonus_pool / employees.len() as i64;
            for worker in &employees {
                if self.transfer_safely(AccountRef::Firm(firm), AccountRef::Worker(*worker), per_head, false)? {
                    self.firms[firm.0].record_bonus(per_head);
                    bonus_spent += per_head;
                }
            }
        }
        let investible = plan.investible + (plan.bonus_pool - bonus_spent);

        // Hiring
        let standard_wage = self.config.controls.standard_wage;
        let wage_rate = self.firms[firm.0].wage_rate(standard_wage);
        let cost_per_hire = wage_rate + percent_of(wage_rate, self.params.pre_tax_dedns_rate);
        let num_to_hire = if cost_per_hire > 0 {
            (investible / cost_per_hire) as usize
        } else {
            0
        };
        let hired = self.hire_some(firm, num_to_hire, period)?;

        // Capital purchase from another firm
        let excess = investible - hired as i64 * cost_per_hire;
        if excess > 0 && self.firms.len() > 1 {
            let mut seller = self.rng.pick(self.firms.len() - 1);
            if seller >= firm.0 {
                seller += 1;
            }
            let seller = FirmId(seller);
            if self.transfer_safely(AccountRef::Firm(firm), AccountRef::Firm(seller), excess, true)? {
                let headcount = self.employees_of(firm).len();
                let recoup = self.params.capex_recoup_periods;
                let buyer = &mut self.firms[firm.0];
                buyer.raise_productivity(excess, recoup, headcount, standard_wage);
                let productivity = buyer.productivity();
                self.events.log(Event::CapitalPurchase {
                    period,
                    buyer: firm,
                    seller,
                    amount: excess,
                    productivity,
                });
            }
        }

        Ok(true)
    }

    /// Fold the period's wages into the worker's rolling average
    pub fn worker_epilogue(&mut self, worker: WorkerId, period: usize) -> Result<bool, SimulationError> {
        self.account(AccountRef::Worker(worker))?;
        let w = &mut self.workers[worker.0];
        if !w.begin_epilogue(period) {
            return Ok(false);
        }
        w.roll_average_wage();
        Ok(true)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Capture every tracked property, in order, and record the snapshot
    pub(crate) fn capture_statistics(&mut self, period: usize) -> Result<PropertySnapshot, SimulationError> {
        let mut snapshot = PropertySnapshot::new();
        for property in self.stats.order().to_vec() {
            let value = self.measure(property, &snapshot)?;
            snapshot.insert(property, value);
        }
        self.stats.record(period, snapshot.clone());
        Ok(snapshot)
    }

    /// Value of one property; derived properties read `captured`
    fn measure(&self, property: Property, captured: &PropertySnapshot) -> Result<f64, SimulationError> {
        let dep = |p: Property| {
            captured
                .get(p)
                .ok_or_else(|| self.invariant(format!("{} read before {} was captured", property, p)))
        };
        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };

        let value = match property {
            Property::Period => self.clock.current_period() as f64,
            Property::PopSize => self.workers.len() as f64,
            Property::NumEmployed => self.num_employed() as f64,
            Property::NumUnemployed => dep(Property::PopSize)? - dep(Property::NumEmployed)?,
            Property::PctEmployed => {
                ratio(dep(Property::NumEmployed)? * 100.0, dep(Property::PopSize)?)
            }
            Property::PctUnemployed => {
                if dep(Property::PopSize)? > 0.0 {
                    100.0 - dep(Property::PctEmployed)?
                } else {
                    0.0
                }
            }
            Property::NumFirms => self.firms.len() as f64,
            Property::BusSize => ratio(dep(Property::NumEmployed)?, dep(Property::NumFirms)?),
            Property::NumHired => self.firms.iter().map(|f| f.num_hired()).sum::<usize>() as f64,
            Property::NumFired => self.firms.iter().map(|f| f.num_fired()).sum::<usize>() as f64,
            Property::Wages => self.firms.iter().map(|f| f.wages_paid()).sum::<i64>() as f64,
            Property::AvgWage => ratio(dep(Property::Wages)?, dep(Property::NumEmployed)?),
            Property::Bonuses => self.firms.iter().map(|f| f.bonuses_paid()).sum::<i64>() as f64,
            Property::Dedns => self.firms.iter().map(|f| f.deductions_paid()).sum::<i64>() as f64,
            Property::IncomeTax => {
                self.workers.iter().map(|w| w.income_tax_paid()).sum::<i64>() as f64
            }
            Property::SalesTax => self.firms.iter().map(|f| f.sales_tax_paid()).sum::<i64>() as f64,
            Property::Consumption => {
                self.workers.iter().map(|w| w.purchases_made()).sum::<i64>() as f64
            }
            Property::Benefits => self.government.benefits_paid() as f64,
            Property::Procurement => self.government.procurement_expenditure() as f64,
            Property::GovSupport => self.government.unbudgeted_expenditure() as f64,
            Property::GovExp => {
                dep(Property::Benefits)? + dep(Property::Procurement)? + dep(Property::GovSupport)?
            }
            Property::GovRecpts => self.government.receipts() as f64,
            Property::Deficit => dep(Property::GovExp)? - dep(Property::GovRecpts)?,
            Property::GovBal => self.government.balance() as f64,
            Property::DomBal => {
                let workers: i64 = self.workers.iter().map(|w| w.balance()).sum();
                let firms: i64 = self.firms.iter().map(|f| f.balance()).sum();
                (workers + firms) as f64
            }
            Property::AmountOwed => {
                self.firms.iter().map(|f| f.core().amount_owed()).sum::<i64>() as f64
            }
            Property::NewLoans => self.banks.iter().map(|b| b.loans_made()).sum::<i64>() as f64,
            Property::Gdp => dep(Property::Consumption)? + dep(Property::Procurement)?,
            Property::Productivity => {
                let mut headcounts = vec![0usize; self.firms.len()];
                for worker in &self.workers {
                    if let Some(firm) = worker.employer() {
                        headcounts[firm.0] += 1;
                    }
                }
                aggregate_productivity(
                    self.firms
                        .iter()
                        .map(|f| (headcounts[f.index().0], f.productivity())),
                    self.config.controls.population,
                )
            }
            Property::Gini => {
                let wages: Vec<f64> = self.workers.iter().map(|w| w.average_wage()).collect();
                gini(&wages)
            }
        };
        Ok(value)
    }
}
