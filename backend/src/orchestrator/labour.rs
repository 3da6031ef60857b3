//! Labour market: payroll, hiring with friction, firing
//!
//! Hiring friction makes it harder to fill vacancies as unemployment falls:
//! an ordinary firm's hire succeeds only if a per-mille draw falls below the
//! share of the population not in work. The state-supported firm hires
//! without friction and is never short of wage funds.

use crate::core::money::percent_of;
use crate::models::account::{Account, AccountRef, FirmId, WorkerId};
use crate::models::event::Event;
use crate::models::government::Spend;
use crate::models::worker::Worker;
use crate::orchestrator::engine::{Economy, SimulationError};
use tracing::debug;

impl Economy {
    /// Pay every employee of `firm` their agreed wage plus deductions
    ///
    /// When the firm cannot cover an employee, the state-supported firm is
    /// topped up by the government, an ordinary firm may be granted a loan
    /// (with probability `loan-prob`), and otherwise the employee is fired
    /// unpaid. Returns wages plus deductions disbursed.
    pub fn pay_wages(&mut self, firm: FirmId, period: usize) -> Result<i64, SimulationError> {
        self.account(AccountRef::Firm(firm))?;
        let payer = AccountRef::Firm(firm);
        let state_supported = self.firms[firm.0].is_state_supported();
        let bank = self.firms[firm.0].bank();
        let mut disbursed = 0;

        for worker in self.employees_of(firm) {
            let wage = self.workers[worker.0].agreed_wage();
            let deductions = percent_of(wage, self.params.pre_tax_dedns_rate);
            let needed = wage + deductions;

            let balance = self.firms[firm.0].balance();
            if balance < needed {
                let shortfall = needed - balance;
                if state_supported {
                    self.government_pay(payer, shortfall, Spend::Support, false)?;
                } else if self.rng.chance(self.params.loan_prob) {
                    self.lend(bank, firm, shortfall)?;
                }
            }

            if self.firms[firm.0].balance() < needed {
                if state_supported {
                    return Err(self.invariant(format!(
                        "state-supported {} cannot pay worker#{}",
                        payer, worker.0
                    )));
                }
                self.dismiss(worker, period, true)?;
                continue;
            }

            if !self.transfer_safely(payer, AccountRef::Worker(worker), wage, false)? {
                return Err(self.invariant(format!("{} failed to pay a funded wage", payer)));
            }
            if !self.transfer_safely(payer, AccountRef::Government, deductions, false)? {
                return Err(self.invariant(format!("{} failed to pay funded deductions", payer)));
            }

            let employer = &mut self.firms[firm.0];
            employer.record_wages(wage);
            employer.record_deductions(deductions);
            disbursed += needed;
        }

        Ok(disbursed)
    }

    /// Try to hire one worker for `firm` at `wage`
    ///
    /// Prefers the lowest-indexed unemployed worker and otherwise creates a
    /// new worker while the population ceiling allows. Returns `None` when
    /// friction blocks the hire or nobody is available.
    pub fn hire(
        &mut self,
        firm: FirmId,
        wage: i64,
        period: usize,
    ) -> Result<Option<WorkerId>, SimulationError> {
        self.account(AccountRef::Firm(firm))?;

        if !self.firms[firm.0].is_state_supported() {
            let population = self.config.controls.population as i64;
            let idle = (population - self.num_employed() as i64).max(0);
            let accessibility = idle * 1000 / population;
            if self.rng.range(0, 1000) >= accessibility {
                return Ok(None);
            }
        }

        let worker = match self.unemployed.pop_first() {
            Some(index) => WorkerId(index),
            None if self.workers.len() < self.config.controls.population => {
                let index = WorkerId(self.workers.len());
                let id = self.allocate_account_id();
                self.workers.push(Worker::new(id, index));
                self.events.log(Event::WorkerCreated {
                    period,
                    worker: index,
                });
                index
            }
            None => return Ok(None),
        };

        self.workers[worker.0].employ(firm, wage, period);
        self.firms[firm.0].record_hire();
        self.events.log(Event::Hired {
            period,
            worker,
            firm,
            wage,
        });
        Ok(Some(worker))
    }

    /// Hire up to `n` workers at the firm's current wage rate
    ///
    /// Stops at the first failed hire. Returns the number hired.
    pub fn hire_some(
        &mut self,
        firm: FirmId,
        n: usize,
        period: usize,
    ) -> Result<usize, SimulationError> {
        self.account(AccountRef::Firm(firm))?;
        let wage = self.firms[firm.0].wage_rate(self.config.controls.standard_wage);
        let mut hired = 0;
        while hired < n {
            if self.hire(firm, wage, period)?.is_none() {
                break;
            }
            hired += 1;
        }
        Ok(hired)
    }

    /// End a worker's employment
    ///
    /// Returns `false` if the worker had no employer.
    pub fn fire(&mut self, worker: WorkerId, period: usize) -> Result<bool, SimulationError> {
        self.dismiss(worker, period, false)
    }

    pub(crate) fn dismiss(
        &mut self,
        worker: WorkerId,
        period: usize,
        for_funds: bool,
    ) -> Result<bool, SimulationError> {
        self.account(AccountRef::Worker(worker))?;
        let Some(firm) = self.workers[worker.0].dismiss(period) else {
            return Ok(false);
        };
        self.firms[firm.0].record_firing();
        self.unemployed.insert(worker.0);
        self.events.log(Event::Fired {
            period,
            worker,
            firm,
            for_funds,
        });
        debug!(period, worker = worker.0, firm = firm.0, for_funds, "worker fired");
        Ok(true)
    }
}
