//! Parameter keys, resolved parameter values and run controls
//!
//! Parameters are the behavioural rates a model can vary per period through
//! conditional pages. Run controls are fixed for the whole run.

use crate::rng::RngSeed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a behavioural parameter
///
/// The kebab-case name is the key used by settings pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKey {
    PropensityToConsume,
    IncomeThreshold,
    IncomeTaxRate,
    SalesTaxRate,
    PreTaxDednsRate,
    UnemplBenefitRate,
    ReserveRate,
    PropInvest,
    BoeInterest,
    BusInterest,
    LoanProb,
    CapexRecoupPeriods,
    FirmCreationProb,
    GovtProcurement,
}

impl ParamKey {
    pub const ALL: [ParamKey; 14] = [
        ParamKey::PropensityToConsume,
        ParamKey::IncomeThreshold,
        ParamKey::IncomeTaxRate,
        ParamKey::SalesTaxRate,
        ParamKey::PreTaxDednsRate,
        ParamKey::UnemplBenefitRate,
        ParamKey::ReserveRate,
        ParamKey::PropInvest,
        ParamKey::BoeInterest,
        ParamKey::BusInterest,
        ParamKey::LoanProb,
        ParamKey::CapexRecoupPeriods,
        ParamKey::FirmCreationProb,
        ParamKey::GovtProcurement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::PropensityToConsume => "propensity-to-consume",
            ParamKey::IncomeThreshold => "income-threshold",
            ParamKey::IncomeTaxRate => "income-tax-rate",
            ParamKey::SalesTaxRate => "sales-tax-rate",
            ParamKey::PreTaxDednsRate => "pre-tax-dedns-rate",
            ParamKey::UnemplBenefitRate => "unempl-benefit-rate",
            ParamKey::ReserveRate => "reserve-rate",
            ParamKey::PropInvest => "prop-invest",
            ParamKey::BoeInterest => "boe-interest",
            ParamKey::BusInterest => "bus-interest",
            ParamKey::LoanProb => "loan-prob",
            ParamKey::CapexRecoupPeriods => "capex-recoup-periods",
            ParamKey::FirmCreationProb => "firm-creation-prob",
            ParamKey::GovtProcurement => "govt-procurement",
        }
    }

    /// Short human description, used by the CLI listing
    pub fn description(&self) -> &'static str {
        match self {
            ParamKey::PropensityToConsume => "% of income above the threshold a worker spends",
            ParamKey::IncomeThreshold => "balance a worker always spends in full",
            ParamKey::IncomeTaxRate => "% of wages remitted as income tax",
            ParamKey::SalesTaxRate => "sales tax %, included in the sale price",
            ParamKey::PreTaxDednsRate => "% of wages paid by the employer as deductions",
            ParamKey::UnemplBenefitRate => "benefit as % of the standard wage",
            ParamKey::ReserveRate => "% of post-investment surplus a firm retains",
            ParamKey::PropInvest => "% of surplus earmarked for investment",
            ParamKey::BoeInterest => "central-bank rate on negative bank balances",
            ParamKey::BusInterest => "interest rate on business loans",
            ParamKey::LoanProb => "% chance a short firm is granted a loan",
            ParamKey::CapexRecoupPeriods => "periods over which capital spend is recouped",
            ParamKey::FirmCreationProb => "% chance a new firm starts each period",
            ParamKey::GovtProcurement => "procurement as % of standard wage x population",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Fully resolved parameter values for one period
///
/// Every field is a percentage except `income_threshold` (currency units)
/// and `capex_recoup_periods` (periods).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub propensity_to_consume: f64,
    pub income_threshold: f64,
    pub income_tax_rate: f64,
    pub sales_tax_rate: f64,
    pub pre_tax_dedns_rate: f64,
    pub unempl_benefit_rate: f64,
    pub reserve_rate: f64,
    pub prop_invest: f64,
    pub boe_interest: f64,
    pub bus_interest: f64,
    pub loan_prob: f64,
    pub capex_recoup_periods: f64,
    pub firm_creation_prob: f64,
    pub govt_procurement: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            propensity_to_consume: 80.0,
            income_threshold: 50.0,
            income_tax_rate: 20.0,
            sales_tax_rate: 10.0,
            pre_tax_dedns_rate: 10.0,
            unempl_benefit_rate: 60.0,
            reserve_rate: 50.0,
            prop_invest: 50.0,
            boe_interest: 1.0,
            bus_interest: 2.0,
            loan_prob: 50.0,
            capex_recoup_periods: 10.0,
            firm_creation_prob: 10.0,
            govt_procurement: 0.0,
        }
    }
}

impl Parameters {
    /// Read a parameter by key
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::params::{ParamKey, Parameters};
    ///
    /// let mut params = Parameters::default();
    /// assert_eq!(params.get(ParamKey::IncomeTaxRate), 20.0);
    /// params.set(ParamKey::IncomeTaxRate, 15.0);
    /// assert_eq!(params.income_tax_rate, 15.0);
    /// ```
    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::PropensityToConsume => self.propensity_to_consume,
            ParamKey::IncomeThreshold => self.income_threshold,
            ParamKey::IncomeTaxRate => self.income_tax_rate,
            ParamKey::SalesTaxRate => self.sales_tax_rate,
            ParamKey::PreTaxDednsRate => self.pre_tax_dedns_rate,
            ParamKey::UnemplBenefitRate => self.unempl_benefit_rate,
            ParamKey::ReserveRate => self.reserve_rate,
            ParamKey::PropInvest => self.prop_invest,
            ParamKey::BoeInterest => self.boe_interest,
            ParamKey::BusInterest => self.bus_interest,
            ParamKey::LoanProb => self.loan_prob,
            ParamKey::CapexRecoupPeriods => self.capex_recoup_periods,
            ParamKey::FirmCreationProb => self.firm_creation_prob,
            ParamKey::GovtProcurement => self.govt_procurement,
        }
    }

    pub fn set(&mut self, key: ParamKey, value: f64) {
        let slot = match key {
            ParamKey::PropensityToConsume => &mut self.propensity_to_consume,
            ParamKey::IncomeThreshold => &mut self.income_threshold,
            ParamKey::IncomeTaxRate => &mut self.income_tax_rate,
            ParamKey::SalesTaxRate => &mut self.sales_tax_rate,
            ParamKey::PreTaxDednsRate => &mut self.pre_tax_dedns_rate,
            ParamKey::UnemplBenefitRate => &mut self.unempl_benefit_rate,
            ParamKey::ReserveRate => &mut self.reserve_rate,
            ParamKey::PropInvest => &mut self.prop_invest,
            ParamKey::BoeInterest => &mut self.boe_interest,
            ParamKey::BusInterest => &mut self.bus_interest,
            ParamKey::LoanProb => &mut self.loan_prob,
            ParamKey::CapexRecoupPeriods => &mut self.capex_recoup_periods,
            ParamKey::FirmCreationProb => &mut self.firm_creation_prob,
            ParamKey::GovtProcurement => &mut self.govt_procurement,
        };
        *slot = value;
    }

    /// Income threshold in whole currency units
    pub fn income_threshold_units(&self) -> i64 {
        self.income_threshold.floor() as i64
    }
}

/// Controls fixed for the lifetime of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunControls {
    /// Periods executed by `Economy::run`
    pub iterations: usize,

    /// Period the economy is constructed at
    pub start_period: usize,

    /// Ceiling on the number of worker accounts
    pub population: usize,

    /// Base wage (i64 units); benefits and procurement are rated on it
    pub standard_wage: i64,

    /// Ordinary firms created at construction
    pub startups: usize,

    /// Workers hired by the state-supported firm at construction
    pub government_employees: usize,

    /// Number of banks (at least one)
    pub banks: usize,

    pub seed: RngSeed,
}

impl Default for RunControls {
    fn default() -> Self {
        Self {
            iterations: 100,
            start_period: 0,
            population: 1000,
            standard_wage: 100,
            startups: 10,
            government_employees: 200,
            banks: 1,
            seed: RngSeed::default(),
        }
    }
}
