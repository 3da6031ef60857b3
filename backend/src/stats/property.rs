//! Tracked economy-wide properties
//!
//! Each property has a stable kebab-case name (the lookup string used by
//! conditional pages and the CLI) and declares which other properties it is
//! derived from. Properties are captured once per period in a fixed order,
//! and a derived property reads the values captured earlier in the same
//! pass, so an order in which a property precedes one of its dependencies is
//! rejected at construction.

use crate::params::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    Period,
    PopSize,
    NumEmployed,
    NumUnemployed,
    PctEmployed,
    PctUnemployed,
    NumFirms,
    BusSize,
    NumHired,
    NumFired,
    Wages,
    AvgWage,
    Bonuses,
    Dedns,
    IncomeTax,
    SalesTax,
    Consumption,
    Benefits,
    Procurement,
    GovSupport,
    GovExp,
    GovRecpts,
    Deficit,
    GovBal,
    DomBal,
    AmountOwed,
    NewLoans,
    Gdp,
    Productivity,
    Gini,
}

/// Default capture order: every property, dependencies first
pub const DEFAULT_ORDER: [Property; 30] = [
    Property::Period,
    Property::PopSize,
    Property::NumEmployed,
    Property::NumUnemployed,
    Property::PctEmployed,
    Property::PctUnemployed,
    Property::NumFirms,
    Property::BusSize,
    Property::NumHired,
    Property::NumFired,
    Property::Wages,
    Property::AvgWage,
    Property::Bonuses,
    Property::Dedns,
    Property::IncomeTax,
    Property::SalesTax,
    Property::Consumption,
    Property::Benefits,
    Property::Procurement,
    Property::GovSupport,
    Property::GovExp,
    Property::GovRecpts,
    Property::Deficit,
    Property::GovBal,
    Property::DomBal,
    Property::AmountOwed,
    Property::NewLoans,
    Property::Gdp,
    Property::Productivity,
    Property::Gini,
];

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::Period => "period",
            Property::PopSize => "pop-size",
            Property::NumEmployed => "num-employed",
            Property::NumUnemployed => "num-unemployed",
            Property::PctEmployed => "pct-employed",
            Property::PctUnemployed => "pct-unemployed",
            Property::NumFirms => "num-firms",
            Property::BusSize => "bus-size",
            Property::NumHired => "num-hired",
            Property::NumFired => "num-fired",
            Property::Wages => "wages",
            Property::AvgWage => "avg-wage",
            Property::Bonuses => "bonuses",
            Property::Dedns => "dedns",
            Property::IncomeTax => "income-tax",
            Property::SalesTax => "sales-tax",
            Property::Consumption => "consumption",
            Property::Benefits => "benefits",
            Property::Procurement => "procurement",
            Property::GovSupport => "gov-support",
            Property::GovExp => "gov-exp",
            Property::GovRecpts => "gov-recpts",
            Property::Deficit => "deficit",
            Property::GovBal => "gov-bal",
            Property::DomBal => "dom-bal",
            Property::AmountOwed => "amount-owed",
            Property::NewLoans => "new-loans",
            Property::Gdp => "gdp",
            Property::Productivity => "productivity",
            Property::Gini => "gini",
        }
    }

    /// Look a property up by its stable name
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::stats::Property;
    ///
    /// assert_eq!(Property::from_name("gov-bal"), Some(Property::GovBal));
    /// assert_eq!(Property::from_name("GovBal"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Property> {
        DEFAULT_ORDER.iter().copied().find(|p| p.name() == name)
    }

    /// Properties this one is computed from
    pub fn depends_on(&self) -> &'static [Property] {
        match self {
            Property::NumUnemployed => &[Property::PopSize, Property::NumEmployed],
            Property::PctEmployed => &[Property::PopSize, Property::NumEmployed],
            Property::PctUnemployed => &[Property::PopSize, Property::PctEmployed],
            Property::BusSize => &[Property::NumEmployed, Property::NumFirms],
            Property::AvgWage => &[Property::Wages, Property::NumEmployed],
            Property::GovExp => &[Property::Benefits, Property::Procurement, Property::GovSupport],
            Property::Deficit => &[Property::GovExp, Property::GovRecpts],
            Property::Gdp => &[Property::Consumption, Property::Procurement],
            _ => &[],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Property::Period => "current period",
            Property::PopSize => "worker accounts in existence",
            Property::NumEmployed => "workers with an employer",
            Property::NumUnemployed => "workers without an employer",
            Property::PctEmployed => "employed as % of workers",
            Property::PctUnemployed => "unemployed as % of workers",
            Property::NumFirms => "firms, including the state-supported firm",
            Property::BusSize => "mean employees per firm",
            Property::NumHired => "hires this period",
            Property::NumFired => "firings this period",
            Property::Wages => "gross wages paid this period",
            Property::AvgWage => "gross wages per employed worker",
            Property::Bonuses => "bonuses paid this period",
            Property::Dedns => "employer deductions paid this period",
            Property::IncomeTax => "income tax collected this period",
            Property::SalesTax => "sales tax collected this period",
            Property::Consumption => "worker purchases this period",
            Property::Benefits => "unemployment benefit paid this period",
            Property::Procurement => "government procurement this period",
            Property::GovSupport => "unbudgeted support of the state-supported firm",
            Property::GovExp => "total government expenditure",
            Property::GovRecpts => "total government receipts",
            Property::Deficit => "expenditure less receipts",
            Property::GovBal => "government balance",
            Property::DomBal => "sum of worker and firm balances",
            Property::AmountOwed => "outstanding firm borrowing",
            Property::NewLoans => "bank lending this period",
            Property::Gdp => "consumption plus procurement",
            Property::Productivity => "employment-weighted productivity per 100 population",
            Property::Gini => "Gini coefficient of average wages",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::from_name(s).ok_or_else(|| ConfigError::UnknownProperty(s.to_string()))
    }
}

/// Check that every property is listed once, after all of its dependencies
///
/// # Example
/// ```
/// use econ_sim_core::stats::{validate_order, Property};
///
/// assert!(validate_order(&[Property::Wages, Property::NumEmployed, Property::AvgWage]).is_ok());
/// assert!(validate_order(&[Property::AvgWage, Property::Wages, Property::NumEmployed]).is_err());
/// ```
pub fn validate_order(order: &[Property]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for property in order {
        for dependency in property.depends_on() {
            if !seen.contains(dependency) {
                return Err(ConfigError::PropertyOrder {
                    property: property.name().to_string(),
                    dependency: dependency.name().to_string(),
                });
            }
        }
        if !seen.insert(*property) {
            return Err(ConfigError::DuplicateProperty(property.name().to_string()));
        }
    }
    Ok(())
}
