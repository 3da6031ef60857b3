//! Page conditions
//!
//! A conditional page applies when its condition holds against the most
//! recently captured property values. Comparisons use the same epsilon
//! tolerance for equality as the rest of the engine's float comparisons.

use crate::params::ConfigError;
use crate::stats::{Property, PropertySnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Epsilon for floating point equality comparison
const FLOAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (with epsilon tolerance)
    #[serde(rename = "==")]
    Equal,

    #[serde(rename = "!=")]
    NotEqual,

    #[serde(rename = "<")]
    Less,

    #[serde(rename = ">")]
    Greater,

    /// Less than or equal (with epsilon tolerance)
    #[serde(rename = "<=")]
    LessOrEqual,

    /// Greater than or equal (with epsilon tolerance)
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
        }
    }

    /// Apply the operator to `left op right`
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::params::Operator;
    ///
    /// assert!(Operator::Equal.apply(0.1 + 0.2, 0.3));
    /// assert!(Operator::GreaterOrEqual.apply(5.0, 5.0));
    /// assert!(!Operator::Less.apply(5.0, 5.0));
    /// ```
    pub fn apply(&self, left: f64, right: f64) -> bool {
        let close = (left - right).abs() < FLOAT_EPSILON;
        match self {
            Operator::Equal => close,
            Operator::NotEqual => !close,
            Operator::Less => left < right,
            Operator::Greater => left > right,
            Operator::LessOrEqual => left <= right || close,
            Operator::GreaterOrEqual => left >= right || close,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    /// Accepts both the ASCII and the mathematical spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Operator::Equal),
            "!=" | "≠" | "<>" => Ok(Operator::NotEqual),
            "<" => Ok(Operator::Less),
            ">" => Ok(Operator::Greater),
            "<=" | "≤" => Ok(Operator::LessOrEqual),
            ">=" | "≥" => Ok(Operator::GreaterOrEqual),
            other => Err(ConfigError::UnknownOperator(other.to_string())),
        }
    }
}

/// When a conditional page applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Matches unconditionally
    Always,

    /// `property op threshold` against the latest captured value
    Compare {
        property: Property,
        op: Operator,
        threshold: f64,
    },
}

impl Condition {
    pub fn compare(property: Property, op: Operator, threshold: f64) -> Self {
        Condition::Compare {
            property,
            op,
            threshold,
        }
    }

    /// Evaluate against a snapshot
    ///
    /// A comparison on a property with no captured value does not match.
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::params::{Condition, Operator};
    /// use econ_sim_core::stats::{Property, PropertySnapshot};
    ///
    /// let cond = Condition::compare(Property::PctUnemployed, Operator::Greater, 10.0);
    /// assert!(!cond.evaluate(&PropertySnapshot::new()));
    ///
    /// let snapshot: PropertySnapshot = [(Property::PctUnemployed, 12.5)].into_iter().collect();
    /// assert!(cond.evaluate(&snapshot));
    /// ```
    pub fn evaluate(&self, snapshot: &PropertySnapshot) -> bool {
        match self {
            Condition::Always => true,
            Condition::Compare {
                property,
                op,
                threshold,
            } => snapshot
                .get(*property)
                .map_or(false, |value| op.apply(value, *threshold)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => f.write_str("always"),
            Condition::Compare {
                property,
                op,
                threshold,
            } => write!(f, "{} {} {}", property, op, threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spellings() {
        assert_eq!("=".parse::<Operator>(), Ok(Operator::Equal));
        assert_eq!("≠".parse::<Operator>(), Ok(Operator::NotEqual));
        assert_eq!("≤".parse::<Operator>(), Ok(Operator::LessOrEqual));
        assert_eq!(" >= ".parse::<Operator>(), Ok(Operator::GreaterOrEqual));
        assert_eq!(
            "=>".parse::<Operator>(),
            Err(ConfigError::UnknownOperator("=>".to_string()))
        );
    }

    #[test]
    fn test_not_equal_respects_epsilon() {
        assert!(!Operator::NotEqual.apply(1.0, 1.0 + 1e-12));
        assert!(Operator::NotEqual.apply(1.0, 1.001));
    }

    #[test]
    fn test_always_matches_empty_snapshot() {
        assert!(Condition::Always.evaluate(&PropertySnapshot::new()));
    }

    #[test]
    fn test_condition_json_shape() {
        let cond: Condition = serde_json::from_str(
            r#"{"kind": "compare", "property": "gov-bal", "op": "<", "threshold": -1000.0}"#,
        )
        .unwrap();
        assert_eq!(cond, Condition::compare(Property::GovBal, Operator::Less, -1000.0));
    }
}
