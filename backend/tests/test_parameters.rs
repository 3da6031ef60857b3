//! Parameter Tests
//!
//! Binding of settings pages, conditional overrides and their effect on a
//! running economy.

use econ_sim_core::params::{
    Condition, ConditionalPage, ConfigError, ModelConfig, ModelRegistry, Operator, ParamKey,
    SettingsCondition, SettingsFile, SettingsPage,
};
use econ_sim_core::stats::{Property, PropertySnapshot};
use econ_sim_core::{Economy, EconomyConfig, SimulationError, WorkerId};

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_all_operators() {
    let snapshot: PropertySnapshot = [(Property::NumFirms, 5.0)].into_iter().collect();
    let cases = [
        ("=", 5.0, true),
        ("==", 4.0, false),
        ("≠", 4.0, true),
        ("!=", 5.0, false),
        ("<", 6.0, true),
        ("<", 5.0, false),
        (">", 4.0, true),
        (">", 5.0, false),
        ("≤", 5.0, true),
        ("<=", 4.0, false),
        ("≥", 5.0, true),
        (">=", 6.0, false),
    ];
    for (op, threshold, expected) in cases {
        let op: Operator = op.parse().unwrap();
        let cond = Condition::compare(Property::NumFirms, op, threshold);
        assert_eq!(cond.evaluate(&snapshot), expected, "{} {}", op, threshold);
    }
}

#[test]
fn test_page_order_decides_conflicts() {
    let model = ModelConfig::new("layers")
        .with_page(ConditionalPage::new(Condition::Always).with(ParamKey::LoanProb, 10.0))
        .with_page(
            ConditionalPage::new(Condition::compare(Property::GovBal, Operator::Less, 0.0))
                .with(ParamKey::LoanProb, 90.0),
        );

    let solvent: PropertySnapshot = [(Property::GovBal, 100.0)].into_iter().collect();
    let indebted: PropertySnapshot = [(Property::GovBal, -100.0)].into_iter().collect();

    assert_eq!(model.parameter_value(ParamKey::LoanProb, &PropertySnapshot::new()), 10.0);
    assert_eq!(model.parameter_value(ParamKey::LoanProb, &solvent), 10.0);
    assert_eq!(model.parameter_value(ParamKey::LoanProb, &indebted), 90.0);
    // untouched keys keep page 0's value
    assert_eq!(model.parameter_value(ParamKey::BusInterest, &indebted), 2.0);
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_settings_file_binding() {
    let json = r#"{
        "models": {
            "baseline": [
                {"label": "defaults", "values": {
                    "propensity-to-consume": 80, "income-threshold": 50,
                    "income-tax-rate": 20, "sales-tax-rate": 10,
                    "pre-tax-dedns-rate": 10, "unempl-benefit-rate": 60,
                    "reserve-rate": 50, "prop-invest": 50, "boe-interest": 1,
                    "bus-interest": 2, "loan-prob": 50, "capex-recoup-periods": 10,
                    "firm-creation-prob": 10, "govt-procurement": 0
                }},
                {"label": "slump", "condition": {"property": "pct-unemployed", "op": "≥", "threshold": "15"},
                 "values": {"govt-procurement": 4}}
            ],
            "sparse": [ {"values": {"income-tax-rate": 30}} ]
        }
    }"#;
    let settings: SettingsFile = serde_json::from_str(json).unwrap();
    let (registry, warnings) = ModelRegistry::from_settings(&settings).unwrap();

    assert_eq!(registry.names(), vec!["baseline", "sparse"]);
    // baseline is complete; sparse misses 13 keys
    assert_eq!(warnings.len(), 13);

    let baseline = registry.get("baseline").unwrap();
    assert_eq!(baseline.pages[0].label.as_deref(), Some("slump"));
    assert_eq!(
        baseline.pages[0].condition,
        Condition::compare(Property::PctUnemployed, Operator::GreaterOrEqual, 15.0)
    );

    let sparse = registry.get("sparse").unwrap();
    assert_eq!(sparse.defaults.income_tax_rate, 30.0);
    assert_eq!(sparse.defaults.sales_tax_rate, 10.0);
}

#[test]
fn test_binding_fails_fast_on_bad_names() {
    let pages = vec![
        SettingsPage::new(),
        SettingsPage::new()
            .when(SettingsCondition::new("pct-employed", ">", "50"))
            .set("loan-probability", 1.0),
    ];
    assert_eq!(
        ModelConfig::bind("typo", &pages).unwrap_err(),
        ConfigError::UnknownParameter("loan-probability".to_string())
    );
}

#[test]
fn test_duplicate_model_rejected() {
    let mut registry = ModelRegistry::with_default();
    assert_eq!(
        registry.register(ModelConfig::default()).unwrap_err(),
        ConfigError::DuplicateModel("default".to_string())
    );
}

#[test]
fn test_non_finite_override_rejected_at_construction() {
    let mut config = EconomyConfig::default();
    config.model = ModelConfig::new("broken")
        .with_page(ConditionalPage::new(Condition::Always).with(ParamKey::IncomeTaxRate, f64::NAN));
    assert!(matches!(
        Economy::new(config),
        Err(SimulationError::Config(ConfigError::NonFiniteValue { .. }))
    ));
}

// ============================================================================
// Conditional pages in a running economy
// ============================================================================

/// Two workers, one unemployed for the whole run, no ordinary firms
fn benefit_economy(model: ModelConfig) -> Economy {
    let mut config = EconomyConfig::default();
    config.model = model;
    config.controls.population = 2;
    config.controls.government_employees = 2;
    config.controls.startups = 0;
    config.model.defaults.firm_creation_prob = 0.0;
    config.model.defaults.unempl_benefit_rate = 60.0;
    let mut economy = Economy::new(config).unwrap();
    economy.fire(WorkerId(1), 0).unwrap();
    economy
}

#[test]
fn test_override_applies_from_the_period_after_the_condition_holds() {
    let model = ModelConfig::new("cut").with_page(
        ConditionalPage::new(Condition::compare(Property::Period, Operator::GreaterOrEqual, 3.0))
            .with(ParamKey::UnemplBenefitRate, 0.0),
    );
    let mut economy = benefit_economy(model);
    economy.run_periods(5).unwrap();

    let benefits: Vec<f64> = economy
        .stats()
        .series(Property::Benefits)
        .unwrap()
        .points()
        .iter()
        .map(|(_, v)| *v)
        .collect();
    assert_eq!(benefits, vec![60.0, 60.0, 60.0, 0.0, 0.0]);
    assert_eq!(economy.parameters().unempl_benefit_rate, 0.0);
}

#[test]
fn test_condition_on_untracked_property_is_rejected() {
    let model = ModelConfig::new("inert").with_page(
        ConditionalPage::new(Condition::compare(Property::PctUnemployed, Operator::Greater, 10.0))
            .with(ParamKey::UnemplBenefitRate, 0.0),
    );
    let mut config = EconomyConfig::default();
    config.model = model;
    config.tracked = vec![Property::Period, Property::Benefits];

    match Economy::new(config) {
        Err(SimulationError::Config(ConfigError::UntrackedProperty { model, page, property })) => {
            assert_eq!(model, "inert");
            assert_eq!(page, 1);
            assert_eq!(property, "pct-unemployed");
        }
        other => panic!("expected untracked property error, got {:?}", other.err()),
    }
}

#[test]
fn test_condition_on_tracked_property_is_accepted() {
    let model = ModelConfig::new("live").with_page(
        ConditionalPage::new(Condition::compare(Property::PctUnemployed, Operator::Greater, 10.0))
            .with(ParamKey::UnemplBenefitRate, 0.0),
    );
    let mut config = EconomyConfig::default();
    config.model = model;
    config.tracked = vec![
        Property::Period,
        Property::PopSize,
        Property::NumEmployed,
        Property::NumUnemployed,
        Property::PctUnemployed,
    ];
    assert!(Economy::new(config).is_ok());
}

#[test]
fn test_always_condition_in_settings_applies_every_period() {
    let json = r#"{
        "models": {
            "flat": [
                {"values": {"unempl-benefit-rate": 60}},
                {"condition": {"property": "always", "op": "=", "threshold": ""},
                 "values": {"unempl-benefit-rate": 0}}
            ]
        }
    }"#;
    let settings: SettingsFile = serde_json::from_str(json).unwrap();
    let (registry, _) = ModelRegistry::from_settings(&settings).unwrap();
    let model = registry.get("flat").unwrap();
    assert_eq!(model.pages[0].condition, Condition::Always);
    assert_eq!(
        model.parameter_value(ParamKey::UnemplBenefitRate, &PropertySnapshot::new()),
        0.0
    );
}
