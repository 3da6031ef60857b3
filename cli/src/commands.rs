//! CLI command implementations.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use econ_sim_core::params::{ModelRegistry, SettingsFile};
use econ_sim_core::stats::{StatsStore, DEFAULT_ORDER};
use econ_sim_core::{
    Economy, EconomyConfig, EconomySnapshot, ModelConfig, ParamKey, Parameters, RngSeed,
    RunControls, RunSummary, SimulationError,
};
use serde::Serialize;
use tracing::{debug, info};

pub struct RunArgs {
    pub model: Option<PathBuf>,
    pub model_name: Option<String>,
    pub periods: Option<usize>,
    pub seed: Option<u64>,
    pub unseeded: bool,
    pub population: Option<usize>,
    pub json: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    state: EconomySnapshot,
    stats: &'a StatsStore,
}

impl<'a> RunReport<'a> {
    fn new(economy: &'a Economy, outcome: &'a Result<RunSummary, SimulationError>) -> Self {
        Self {
            summary: outcome.as_ref().ok(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            state: economy.snapshot(),
            stats: economy.stats(),
        }
    }
}

/// Run one model to completion and print its results.
pub fn run(args: RunArgs) -> Result<()> {
    let model = load_model(args.model.as_ref(), args.model_name.as_deref())?;
    debug!(model = %model.name, pages = model.pages.len(), "model loaded");

    let mut controls = RunControls::default();
    if let Some(periods) = args.periods {
        controls.iterations = periods;
    }
    if let Some(population) = args.population {
        controls.population = population;
        controls.government_employees = controls.government_employees.min(population);
    }
    if let Some(seed) = args.seed {
        controls.seed = RngSeed::Fixed(seed);
    } else if args.unseeded {
        controls.seed = RngSeed::Entropy;
    }

    let name = model.name.clone();
    let mut economy =
        Economy::new(EconomyConfig::new(model, controls)).context("construct economy")?;
    info!(model = %name, seed = economy.seed(), "starting run");
    let outcome = economy.run();

    // Series captured before a failure are still reported.
    if args.json {
        let report = RunReport::new(&economy, &outcome);
        let out = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{out}");
    } else {
        match &outcome {
            Ok(summary) => print_summary(&name, summary),
            Err(_) => println!(
                "run: model={} seed={} stopped at period={}",
                name,
                economy.seed(),
                economy.current_period()
            ),
        }
        print_series(economy.stats());
    }
    outcome.context("run economy")?;
    Ok(())
}

/// Pick the model to run: the built-in default, or one from a settings file.
fn load_model(path: Option<&PathBuf>, name: Option<&str>) -> Result<ModelConfig> {
    let Some(path) = path else {
        if let Some(name) = name {
            bail!("--model-name {} needs a settings file (--model)", name);
        }
        return Ok(ModelConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let settings: SettingsFile = serde_json::from_str(&text)
        .with_context(|| format!("parse {}", path.display()))?;
    let (registry, warnings) = ModelRegistry::from_settings(&settings)
        .with_context(|| format!("bind models in {}", path.display()))?;
    debug!(warnings = warnings.len(), "models bound");

    let chosen = match name {
        Some(name) => name,
        None => match registry.names().as_slice() {
            [only] => *only,
            [] => bail!("{} defines no models", path.display()),
            names => bail!(
                "{} defines several models ({}); pick one with --model-name",
                path.display(),
                names.join(", ")
            ),
        },
    };
    let model = registry.get(chosen).context("select model")?;
    Ok(model.clone())
}

fn print_summary(name: &str, summary: &RunSummary) {
    println!(
        "run: model={} run_id={} seed={} periods={} final_period={}",
        name, summary.run_id, summary.seed, summary.periods_run, summary.final_period
    );
    println!("run: config_hash={}", summary.config_hash);
}

fn print_series(stats: &StatsStore) {
    println!(
        "{:<16} {:>14} {:>14} {:>14} {:>14}",
        "property", "last", "min", "max", "mean"
    );
    for property in stats.order() {
        let Some(series) = stats.series(*property) else {
            continue;
        };
        let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        println!(
            "{:<16} {:>14} {:>14} {:>14} {:>14}",
            property.name(),
            cell(series.last()),
            cell(series.min()),
            cell(series.max()),
            cell(series.mean()),
        );
    }
}

/// List every tracked property, in capture order.
pub fn list_properties() -> Result<()> {
    for property in DEFAULT_ORDER {
        let deps: Vec<&str> = property.depends_on().iter().map(|p| p.name()).collect();
        if deps.is_empty() {
            println!("{:<16} {}", property.name(), property.description());
        } else {
            println!(
                "{:<16} {} [{}]",
                property.name(),
                property.description(),
                deps.join(", ")
            );
        }
    }
    Ok(())
}

/// List every parameter key with its built-in default.
pub fn list_params() -> Result<()> {
    let defaults = Parameters::default();
    for key in ParamKey::ALL {
        println!(
            "{:<22} {:>8} {}",
            key.as_str(),
            defaults.get(key),
            key.description()
        );
    }
    Ok(())
}
