#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Dusk Defence headless and reports the result.

mod autopilot;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dusk_defence_runtime::{Simulation, SimulationConfig};
use dusk_defence_system_wave_scheduler::SchedulingPolicy;
use dusk_defence_world::query;

use crate::{
    autopilot::Autopilot,
    report::{Outcome, RunReport, Tally, DEFAULT_VICTORY_THRESHOLD},
};

/// Command-line arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(name = "dusk-defence", about = "Runs a headless Dusk Defence simulation")]
struct CliArgs {
    /// TOML configuration file; built-in tuning is used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Stops once the clock has wrapped past midnight this many times.
    #[arg(long, default_value_t = 3)]
    days: u32,
    /// Simulated milliseconds per step.
    #[arg(long = "dt-ms", default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    dt_ms: u64,
    /// Overrides the configured wave trigger.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Ledger total that ends the run in victory.
    ///
    /// The stock starting ledger of 800 already meets the default, so a run
    /// on stock settings ends in victory on its first step. Raise this or
    /// shrink `starting_resources` for a contested run.
    #[arg(long, default_value_t = DEFAULT_VICTORY_THRESHOLD)]
    victory_threshold: u64,
    /// Harvest resource nodes and repair worn structures automatically.
    #[arg(long)]
    autopilot: bool,
    /// Format of the final report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Night,
    Autonomous,
}

impl From<PolicyArg> for SchedulingPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Night => SchedulingPolicy::NightTriggered,
            PolicyArg::Autonomous => SchedulingPolicy::Autonomous,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }
}

/// Entry point for the Dusk Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = build_config(&args)?;
    let seed = config.seed;
    let mut simulation = Simulation::new(config).context("invalid simulation configuration")?;
    if args.report == ReportFormat::Text {
        println!("{}", query::welcome_banner(simulation.world()));
    }

    let (outcome, tally) = run(&mut simulation, &args);
    let report = RunReport::new(seed, outcome, &simulation, tally);
    match args.report {
        ReportFormat::Text => println!("{report}"),
        ReportFormat::Json => println!("{}", report.to_json().context("serializing report")?),
    }
    Ok(())
}

fn build_config(args: &CliArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(policy) = args.policy {
        config.scheduler.policy = policy.into();
    }
    Ok(config)
}

/// Steps the simulation until the controller reaches a verdict or the day
/// limit is hit.
fn run(simulation: &mut Simulation, args: &CliArgs) -> (Outcome, Tally) {
    let dt = Duration::from_millis(args.dt_ms);
    let mut tally = Tally::default();
    let mut autopilot = Autopilot::default();
    let mut actions = Vec::new();
    let mut outcome = Outcome::Ongoing;

    while simulation.days_survived() <= args.days {
        let events = simulation.step(dt);
        tally.record(&events);

        if args.autopilot {
            autopilot.observe(&events);
            autopilot.plan(&simulation.structures(), &mut actions);
            for action in actions.drain(..) {
                let events = simulation.submit(action);
                tally.record(&events);
                autopilot.observe(&events);
            }
        }

        outcome = Outcome::evaluate(
            simulation.base_alive(),
            simulation.total_resources(),
            args.victory_threshold,
        );
        if outcome != Outcome::Ongoing {
            tracing::info!(%outcome, day = simulation.days_survived(), "run decided");
            break;
        }
    }

    (outcome, tally)
}
