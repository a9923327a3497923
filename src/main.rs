//! Den Ecology - headless runner
//!
//! Builds a layout, spawns the starting population and runs whole days,
//! printing one line (or one JSON object) per day.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use den_ecology::core::config::SimulationConfig;
use den_ecology::core::error::Result;
use den_ecology::core::types::Species;
use den_ecology::simulation::runner::{DayReport, Ecosystem};
use den_ecology::world::placement::LayoutFile;

/// Headless predator/prey ecosystem runner
#[derive(Parser, Debug)]
#[command(name = "den-ecology")]
#[command(about = "Run the den ecology simulation and report daily population counts")]
struct Args {
    /// Number of days to simulate
    #[arg(long, default_value_t = 5)]
    days: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<String>,

    /// JSON layout file; a generated layout is used when absent
    #[arg(long)]
    layout: Option<String>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Starting top predators
    #[arg(long, default_value_t = 3)]
    top: usize,

    /// Starting mid predators
    #[arg(long, default_value_t = 9)]
    mid: usize,

    /// Starting prey
    #[arg(long, default_value_t = 40)]
    prey: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("den_ecology=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut eco = match &args.layout {
        Some(path) => Ecosystem::new(config, &LayoutFile::load(path)?, seed),
        None => Ecosystem::demo(config, seed),
    };

    for (species, count) in [
        (Species::TopPredator, args.top),
        (Species::MidPredator, args.mid),
        (Species::Prey, args.prey),
    ] {
        let spawned = eco.populate(species, count);
        if spawned < count {
            tracing::warn!(species = species.name(), wanted = count, spawned, "not enough open ground");
        }
    }

    tracing::info!(seed, days = args.days, "simulation starting");

    let json = args.format == "json";
    for _ in 0..args.days {
        let report = eco.run_day();
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &DayReport) {
    println!(
        "Day {:>3}: top {:>3}  mid {:>3}  prey {:>4} | born {:>3}  restocked {:>3} | died: combat {:>3}  curfew {:>3}  overnight {:>3}  attrition {:>3}",
        report.day,
        report.counts.top_predator,
        report.counts.mid_predator,
        report.counts.prey,
        report.births,
        report.spawned,
        report.deaths_combat,
        report.deaths_curfew,
        report.deaths_overnight,
        report.deaths_attrition,
    );
}
