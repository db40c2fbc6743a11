//! `pi-calculator` command-line tool.
//!
//! # Examples
//!
//! Compare every method with the default parameters:
//! ```sh
//! pi-calculator
//! ```
//!
//! Reproducible Monte Carlo run, JSON output:
//! ```sh
//! pi-calculator --json estimate monte-carlo --param 1000000 --seed 42
//! ```
//!
//! Leibniz vs Monte Carlo sweep:
//! ```sh
//! pi-calculator sweep --max 1000000 --step 100000
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use pi_calculator::{
    config::Config,
    error::validate_count,
    harness::{ComparisonRecord, ComparisonReport, Dispersion, ErrorPolicy, Harness, SweepSeries},
    monte_carlo::{convergence_trace, TraceFrame},
    random::sampling_rng,
    Method, MethodSpec,
};
use serde::Serialize;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pi-calculator", version)]
#[command(about = "Estimate π with several methods and compare them", long_about = None)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    /// Record failing methods and keep going instead of stopping
    #[arg(long, global = true)]
    continue_on_error: bool,
    /// Defaults to `compare`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every configured method once and compare them
    Compare {
        /// Monte Carlo seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a single method
    Estimate {
        method: Method,
        /// Terms, iterations, digits or samples, depending on the method
        #[arg(long, allow_negative_numbers = true)]
        param: Option<i64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate Leibniz and Monte Carlo at step, 2·step, … up to max
    Sweep {
        #[arg(long)]
        max: Option<u64>,
        #[arg(long)]
        step: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Cumulative Monte Carlo estimate per frame, as JSON
    Trace {
        #[arg(long, default_value_t = 1_000)]
        points_per_frame: u64,
        #[arg(long, default_value_t = 100)]
        frames: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Repeat one method and report the spread of its estimates
    Dispersion {
        method: Method,
        #[arg(long, allow_negative_numbers = true)]
        param: Option<i64>,
        #[arg(long, default_value_t = 5)]
        runs: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path).wrap_err("loading config")?,
        None => Config::default(),
    };
    let policy = if cli.continue_on_error {
        ErrorPolicy::Continue
    } else {
        config.error_policy
    };
    let harness = Harness::new().with_policy(policy);

    match cli.command.unwrap_or(Command::Compare { seed: None }) {
        Command::Compare { seed } => {
            let config = Config {
                seed: seed.or(config.seed),
                ..config
            };
            let specs = config.method_specs();
            info!(methods = specs.len(), "comparing methods");
            let report = harness.compare(&specs)?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
        Command::Estimate {
            method,
            param,
            seed,
        } => {
            let spec = resolve_spec(&config, method, param, seed)?;
            info!(%spec, "estimating");
            let record = harness.run_one(&spec)?;
            if cli.json {
                print_json(&record)?;
            } else {
                print_record(&record);
            }
        }
        Command::Sweep { max, step, seed } => {
            let max = max.unwrap_or(config.sweep.max);
            let step = step.unwrap_or(config.sweep.step);
            info!(max, step, "sweeping");
            let series = harness.sweep(
                &[Method::Leibniz, Method::MonteCarlo],
                max,
                step,
                seed.or(config.seed),
            )?;
            if cli.json {
                print_json(&series)?;
            } else {
                print_sweep(&series);
            }
        }
        Command::Trace {
            points_per_frame,
            frames,
            seed,
        } => {
            let mut rng = sampling_rng(seed.or(config.seed));
            let trace: Vec<TraceFrame> = convergence_trace(points_per_frame, frames, &mut rng)?;
            print_json(&trace)?;
        }
        Command::Dispersion {
            method,
            param,
            runs,
            seed,
        } => {
            let spec = resolve_spec(&config, method, param, seed)?;
            info!(%spec, runs, "measuring dispersion");
            let dispersion = harness.dispersion(&spec, runs)?;
            if cli.json {
                print_json(&dispersion)?;
            } else {
                print_dispersion(&dispersion);
            }
        }
    }
    Ok(())
}

fn resolve_spec(
    config: &Config,
    method: Method,
    param: Option<i64>,
    seed: Option<u64>,
) -> Result<MethodSpec> {
    let mut spec = config.spec_for(method);
    if let Some(param) = param {
        spec.parameter = validate_count(method.parameter_name(), param)?;
    }
    if method.is_stochastic() && seed.is_some() {
        spec.seed = seed;
    }
    Ok(spec)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_record(record: &ComparisonRecord) {
    println!("{} ({} = {}):", record.method, record.method.parameter_name(), record.parameter);
    match &record.decimal {
        Some(decimal) => println!("  value:          {decimal}"),
        None => println!("  value:          {:.10}", record.value),
    }
    println!("  absolute error: {:.10e}", (record.value - std::f64::consts::PI).abs());
    println!("  relative error: {:.3e}", record.relative_error);
    println!("  time:           {:.3}s", record.elapsed_secs);
}

fn print_report(report: &ComparisonReport) {
    println!("reference π: {}", std::f64::consts::PI);
    for record in &report.records {
        println!();
        print_record(record);
    }
    for failure in &report.failures {
        println!();
        println!("{} ({}) failed: {}", failure.method, failure.parameter, failure.error);
    }
}

fn print_sweep(series: &[SweepSeries]) {
    println!("{:<14} {:>12} {:>14} {:>10}", "method", "n", "rel. error", "time (s)");
    for s in series {
        for point in &s.points {
            println!(
                "{:<14} {:>12} {:>14.3e} {:>10.4}",
                s.method, point.parameter, point.relative_error, point.elapsed_secs
            );
        }
    }
}

fn print_dispersion(d: &Dispersion) {
    println!("{} ({} = {}), {} runs:", d.method, d.method.parameter_name(), d.parameter, d.runs);
    println!("  mean:    {:.10}", d.mean);
    println!("  std dev: {:.3e}", d.std_dev);
    println!("  range:   [{:.10}, {:.10}]", d.min, d.max);
}
