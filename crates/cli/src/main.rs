//! Trace-driven cache simulator CLI.
//!
//! This binary replays a valgrind memory trace against a set-associative LRU
//! cache and reports the resulting counts. It performs:
//! 1. **Configuration:** Layers an optional JSON config file under the `-s/-E/-b/-t` flags and validates the result.
//! 2. **Simulation:** Streams the trace through the simulator, optionally echoing each record's outcome (`-v`).
//! 3. **Reporting:** Prints `hits:<n> misses:<n> evictions:<n>` (or JSON) and writes the results file.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::common::{ConfigError, SimError, TraceError};
use cachesim_core::config::{CacheConfig, CacheGeometry, SimConfig};
use cachesim_core::stats::{ConsoleSink, JsonSink, ResultsFileSink, SimStats, StatsSink, emit_all};
use cachesim_core::trace::TraceReader;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative LRU cache simulator",
    long_about = "Replay a valgrind memory trace against a set-associative LRU cache and count hits, misses, and evictions.\n\nExamples:\n  cachesim -s 4 -E 1 -b 4 -t traces/yi.trace\n  cachesim -s 8 -E 2 -b 4 -t traces/trans.trace -v\n  cachesim --config cache.json -t traces/long.trace --json"
)]
struct Cli {
    /// Number of set index bits (the cache has 2^s sets).
    #[arg(short = 's', value_name = "num")]
    set_bits: Option<u32>,

    /// Number of lines per set (associativity).
    #[arg(short = 'E', value_name = "num")]
    ways: Option<usize>,

    /// Number of block offset bits (blocks are 2^b bytes).
    #[arg(short = 'b', value_name = "num")]
    block_bits: Option<u32>,

    /// Trace file to replay.
    #[arg(short = 't', value_name = "file")]
    trace: Option<PathBuf>,

    /// Print every data record with its outcome.
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long, value_name = "file")]
    config: Option<PathBuf>,

    /// Where to write the `<hits> <misses> <evictions>` record.
    #[arg(long, value_name = "file")]
    results: Option<PathBuf>,

    /// Print the summary as JSON instead of the one-line format.
    #[arg(long)]
    json: bool,
}

/// Fully resolved run parameters.
#[derive(Debug)]
struct RunPlan {
    geometry: CacheGeometry,
    trace: PathBuf,
    verbose: bool,
    results: PathBuf,
    json: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("cachesim: {e}");
        if matches!(e, SimError::Config(ConfigError::Missing(_) | ConfigError::NonPositive { .. })) {
            let _ = Cli::command().print_help();
        }
        process::exit(1);
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Merges the config file (if any) with command-line flags and validates the result.
fn resolve(cli: &Cli) -> Result<RunPlan, ConfigError> {
    let config = match &cli.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };

    let flags = CacheConfig {
        set_bits: cli.set_bits,
        block_bits: cli.block_bits,
        ways: cli.ways,
    };
    let geometry = config.cache.merge(&flags).validate()?;
    let trace = cli
        .trace
        .clone()
        .or(config.trace)
        .ok_or(ConfigError::Missing("t"))?;

    Ok(RunPlan {
        geometry,
        trace,
        verbose: cli.verbose || config.verbose,
        results: cli.results.clone().unwrap_or(config.results_path),
        json: cli.json,
    })
}

/// Runs one simulation end to end and emits the report.
fn run(cli: &Cli) -> Result<SimStats, SimError> {
    let plan = resolve(cli)?;
    tracing::debug!(?plan, "resolved configuration");

    let reader = TraceReader::open(&plan.trace).map_err(|e| match e {
        TraceError::Io(source) => SimError::Config(ConfigError::Io {
            path: plan.trace.clone(),
            source,
        }),
        other => SimError::Trace(other),
    })?;

    let mut sim = Simulator::new(plan.geometry);
    let stats = if plan.verbose {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "simulation starting and reading from {}", plan.trace.display());
        sim.run_with(reader, |record, outcome| {
            let _ = writeln!(out, "{record} {outcome}");
        })?
    } else {
        sim.run(reader)?
    };

    let mut results = ResultsFileSink::new(&plan.results);
    let mut console: Box<dyn StatsSink> = if plan.json {
        Box::new(JsonSink::new(io::stdout()))
    } else {
        Box::new(ConsoleSink::new(io::stdout()))
    };
    emit_all(&stats, &mut [console.as_mut(), &mut results])?;
    Ok(stats)
}
