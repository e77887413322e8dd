mod report;

use std::fs::File;
use std::time::Instant;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use cachelib::cache::CacheTrait;
use cachelib::config::load_config;
use cachelib::io::get_reader;
use cachelib::simulator::Simulator;
use cachelib::trace::TraceSchema;
use crate::report::{ConfigBlock, StatsBlock};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Schema {
    /// `L`/`S` in column 7, address in column 9
    Flagged,
    /// `LD`/`ST` in column 0, address in column 2
    Mnemonic,
}

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative cache simulator, replays a load/store trace and reports hit/miss statistics"))]
struct Args {
    /// Cache configuration, `key = value` lines or a .json file
    config: String,
    /// Load/store trace
    trace: String,

    /// Column layout of the trace
    #[arg(long, value_enum, default_value_t = Schema::Flagged)]
    schema: Schema,

    /// Zero-based column holding the load/store token, overrides the schema
    #[arg(long)]
    kind_column: Option<usize>,

    /// Zero-based column holding the hexadecimal address, overrides the schema
    #[arg(long)]
    address_column: Option<usize>,

    /// Token marking a load, overrides the schema
    #[arg(long)]
    load_token: Option<String>,

    /// Token marking a store, overrides the schema
    #[arg(long)]
    store_token: Option<String>,

    /// Seed for the random replacement policy
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the resolved configuration before the statistics
    #[arg(long)]
    print_config: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long)]
    debug: bool,

    /// More logging on stderr, repeat for more detail. RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn trace_schema(&self) -> TraceSchema {
        let mut schema = match self.schema {
            Schema::Flagged => TraceSchema::flagged(),
            Schema::Mnemonic => TraceSchema::mnemonic(),
        };
        if let Some(column) = self.kind_column {
            schema.kind_column = column;
        }
        if let Some(column) = self.address_column {
            schema.address_column = column;
        }
        if let Some(token) = &self.load_token {
            schema.load_token = token.clone();
        }
        if let Some(token) = &self.store_token {
            schema.store_token = token.clone();
        }
        schema
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(&args.config).map_err(|e| format!("Couldn't load the config file at path {}: {e}", args.config))?;
    let schema = args.trace_schema();
    info!(config = %args.config, trace = %args.trace, ?schema, "Starting simulation");
    let mut simulator = Simulator::with_seed(&config, schema, args.seed).map_err(|e| format!("Invalid cache configuration: {e}"))?;
    let trace_file = File::open(&args.trace).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace_reader = get_reader(trace_file).map_err(|e| format!("Couldn't read the trace file: {e}"))?;
    simulator.simulate(trace_reader).map_err(|e| format!("Couldn't simulate the trace file {}: {e}", args.trace))?;
    let report = simulator.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        if args.print_config {
            println!("{}", ConfigBlock(&config));
        }
        print!("{}", StatsBlock(&report));
    }
    if args.performance {
        let simulation_time = simulator.get_execution_time();
        let total_time = start.elapsed();
        eprintln!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        eprintln!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        eprintln!("Running the debug binary. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        eprintln!("Parsed input configuration: {config:?}");
        eprintln!("Uninitialised cache lines: {} of {}", simulator.cache().get_uninitialised_line_count(), config.num_lines());
        eprintln!("Skipped trace records: {}", simulator.skipped_records());
    }
    Ok(())
}
