//! memobench - workload driver comparing memocache backends

mod report;
mod runner;
mod workload;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::report::OutputFormat;
use crate::runner::{run_fib, run_range, FibParams};
use crate::workload::WorkloadSpec;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Range-sum queries with point updates, without and with an LRU range cache
    Range {
        /// Array length
        #[arg(short = 'n', long, default_value_t = 100_000)]
        len: usize,

        /// Number of queries in the stream
        #[arg(short, long, default_value_t = 50_000)]
        queries: usize,

        /// Fraction of queries that are updates
        #[arg(short, long, default_value_t = 0.3)]
        update_ratio: f64,

        /// Largest element / update value
        #[arg(long, default_value_t = 1000)]
        max_value: i64,

        /// Cache capacity (number of ranges)
        #[arg(short, long, default_value_t = 1000)]
        capacity: usize,

        /// RNG seed for a reproducible workload
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Memoized Fibonacci: unbounded memo vs splay tree vs fixed-capacity LRU
    Fib {
        /// Largest argument in the sweep
        #[arg(short = 'n', long, default_value_t = 950)]
        max_n: u64,

        /// Distance between sweep points
        #[arg(long, default_value_t = 50)]
        step: u64,

        /// Timed calls per point and backend
        #[arg(short, long, default_value_t = 10)]
        repeats: u32,

        /// Capacity of the LRU memo
        #[arg(short, long, default_value_t = 64)]
        lru_capacity: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("memobench v{}", env!("CARGO_PKG_VERSION"));

    let output = match args.command {
        Command::Range {
            len,
            queries,
            update_ratio,
            max_value,
            capacity,
            seed,
        } => {
            info!("Array length: {}", len);
            info!("Queries: {} ({:.0}% updates)", queries, update_ratio * 100.0);
            info!("Cache capacity: {}", capacity);

            let spec = WorkloadSpec {
                len,
                queries,
                update_ratio,
                max_value,
                seed,
            };
            run_range(&spec, capacity)?.render(args.format)?
        }
        Command::Fib {
            max_n,
            step,
            repeats,
            lru_capacity,
        } => {
            info!("Sweep: n = 0..={} step {}, {} repeats", max_n, step, repeats);

            let params = FibParams {
                max_n,
                step,
                repeats,
                lru_capacity,
            };
            run_fib(&params)?.render(args.format)?
        }
    };

    println!("{}", output);
    Ok(())
}
