//! Neurovolve CLI - evolve and inspect topology-evolving networks.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Neurovolve - evolve neural-network topologies with a genetic algorithm
#[derive(Parser, Debug)]
#[command(name = "neurovolve")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a roster on the built-in XOR task
    Evolve {
        /// Roster file to write after every generation (default: timestamped file)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        /// Brains per generation
        #[arg(short, long, default_value = "200")]
        population: usize,

        /// Generations to run
        #[arg(short, long, default_value = "100")]
        generations: u32,

        /// Random seed (default: current time)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Continue from the roster in --output if it exists
        #[arg(short, long, requires = "output")]
        resume: bool,

        /// Probability of splitting each connection per mutation pass
        #[arg(long, default_value = "0.02")]
        node_rate: f64,

        /// Probability of adding a random connection per mutation pass
        #[arg(long, default_value = "0.1")]
        connection_rate: f64,

        /// Parallel evaluation threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Summarize the networks in a saved roster
    Inspect {
        /// Roster file (.json)
        #[arg(required = true)]
        roster: std::path::PathBuf,

        /// Only show net N
        #[arg(short, long)]
        net: Option<usize>,

        /// Input nodes per net (default: read from the roster)
        #[arg(long)]
        inputs: Option<usize>,

        /// Output nodes per net (default: read from the roster)
        #[arg(long)]
        outputs: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Evolve {
            output,
            population,
            generations,
            seed,
            resume,
            node_rate,
            connection_rate,
            threads,
            progress,
        } => cli::evolve::execute(&cli::evolve::EvolveArgs {
            output,
            population,
            generations,
            seed,
            resume,
            node_rate,
            connection_rate,
            threads,
            progress,
        }),

        Commands::Inspect {
            roster,
            net,
            inputs,
            outputs,
            format,
        } => cli::inspect::execute(&roster, net, inputs, outputs, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
