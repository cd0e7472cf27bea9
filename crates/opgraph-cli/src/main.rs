//! opgraph command-line tool.
//!
//! Loads a graph description (see `opgraph_core::GraphFile`) and runs one of
//! the structural analyses on it, printing the result as JSON on stdout.
//!
//! Exit codes: 0 = success, 1 = analysis failure, 3 = I/O or parse error.
//! Set `RUST_LOG=opgraph_analysis=trace` to see traversal logs on stderr.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Dependency-graph diagnostics for operation/variable graphs.
#[derive(Parser)]
#[command(name = "opgraph", about = "Dependency-graph diagnostics for operation/variable graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Graph input shared by every subcommand.
#[derive(Args)]
struct GraphArgs {
    /// Path to the JSON graph description.
    #[arg(short, long)]
    graph: PathBuf,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print each operation's direct predecessor operations.
    Adjacency {
        #[command(flatten)]
        input: GraphArgs,
    },

    /// Report whether the operation dependencies contain a cycle.
    HasCycle {
        #[command(flatten)]
        input: GraphArgs,
    },

    /// Print one valid producer-before-consumer order of all operations.
    Toposort {
        #[command(flatten)]
        input: GraphArgs,
    },

    /// Match a canonical descriptor order against the graph's operations.
    Sequence {
        #[command(flatten)]
        input: GraphArgs,

        /// JSON array of descriptors; overrides the graph file's `sequence`.
        #[arg(short, long)]
        sequence: Option<PathBuf>,
    },

    /// Count weakly connected components.
    Components {
        #[command(flatten)]
        input: GraphArgs,

        /// Write a per-component node listing here when the graph is fragmented.
        #[arg(short, long, env = "OPGRAPH_SUB_GRAPH_DUMP")]
        dump: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Adjacency { input } => commands::adjacency(&input.graph),
        Commands::HasCycle { input } => commands::has_cycle(&input.graph),
        Commands::Toposort { input } => commands::toposort(&input.graph),
        Commands::Sequence { input, sequence } => {
            commands::sequence(&input.graph, sequence.as_deref())
        }
        Commands::Components { input, dump } => commands::components(&input.graph, dump),
    };

    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize result: {}\"}}", e)
            });
            println!("{}", json);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(err.exit_code());
        }
    }
}
