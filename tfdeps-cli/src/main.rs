use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tfdeps_core::TfdepsError;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tfdeps")]
#[command(about = "Deployment-order resolver for Terraform stack trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the deployment order as a JSON list of stack paths
    Order {
        /// Root directory of the stack tree
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Invert the ordering (teardown: dependents before dependencies)
        #[arg(short, long)]
        reverse: bool,

        /// Limit how many directory levels below the root are searched
        #[arg(long)]
        max_depth: Option<usize>,

        /// Also write the dependency graph in DOT form to stderr
        #[arg(long)]
        dot: bool,
    },

    /// Print the dependency graph in Graphviz DOT format
    Graph {
        /// Root directory of the stack tree
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Limit how many directory levels below the root are searched
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Order { root, reverse, max_depth, dot } => {
            commands::order(&root, reverse, max_depth, dot)
        }
        Commands::Graph { root, max_depth } => commands::graph(&root, max_depth),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Map error kinds to distinct exit codes so pipeline stages can branch on
/// the failure class without parsing stderr.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<TfdepsError>() {
        Some(TfdepsError::Unreadable { .. }) => 2,
        Some(TfdepsError::MalformedDescriptor { .. }) => 3,
        Some(TfdepsError::UnknownDependency { .. }) => 4,
        Some(TfdepsError::CircularDependency { .. }) => 5,
        _ => 1,
    }
}

/// Logging goes to stderr so stdout stays machine-consumable. Quiet by
/// default; override with RUST_LOG.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
