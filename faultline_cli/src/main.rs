use clap::{Parser, Subcommand};

use crate::{matrix::MatrixArgs, solve::SolveArgs};

mod matrix;
mod parsers;
mod registry;
mod solve;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign faulted substations to response teams at minimum total distance
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Print the team x fault distance matrix
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Solve { args } => solve::run(args),
        Commands::Matrix { args } => matrix::run(args),
    }
}
