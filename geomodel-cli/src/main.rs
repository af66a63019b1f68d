mod cli;
mod commands;
mod config;
mod error;
mod input;

use clap::Parser;
use cli::{Cli, Commands};
use commands::query::{Predicate, QueryOpts};
use commands::summary::Summary;
use error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet   → off
    // --verbose → RUST_LOG if set, otherwise info
    // default   → off; RUST_LOG alone does not turn logs on
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        exit_with_error(e);
    }
}

async fn run(cli: Cli) -> error::CliResult<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize { file, expr } => {
            commands::normalize::run(expr.as_deref(), file.as_deref(), &config)
        }

        Commands::Project { file, expr, kinds } => {
            commands::project::run(expr.as_deref(), file.as_deref(), &kinds, &config)
        }

        Commands::Centroid { file, expr } => commands::summary::run(
            Summary::Centroid,
            expr.as_deref(),
            file.as_deref(),
            &config,
        ),

        Commands::CenterOfMass { file, expr } => commands::summary::run(
            Summary::CenterOfMass,
            expr.as_deref(),
            file.as_deref(),
            &config,
        ),

        Commands::Query {
            records,
            within,
            intersects,
            near,
            distance,
            filters,
            limit,
        } => {
            let predicate = match (within.as_deref(), intersects.as_deref(), near.as_deref()) {
                (Some(g), _, _) => Predicate::Within(g),
                (_, Some(g), _) => Predicate::Intersects(g),
                (_, _, Some(g)) => Predicate::Near {
                    geometry: g,
                    distance,
                },
                (None, None, None) => {
                    return Err(error::CliError::Usage(
                        "one of --within, --intersects or --near is required".to_string(),
                    ))
                }
            };
            let opts = QueryOpts {
                records: &records,
                predicate,
                filters: &filters,
                limit,
            };
            commands::query::run(opts, config).await
        }
    }
}
