pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tierwise",
    about = "Subscription intelligence CLI",
    long_about = "Analyze account usage, recommend tier changes, assess churn risk, and \
                  compute segment pricing against the configured database.",
    after_help = "Examples:\n  tierwise migrate\n  tierwise seed\n  tierwise analyze --user 00000000-0000-0000-0000-00000000a002\n  tierwise pricing --user 00000000-0000-0000-0000-00000000a001"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo accounts (reseeding is idempotent)")]
    Seed,
    #[command(about = "Produce the full intelligence report for one account as JSON")]
    Analyze {
        #[arg(long, help = "Account UUID to analyze")]
        user: String,
    },
    #[command(about = "Compute segment-adjusted pricing for one account as JSON")]
    Pricing {
        #[arg(long, help = "Account UUID to price")]
        user: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Analyze { user } => commands::analyze::run(&user),
        Command::Pricing { user } => commands::pricing::run(&user),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TIERWISE_LOG_LEVEL")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
