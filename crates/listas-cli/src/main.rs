use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod inspect;
mod publish;
mod run;

#[derive(Debug, Parser)]
#[command(name = "listas")]
#[command(about = "Provider price lists to storefront catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract, price and merge the day's list from each provider
    Run {
        /// Only process this provider (slug or name)
        #[arg(long)]
        provider: Option<String>,
        /// Day to process, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Report what would be merged without writing any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse a single message file and print the priced products
    Parse {
        file: PathBuf,
        /// Apply this provider's greeting phrases (slug or name)
        #[arg(long)]
        provider: Option<String>,
    },
    /// Rewrite the broadcast text from the public catalog
    Broadcast {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Rewrite the audit spreadsheet from the private catalog
    Audit {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List the configured providers
    Providers,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = listas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run {
            provider,
            date,
            dry_run,
        }) => run::run_daily(&config, provider.as_deref(), date, dry_run),
        Some(Commands::Parse { file, provider }) => {
            inspect::run_parse(&config, &file, provider.as_deref())
        }
        Some(Commands::Broadcast { date }) => publish::run_broadcast(&config, date),
        Some(Commands::Audit { date }) => publish::run_audit(&config, date),
        Some(Commands::Providers) => inspect::run_providers(&config),
        None => {
            println!("listas: no command given; see `listas --help`");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
