mod check;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::check::CheckTarget;

#[derive(Debug, Parser)]
#[command(name = "leadgen")]
#[command(about = "Discover, score and export B2B learning leads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run discovery, enrichment, scoring and export once
    Run {
        /// Discovery query, e.g. "learning and development"
        #[arg(long)]
        query: String,

        /// Optional industry hint appended to the query
        #[arg(long)]
        industry: Option<String>,

        /// Minimum employee estimate to include
        #[arg(long, alias = "min_employees", default_value_t = 0)]
        min_employees: u32,
    },
    /// Verify credentials for an external service
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let settings = leadgen_core::load_settings_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run {
            query,
            industry,
            min_employees,
        } => {
            let request = leadgen_pipeline::RunRequest {
                query,
                industry,
                min_employees,
            };
            run::run_pipeline(&settings, &request).await
        }
        Commands::Check { target } => check::run_check(&settings, target).await,
    }
}

#[cfg(test)]
mod tests;
