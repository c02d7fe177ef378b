mod audit;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use misima_core::parse_description;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "misima-cli")]
#[command(about = "Content tools for the Don Misima storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse one product description and print its attributes as JSON.
    Parse {
        /// The description text, e.g. "Collection- Maria, Format- Robusto, ...".
        description: String,
    },
    /// Check every product in a collection for malformed descriptions.
    Audit {
        /// Collection handle; defaults to `MISIMA_COLLECTION_HANDLE`.
        #[arg(long)]
        collection: Option<String>,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { description } => match parse_description(&description) {
            Ok(descriptor) => {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("{}", serde_json::to_string_pretty(&e)?);
                eprintln!("error: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Commands::Audit { collection, json } => {
            let config = misima_core::load_app_config()?;
            let client = misima_storefront::StorefrontClient::from_config(&config)
                .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;
            let handle = collection.unwrap_or_else(|| config.collection_handle.clone());

            let report =
                audit::run_audit(&client, &handle, config.collection_page_size).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }

            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

#[cfg(test)]
mod tests;
