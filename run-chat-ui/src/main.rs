//! Terminal chat UI: wires the Gemini provider, the chat orchestrator, and
//! the terminal adaptor into a runnable app.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tably_adaptor_terminal::{TerminalAdaptor, TerminalConfig};
use tably_core::{ChatOrchestrator, GatewayState};
use tably_provider_gemini::{GeminiClient, GeminiConfig};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gemini API key (falls back to GEMINI_API_KEY)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = tably_core::DEFAULT_MODEL)]
    model: String,

    /// CSV file to preload as the primary table
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Dictionary file to preload (.csv or .xlsx)
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Start with AI analysis disabled
    #[arg(long)]
    no_analysis: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is not up yet, so a broken .env is reported on stderr; the
    // app still starts with whatever the system environment provides
    if let Err(e) = tably_core::load_env() {
        eprintln!("⚠️  {}", e);
    }
    tably_core::init_logging();

    let cli = Cli::parse();

    let gateway = match configure_gateway(&cli) {
        Ok(client) => {
            info!("Gemini gateway ready (model: {})", client.model());
            GatewayState::ready(client)
        }
        Err(e) => {
            // Reported once; the app keeps running with chat disabled
            error!("{}", e);
            GatewayState::disabled(e.to_string())
        }
    };

    let orchestrator = ChatOrchestrator::new(gateway);
    let mut adaptor = TerminalAdaptor::new(TerminalConfig::default(), orchestrator);

    if cli.no_analysis {
        adaptor.session_mut().set_analysis_enabled(false);
    }
    if let Some(path) = &cli.csv {
        match adaptor.load_table_file(path) {
            Ok(()) => info!("Preloaded table from {}", path.display()),
            Err(e) => error!("Could not preload {}: {}", path.display(), e),
        }
    }
    if let Some(path) = &cli.dict {
        match adaptor.load_dictionary_file(path) {
            Ok(()) => info!("Preloaded dictionary from {}", path.display()),
            Err(e) => error!("Could not preload {}: {}", path.display(), e),
        }
    }

    adaptor.run().await?;
    Ok(())
}

fn configure_gateway(cli: &Cli) -> tably_core::Result<GeminiClient> {
    let config = match &cli.api_key {
        Some(key) => GeminiConfig::new(key.clone()).with_model(cli.model.clone()),
        None => GeminiConfig::from_env()?.with_model(cli.model.clone()),
    };
    GeminiClient::configure(config)
}
