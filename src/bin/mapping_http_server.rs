use clap::Parser;
use log::{error, info};
use schema_mapper::{AppState, MappingConfig, MappingHttpServer};

/// Command line options for the HTTP server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP server
    #[arg(long, default_value_t = 8001)]
    port: u16,
}

/// Main entry point for the mapping HTTP server.
///
/// # Environment Variables
///
/// * `OPENAI_API_KEY` - API key for the model provider (required)
/// * `OPENAI_MODEL` - Model identifier (default: gpt-4.1-mini)
/// * `OPENAI_BASE_URL` - Chat-completions API base URL
///
/// Variables may also come from a `.env` file in the working directory.
///
/// # Errors
///
/// Returns an error if the API key is missing or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    schema_mapper::logging::init().ok();
    info!("Starting mapping HTTP server...");

    let Cli { host, port } = Cli::parse();

    let config = MappingConfig::from_env().map_err(|e| {
        error!("Refusing to start: {}", e);
        e
    })?;
    info!(
        "Using model {} at {} (API key {})",
        config.model,
        config.base_url,
        config.api_key_masked()
    );

    let state = AppState::from_config(config)?;
    let bind_address = format!("{}:{}", host, port);
    MappingHttpServer::new(state, &bind_address).run().await?;

    Ok(())
}
