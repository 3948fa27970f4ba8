use clap::Parser;
use docrag::cli::handle_ask;
use docrag::cli::handle_check;
use docrag::cli::handle_config_command;
use docrag::cli::handle_ingest;
use docrag::cli::handle_query;
use docrag::cli::handle_serve_api;
use docrag::cli::Cli;
use docrag::cli::Commands;
use docrag::config::AppConfig;
use docrag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already carry the key
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        docrag::logging::init_logging_with_level("debug")?;
    } else {
        docrag::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Serve { host, port, cors } => {
            let api_key = config.api_key()?;
            handle_serve_api(&config, &api_key, host, port, cors).await?;
        }
        Commands::Ask { mode } => {
            let api_key = config.api_key()?;
            handle_ask(&config, &api_key, mode.into()).await?;
        }
        Commands::Query {
            question,
            k,
            no_answer,
            mode,
        } => {
            let api_key = config.api_key()?;
            handle_query(&config, &api_key, question, k, no_answer, mode.map(Into::into)).await?;
        }
        Commands::Ingest { force } => {
            let api_key = config.api_key()?;
            handle_ingest(&config, &api_key, force).await?;
        }
        Commands::Check => {
            handle_check(&config).await?;
        }
        Commands::Config => {
            handle_config_command(&config)?;
        }
    }

    Ok(())
}
