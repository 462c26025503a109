//! CLI command implementations

use std::path::PathBuf;

use clap::Subcommand;
use spyglass_core::config::SpyglassConfig;
use spyglass_core::crypto::SettingsSealer;
use spyglass_core::query::{
    MediaIntent, YearMode, detect_media_intent, is_specific_title_query, split_title_year,
};
use spyglass_core::settings::UserSettings;
use spyglass_core::tracing_setup::{CliLogLevel, init_tracing};
use spyglass_core::{Result, SpyglassError};
use spyglass_web::run_server;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the addon server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Console log level
        #[arg(long, default_value_t = CliLogLevel::Info)]
        log_level: CliLogLevel,
        /// Directory for full debug logs
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },
    /// Show how the query pipeline reads a request
    Interpret {
        /// The query to interpret
        query: String,
    },
    /// Seal a settings JSON file into an addon token
    Seal {
        /// Path to the settings JSON file
        settings: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            log_level,
            logs_dir,
        } => serve(host, port, log_level, logs_dir).await,
        Commands::Interpret { query } => interpret(&query),
        Commands::Seal { settings } => seal(settings),
    }
}

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    log_level: CliLogLevel,
    logs_dir: Option<PathBuf>,
) -> Result<()> {
    init_tracing(log_level.as_tracing_level(), logs_dir.as_deref()).map_err(|e| {
        SpyglassError::Configuration {
            reason: format!("failed to initialize tracing: {e}"),
        }
    })?;

    let mut config = SpyglassConfig::from_env();
    if let Some(host) = host {
        config.http.bind_address = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    run_server(config).await.map_err(|e| SpyglassError::WebServer {
        reason: e.to_string(),
    })
}

fn interpret(query: &str) -> Result<()> {
    let specific = is_specific_title_query(query);
    let intent = detect_media_intent(query);
    let (title, year) = split_title_year(query, YearMode::ParenthesizedThenTrailing);

    println!("query:    {query}");
    println!(
        "reading:  {}",
        if specific {
            "specific title lookup"
        } else {
            "discovery request"
        }
    );
    println!(
        "medium:   {}",
        match intent {
            MediaIntent::Movie => "movies",
            MediaIntent::Series => "series",
            MediaIntent::Unknown => "unclear",
        }
    );
    println!("title:    {title}");
    match year {
        Some(year) => println!("year:     {year}"),
        None => println!("year:     none"),
    }

    Ok(())
}

fn seal(settings_path: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&settings_path)?;
    let settings: UserSettings =
        serde_json::from_str(&raw).map_err(|e| SpyglassError::Configuration {
            reason: format!("settings file is not valid settings JSON: {e}"),
        })?;

    let config = SpyglassConfig::from_env();
    let sealer = SettingsSealer::new(&config.http.seal_secret);
    let token = sealer.seal(&settings)?;

    println!("token:    {token}");
    println!("manifest: /{token}/manifest.json");
    Ok(())
}
