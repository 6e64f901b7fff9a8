use std::process::ExitCode;

use tracing::{error, info, warn};

use folio::{Config, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config_path =
        std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = folio::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        folio::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }
    if config.uses_dev_secret() {
        warn!("SESSION_SECRET is not set; using the development secret");
    }

    info!("folio - portfolio site for {}", config.site.owner_name);

    let server = match WebServer::from_config(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
