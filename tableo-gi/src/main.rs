//! tableo-gi - Guest Import Microservice
//!
//! Turns uploaded seating charts (CSV, Excel, text) into normalized guest
//! records for an event: local heuristics first, generative extraction as
//! the fallback, duplicate-safe naming, chunked persistence.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tableo_gi::services::ExtractionClient;
use tableo_gi::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tableo-gi (Guest Import) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load TOML config (missing file yields defaults)
    let config_path = tableo_common::config::config_file_path()
        .map_err(|e| anyhow::anyhow!("Failed to locate config: {}", e))?;
    let toml_config = tableo_common::config::load_toml_config(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // Resolve data folder and open the database
    let env_data_folder = std::env::var("TABLEO_DATA_FOLDER").ok();
    let data_folder =
        tableo_common::config::resolve_data_folder(env_data_folder.as_deref(), &toml_config);
    let db_path = tableo_common::config::database_path(&data_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize data folder: {}", e))?;
    info!("Database: {}", db_path.display());

    let db_pool = tableo_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Extraction service is required up front; the fallback path must be
    // ready before the first complex upload
    let extraction_config = tableo_gi::config::resolve_extraction_config(&toml_config)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let extractor = ExtractionClient::new(extraction_config)
        .map_err(|e| anyhow::anyhow!("Failed to create extraction client: {}", e))?;

    // Create application state
    let state = AppState::new(db_pool, extractor);

    // Build router
    let app = tableo_gi::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:5741").await?;
    info!("Listening on http://127.0.0.1:5741");
    info!("Health check: http://127.0.0.1:5741/health");

    axum::serve(listener, app).await?;

    Ok(())
}
