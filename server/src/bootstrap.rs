use history_db::Database;

use crate::app::SharedState;
use crate::config::AppConfig;
use crate::identity;
use crate::server::assets;
use crate::services::logos::LogoService;

/// Create directories, open the database, load the cookie key and seed logos.
pub fn init_foundation(config: AppConfig) -> Result<SharedState, anyhow::Error> {
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(config.logos_dir())?;

    let db_path = config.db_path();
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let cookie_key = identity::load_or_create_key(&db)?;

    let logos = LogoService::new(config.logos_dir(), db.clone());
    if let Err(e) = logos.seed_defaults(assets::default_logos()) {
        tracing::error!("Failed to seed default logos: {e}");
    }

    tracing::info!(
        port = config.server_port,
        logos = %config.logos_dir().display(),
        "Foundation initialized"
    );
    Ok(SharedState::new(db, config, cookie_key))
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
