//! Wiring & DI. Entry point: load config, open the store, inject into the
//! service, serve HTTP. No business logic here.

use dotenv::dotenv;
use eco_community::adapters::avatar::RandomAvatarPicker;
use eco_community::adapters::http::{self, AppState, HttpSettings};
use eco_community::adapters::persistence::{MemoryRepo, SqliteRepo};
use eco_community::ports::{CommunityPort, PostStore, UserStore};
use eco_community::shared::config::{AppConfig, StorageKind};
use eco_community::usecases::CommunityService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });
    let http_settings =
        HttpSettings::from_parts(&cfg.user_header_or_default(), cfg.cors_origin.as_deref())?;

    // --- Stores: one handle for the process lifetime, dropped after shutdown ---
    let (users, posts): (Arc<dyn UserStore>, Arc<dyn PostStore>) = match cfg.storage_or_default()
    {
        StorageKind::Sqlite => {
            let data_dir = PathBuf::from(cfg.data_dir_or_default());
            let repo = Arc::new(
                SqliteRepo::connect(&data_dir)
                    .await
                    .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
            );
            info!(path = %repo.db_path().display(), "using SQLite storage");
            (Arc::clone(&repo) as Arc<dyn UserStore>, repo as Arc<dyn PostStore>)
        }
        StorageKind::Memory => {
            warn!("using in-memory storage; data is lost on restart");
            let repo = Arc::new(MemoryRepo::new());
            (Arc::clone(&repo) as Arc<dyn UserStore>, repo as Arc<dyn PostStore>)
        }
    };

    // --- Service ---
    let community: Arc<dyn CommunityPort> = Arc::new(CommunityService::new(
        users,
        posts,
        Arc::new(RandomAvatarPicker),
    ));

    let app = http::router(AppState { community }, &http_settings);

    let address = cfg.bind_address();
    info!(%address, "binding");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("bind {} failed: {}", address, e))?;

    http::serve(listener, app).await?;

    Ok(())
}
