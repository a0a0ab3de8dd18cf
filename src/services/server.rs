use anyhow::Result;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::load_alias_registry;
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::services::ingestion::IngestionService;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        self.config.require_admin_password()?;
        let store = SqliteStore::open(&self.config.database_path)?;
        let registry = load_alias_registry(self.config.alias_registry_path.as_deref())?;

        let ingestion = match IngestionService::from_config(store.clone(), &self.config) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!("Ingestion routes disabled: {:#}", e);
                None
            }
        };

        let state = Arc::new(AppState {
            store,
            config: self.config.clone(),
            registry,
            ingestion,
        });

        let app = create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
