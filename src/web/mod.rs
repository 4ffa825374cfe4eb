//! HTTP interface for the listing service.
//!
//! Handlers stay thin: writes go through the ingestion service, reads are
//! answered from the in-memory item index, and image serving delegates to
//! the image store.

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{Config, WebConfig},
    database::Database,
    image_store::ImageStore,
    index::ItemIndex,
    services::IngestionService,
};

pub mod handlers;

pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(
        config: Config,
        database: Database,
        image_store: ImageStore,
        index: ItemIndex,
    ) -> Result<Self> {
        let state = AppState {
            ingestion_service: IngestionService::new(database, image_store.clone(), index.clone()),
            image_store,
            index,
        };
        let app = Self::create_router(&config.web, state)?;
        let addr = format!("{}:{}", config.web.host, config.web.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Build the full router. Public so tests can drive the application
    /// without binding a socket.
    pub fn create_router(web: &WebConfig, state: AppState) -> Result<Router> {
        // The browser front-end is the only allowed cross-origin caller.
        let front_origin = web
            .front_url
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid front_url: {}", web.front_url))?;
        let cors = CorsLayer::new()
            .allow_origin(front_origin)
            .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE]);

        Ok(Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/items", get(handlers::list_items).post(handlers::add_item))
            .route("/items/:id", get(handlers::get_item))
            .route("/search", get(handlers::search_items))
            .route("/image/:filename", get(handlers::get_image))
            // Middleware (applied in reverse order)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            // Shared state
            .with_state(state))
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: IngestionService,
    pub image_store: ImageStore,
    pub index: ItemIndex,
}
