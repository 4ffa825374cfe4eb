use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar::{
    config::Config, database::Database, image_store::ImageStore, index::ItemIndex, web::WebServer,
};

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(version = "0.1.0")]
#[command(about = "A small marketplace listing service with content-addressed image storage")]
#[command(long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// IP address to bind
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL, overriding the config file
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Image directory, overriding the config file
    #[arg(short = 'i', long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    // tower_http request traces are only worth the noise at trace level
    let default_filter = if log_level == "trace" {
        format!("bazaar={log_level},tower_http=trace")
    } else {
        format!("bazaar={log_level}")
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    info!("Starting bazaar v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // CLI flags win over the config file
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }
    if let Some(images_dir) = cli.images_dir {
        config.storage.image_root = images_dir;
    }

    info!("Using database: {}", config.database.url);

    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database connection established and migrations applied");

    let image_store = ImageStore::new(config.storage.image_root.clone());
    image_store.ensure_storage_dirs().await?;
    info!("Image store ready at: {}", config.storage.image_root.display());

    // Warm the in-memory index from the repository; reads never touch
    // storage after this point.
    let index = ItemIndex::new();
    index.replace_all(database.load_all_items().await?).await;
    info!("Item index loaded with {} items", index.len().await);

    let web_server = WebServer::new(config, database, image_store, index)?;

    info!(
        "Web server listening on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
