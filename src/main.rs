//! csv-pager server entry point
//!
//! Loads configuration, sets up logging and starts the HTTP service.

use anyhow::Context;
use csv_pager::{HttpServer, PagerConfig, PagerMetrics, PagerService, RedisProvider};
use std::env;
use std::sync::Arc;
use tracing::info;

/// Start the csv-pager server
///
/// # Usage
/// ```bash
/// # Start with default config (csv_pager.yaml, falling back to defaults)
/// cargo run
///
/// # Start with custom config
/// cargo run -- /path/to/config.yaml
/// ```
///
/// Redis connection settings may be overridden with `REDIS_HOST`,
/// `REDIS_PORT`, `REDIS_USERNAME` and `REDIS_PASSWORD`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("Starting csv-pager");

    let mut config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            PagerConfig::from_file(&path).context("failed to load configuration")?
        }
        None => {
            info!("No config file given, using defaults");
            PagerConfig::default()
        }
    };
    config.redis.apply_env().context("invalid environment overrides")?;
    config.validate().context("invalid configuration")?;

    info!("  - Listen address: {}", config.listen_address);
    info!("  - Page sizes: {:?}", config.page_sizes);
    info!("  - Cache TTL: {} seconds", config.cache_ttl);
    info!("  - Fetch timeout: {} ms", config.fetch_timeout_ms);
    info!("  - Redis: {}:{}", config.redis.host, config.redis.port);

    let addr = config
        .listen_address
        .parse()
        .context("invalid listen address")?;

    let cache = Arc::new(RedisProvider::new(&config.redis).context("failed to set up redis")?);
    let metrics = PagerMetrics::new().context("failed to register metrics")?;
    let service = PagerService::new(Arc::new(config), cache, metrics)
        .context("failed to create service")?;

    HttpServer::new(Arc::new(service), addr)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))
}
