use std::sync::Arc;
use std::time::Duration;

use anime_recommender::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState, QuizStore},
    services::{
        providers::{CachingCatalogProvider, HttpCatalogProvider, StaticCatalogProvider},
        CatalogProvider, RandomSource, SeededRandom, SystemClock, ThreadRandom,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anime_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (catalog, cache_writer) = build_catalog_provider(&config).await?;

    let random: Arc<dyn RandomSource> = match config.rng_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded random source");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRandom),
    };

    let quizzes = QuizStore::new(
        Duration::from_secs(config.quiz_idle_ttl),
        config.max_quizzes,
    );
    let state = Arc::new(
        AppState::new(catalog, random, Arc::new(SystemClock)).with_quiz_store(quizzes),
    );
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Picks the catalog source from config, wrapping it in the Redis cache when enabled
async fn build_catalog_provider(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CatalogProvider>, Option<CacheWriterHandle>)> {
    let provider: Arc<dyn CatalogProvider> = match &config.catalog_file {
        Some(path) => Arc::new(StaticCatalogProvider::from_json_file(path).await?),
        None => {
            tracing::info!(url = %config.catalog_url, "Using catalog backend");
            Arc::new(HttpCatalogProvider::new(config.catalog_url.clone())?)
        }
    };

    let Some(redis_url) = &config.redis_url else {
        return Ok((provider, None));
    };

    let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
    tracing::info!(ttl = config.catalog_cache_ttl, "Catalog cache enabled");

    let cached = CachingCatalogProvider::new(provider, cache, config.catalog_cache_ttl);
    Ok((Arc::new(cached), Some(handle)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
