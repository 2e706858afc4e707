use std::sync::Arc;

use catalog_api::app::{self, SharedStore};
use catalog_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = ApiConfig::from_env()?;
    let store = open_store(&config).await?;
    let app = app::build_app(store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn open_store(config: &ApiConfig) -> anyhow::Result<SharedStore> {
    match &config.database_url {
        Some(url) => {
            let store = catalog_products::PostgresProductStore::connect(url).await?;
            tracing::info!("using postgres product store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory product store");
            Ok(Arc::new(catalog_products::InMemoryProductStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &ApiConfig) -> anyhow::Result<SharedStore> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the `postgres` feature");
    }
    Ok(Arc::new(catalog_products::InMemoryProductStore::new()))
}
