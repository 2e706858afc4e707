use catalog_gateway::{app, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        upstream = %config.catalog_api_url,
        service = %config.service_name,
        request_timeout_ms = config.request_timeout_ms(),
        health_check_timeout_ms = config.health_check_timeout_ms(),
        "gateway configured"
    );
    let app = app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
