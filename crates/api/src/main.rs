use papeleria_api::{app::build_app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    papeleria_observability::init();

    let config = ApiConfig::from_env()?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, backend = %config.backend_url, "listening");

    axum::serve(listener, build_app(config)).await?;
    Ok(())
}
