//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use reports_backend::{
    build_router,
    config::{AppState, Settings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let settings = Settings::from_env().inspect_err(|e| {
        tracing::error!("🔥 Falha ao carregar a configuração: {:#}", e);
    })?;

    let app_state = AppState::new(settings)?;

    // Inicia o servidor
    let listener = TcpListener::bind(&app_state.settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", app_state.settings.bind_addr);

    axum::serve(listener, build_router(app_state)).await?;
    Ok(())
}
