// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    services::{auth::AuthService, report_service::ReportService},
    upstream::{CatalogSource, UpstreamRepository},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub upstream_api_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub upstream_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        // O .env é opcional: em produção as variáveis vêm do ambiente
        dotenvy::dotenv().ok();

        let upstream_api_url =
            env::var("UPSTREAM_API_URL").context("UPSTREAM_API_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("UPSTREAM_TIMEOUT_SECS inválido: {raw}"))?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            upstream_api_url,
            jwt_secret,
            bind_addr,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub auth_service: AuthService,
    pub report_service: ReportService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let upstream = UpstreamRepository::new(&settings.upstream_api_url, settings.upstream_timeout)
            .context("Falha ao criar o cliente HTTP da API de origem")?;

        tracing::info!("✅ Cliente da API de origem configurado para {}", settings.upstream_api_url);

        Ok(Self::from_parts(settings, Arc::new(upstream)))
    }

    // Monta o gráfico de dependências com qualquer fonte de dados (útil em testes)
    pub fn from_parts(settings: Settings, source: Arc<dyn CatalogSource>) -> Self {
        let auth_service = AuthService::new(settings.jwt_secret.clone());
        let report_service = ReportService::new(source);

        Self {
            settings: Arc::new(settings),
            auth_service,
            report_service,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_keeps_the_loaded_settings() {
        let settings = Settings {
            upstream_api_url: "http://localhost:9".to_string(),
            jwt_secret: "segredo".to_string(),
            bind_addr: "127.0.0.1:4000".to_string(),
            upstream_timeout: Duration::from_secs(3),
        };
        let source = UpstreamRepository::new(&settings.upstream_api_url, settings.upstream_timeout).unwrap();

        let state = AppState::from_parts(settings, Arc::new(source));

        assert_eq!(state.settings.bind_addr, "127.0.0.1:4000");
        assert_eq!(state.settings.upstream_timeout, Duration::from_secs(3));
    }
}
