// src/middleware/branch.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::auth::request_locale,
};

// O nome do nosso cabeçalho HTTP customizado
pub const BRANCH_ID_HEADER: &str = "x-branch-id";

// Sede escolhida no seletor da interface. Ausente = "todas as sedes".
// Só tem efeito para SUPER_ADMIN; ver `AccessScope::resolve`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchContext(pub Option<i64>);

impl BranchContext {
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(BranchContext(None)),
            Some(raw) => raw
                .parse::<i64>()
                .map(|id| BranchContext(Some(id)))
                .map_err(|_| AppError::InvalidBranchHeader),
        }
    }
}

impl<S> FromRequestParts<S> for BranchContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = match parts.headers.get(BRANCH_ID_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| AppError::InvalidBranchHeader)),
            None => None,
        }
        .transpose()
        .and_then(BranchContext::parse);

        header_value.map_err(|err| {
            let app_state = AppState::from_ref(state);
            err.to_api_error(&request_locale(parts), &app_state.i18n_store)
        })
    }
}
