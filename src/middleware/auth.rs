// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::Claims,
};

pub(crate) fn request_locale(parts: &Parts) -> Locale {
    Locale::from_header(
        parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    )
}

// Extrator do usuário autenticado. Guarda o token bruto para repassar à API de origem.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = request_locale(parts);
        let reject = |err: AppError| err.to_api_error(&locale, &app_state.i18n_store);

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| reject(AppError::InvalidToken))?;

        let claims = app_state
            .auth_service
            .validate_token(bearer.token())
            .map_err(reject)?;

        Ok(AuthenticatedUser {
            claims,
            token: bearer.token().to_string(),
        })
    }
}
