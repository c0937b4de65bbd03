// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros do domínio. O texto do `#[error]` vai para o log; o usuário recebe a
// mensagem traduzida via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cabeçalho x-branch-id inválido")]
    InvalidBranchHeader,

    #[error("Matrícula {0} não encontrada")]
    EnrollmentNotFound(i64),

    // Falha de transporte ou JSON ilegível vindo da API de origem
    #[error("Erro ao consultar a API de origem: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("API de origem respondeu {status} para {collection}")]
    UpstreamStatus {
        collection: &'static str,
        status: u16,
    },
}

// Erro pronto para sair pela API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::InvalidBranchHeader => (StatusCode::BAD_REQUEST, "invalid_branch_header"),
            AppError::EnrollmentNotFound(_) => (StatusCode::NOT_FOUND, "enrollment_not_found"),
            AppError::Upstream(_) | AppError::UpstreamStatus { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream_unavailable")
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status.is_server_error() {
            tracing::error!("🔥 {}", self);
        }

        let details = match self {
            // Retorna todos os detalhes da validação, campo a campo
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError {
            status,
            message: store.message(&locale.0, key),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1))]
        page: usize,
    }

    #[test]
    fn validation_error_lists_fields() {
        let store = I18nStore::new();
        let errors = Probe { page: 0 }.validate().unwrap_err();

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.details.unwrap().get("page").is_some());
    }

    #[test]
    fn upstream_status_maps_to_bad_gateway() {
        let store = I18nStore::new();
        let err = AppError::UpstreamStatus {
            collection: "payments",
            status: 503,
        };

        let api = err.to_api_error(&Locale("es".into()), &store);

        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.message, store.message("es", "upstream_unavailable"));
    }
}
