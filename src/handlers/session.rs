// src/handlers/session.rs

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    middleware::{auth::AuthenticatedUser, branch::BranchContext},
    services::scope::{AccessScope, Capabilities},
};

// O que a interface precisa saber para montar menus e o seletor de sede
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[schema(example = "admin.centro")]
    pub username: String,
    pub scope: AccessScope,
    pub capabilities: Capabilities,
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Session",
    responses(
        (status = 200, description = "Serviço no ar", body = String)
    )
)]
pub async fn health() -> &'static str {
    "OK"
}

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Escopo resolvido e permissões de exibição", body = SessionInfo),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_session(user: AuthenticatedUser, branch: BranchContext) -> impl IntoResponse {
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let session = SessionInfo {
        username: user.claims.sub.clone(),
        capabilities: scope.capabilities(),
        scope,
    };

    (StatusCode::OK, Json(session))
}
