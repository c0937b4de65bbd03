// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Datelike;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, branch::BranchContext, i18n::Locale},
    models::reports::{
        CourseSummary, DashboardOverview, EnrollmentProgress, MonthlyIncomeReport,
        ReportOverview, StudentDebt,
    },
    services::scope::AccessScope,
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MonthlyIncomeParams {
    /// Ano do relatório (padrão: ano corrente)
    #[validate(range(min = 2000, max = 2100, message = "O ano deve estar entre 2000 e 2100."))]
    pub year: Option<i32>,

    /// Filtro de sede (apenas SUPER_ADMIN)
    pub branch_id: Option<i64>,
}

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Cards do painel e tabelas resumidas", body = DashboardOverview),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    branch: BranchContext,
) -> impl IntoResponse {
    let scope = AccessScope::resolve(&user.claims, branch.0);
    let overview = app_state.report_service.dashboard(&user.token, &scope).await;

    (StatusCode::OK, Json(overview))
}

// GET /api/reports/overview
#[utoipa::path(
    get,
    path = "/api/reports/overview",
    tag = "Reports",
    responses(
        (status = 200, description = "Totais, alunos com saldo e resumo por curso", body = ReportOverview),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    branch: BranchContext,
) -> impl IntoResponse {
    let scope = AccessScope::resolve(&user.claims, branch.0);
    let overview = app_state.report_service.overview(&user.token, &scope).await;

    (StatusCode::OK, Json(overview))
}

// GET /api/reports/students-with-debt
#[utoipa::path(
    get,
    path = "/api/reports/students-with-debt",
    tag = "Reports",
    responses(
        (status = 200, description = "Alunos com saldo pendente, maior dívida primeiro", body = Vec<StudentDebt>),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_students_with_debt(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    branch: BranchContext,
) -> impl IntoResponse {
    let scope = AccessScope::resolve(&user.claims, branch.0);
    let debts = app_state
        .report_service
        .students_with_debt(&user.token, &scope)
        .await;

    (StatusCode::OK, Json(debts))
}

// GET /api/reports/course-summary
#[utoipa::path(
    get,
    path = "/api/reports/course-summary",
    tag = "Reports",
    responses(
        (status = 200, description = "Arrecadação por curso, maior receita primeiro", body = Vec<CourseSummary>),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_course_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    branch: BranchContext,
) -> impl IntoResponse {
    let scope = AccessScope::resolve(&user.claims, branch.0);
    let summaries = app_state
        .report_service
        .course_summary(&user.token, &scope)
        .await;

    (StatusCode::OK, Json(summaries))
}

// GET /api/reports/enrollments/{id}/progress
#[utoipa::path(
    get,
    path = "/api/reports/enrollments/{id}/progress",
    tag = "Reports",
    responses(
        (status = 200, description = "Progresso de pagamento da matrícula", body = EnrollmentProgress),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Matrícula inexistente ou fora do escopo")
    ),
    params(
        ("id" = i64, Path, description = "ID da matrícula"),
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_enrollment_progress(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Path(enrollment_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let progress = app_state
        .report_service
        .enrollment_progress(&user.token, &scope, enrollment_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(progress)))
}

// GET /api/reports/monthly-income
#[utoipa::path(
    get,
    path = "/api/reports/monthly-income",
    tag = "Reports",
    responses(
        (status = 200, description = "Vendas e recebimentos por mês e sede, mais recente primeiro", body = MonthlyIncomeReport),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    params(
        MonthlyIncomeParams,
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_monthly_income(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Query(params): Query<MonthlyIncomeParams>,
) -> Result<impl IntoResponse, ApiError> {
    params
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // O filtro explícito vence a sede do seletor
    let scope = AccessScope::resolve(&user.claims, params.branch_id.or(branch.0));
    let year = params.year.unwrap_or_else(|| chrono::Local::now().year());

    let report = app_state
        .report_service
        .monthly_income(&user.token, &scope, year)
        .await;

    Ok((StatusCode::OK, Json(report)))
}
