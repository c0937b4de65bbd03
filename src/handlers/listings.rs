// src/handlers/listings.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, branch::BranchContext, i18n::Locale},
    models::{
        academic::{Course, Student},
        listing::{
            CourseCriteria, EnrollmentCriteria, EnrollmentRow, Page, PaymentCriteria, PaymentRow,
            StudentCriteria, DEFAULT_PER_PAGE,
        },
    },
    services::{report_service::PageRequest, scope::AccessScope},
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Página, começando em 1
    #[validate(range(min = 1, message = "A página começa em 1."))]
    pub page: usize,

    #[validate(range(min = 1, max = 100, message = "Itens por página entre 1 e 100."))]
    pub per_page: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageParams {
    fn checked(&self, locale: &Locale, app_state: &AppState) -> Result<PageRequest, ApiError> {
        self.validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))?;
        Ok(PageRequest {
            page: self.page,
            per_page: self.per_page,
        })
    }
}

// GET /api/listings/students
#[utoipa::path(
    get,
    path = "/api/listings/students",
    tag = "Listings",
    responses(
        (status = 200, description = "Alunos filtrados e paginados", body = Page<Student>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    params(
        PageParams,
        StudentCriteria,
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_students(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Query(paging): Query<PageParams>,
    Query(criteria): Query<StudentCriteria>,
) -> Result<impl IntoResponse, ApiError> {
    let page = paging.checked(&locale, &app_state)?;
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let students = app_state
        .report_service
        .list_students(&user.token, &scope, &criteria, page)
        .await;

    Ok((StatusCode::OK, Json(students)))
}

// GET /api/listings/courses
#[utoipa::path(
    get,
    path = "/api/listings/courses",
    tag = "Listings",
    responses(
        (status = 200, description = "Cursos filtrados e paginados", body = Page<Course>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    params(
        PageParams,
        CourseCriteria,
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_courses(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Query(paging): Query<PageParams>,
    Query(criteria): Query<CourseCriteria>,
) -> Result<impl IntoResponse, ApiError> {
    let page = paging.checked(&locale, &app_state)?;
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let courses = app_state
        .report_service
        .list_courses(&user.token, &scope, &criteria, page)
        .await;

    Ok((StatusCode::OK, Json(courses)))
}

// GET /api/listings/enrollments
#[utoipa::path(
    get,
    path = "/api/listings/enrollments",
    tag = "Listings",
    responses(
        (status = 200, description = "Matrículas com nome do aluno, curso e progresso", body = Page<EnrollmentRow>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    params(
        PageParams,
        EnrollmentCriteria,
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_enrollments(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Query(paging): Query<PageParams>,
    Query(criteria): Query<EnrollmentCriteria>,
) -> Result<impl IntoResponse, ApiError> {
    let page = paging.checked(&locale, &app_state)?;
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let enrollments = app_state
        .report_service
        .list_enrollments(&user.token, &scope, &criteria, page)
        .await;

    Ok((StatusCode::OK, Json(enrollments)))
}

// GET /api/listings/payments
#[utoipa::path(
    get,
    path = "/api/listings/payments",
    tag = "Listings",
    responses(
        (status = 200, description = "Pagamentos com o rótulo da matrícula", body = Page<PaymentRow>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    params(
        PageParams,
        PaymentCriteria,
        ("x-branch-id" = Option<i64>, Header, description = "Sede selecionada (SUPER_ADMIN)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    branch: BranchContext,
    Query(paging): Query<PageParams>,
    Query(criteria): Query<PaymentCriteria>,
) -> Result<impl IntoResponse, ApiError> {
    let page = paging.checked(&locale, &app_state)?;
    let scope = AccessScope::resolve(&user.claims, branch.0);

    let payments = app_state
        .report_service
        .list_payments(&user.token, &scope, &criteria, page)
        .await;

    Ok((StatusCode::OK, Json(payments)))
}
