// src/lib.rs

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod upstream;

use crate::config::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let report_routes = Router::new()
        .route("/dashboard", get(handlers::reports::get_dashboard))
        .route("/overview", get(handlers::reports::get_overview))
        .route("/students-with-debt", get(handlers::reports::get_students_with_debt))
        .route("/course-summary", get(handlers::reports::get_course_summary))
        .route(
            "/enrollments/{id}/progress",
            get(handlers::reports::get_enrollment_progress),
        )
        .route("/monthly-income", get(handlers::reports::get_monthly_income));

    let listing_routes = Router::new()
        .route("/students", get(handlers::listings::list_students))
        .route("/courses", get(handlers::listings::list_courses))
        .route("/enrollments", get(handlers::listings::list_enrollments))
        .route("/payments", get(handlers::listings::list_payments));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(handlers::session::health))
        .route("/api/session", get(handlers::session::get_session))
        .nest("/api/reports", report_routes)
        .nest("/api/listings", listing_routes)
        .with_state(app_state)
}
