// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Session ---
        handlers::session::health,
        handlers::session::get_session,

        // --- Reports ---
        handlers::reports::get_dashboard,
        handlers::reports::get_overview,
        handlers::reports::get_students_with_debt,
        handlers::reports::get_course_summary,
        handlers::reports::get_enrollment_progress,
        handlers::reports::get_monthly_income,

        // --- Listings ---
        handlers::listings::list_students,
        handlers::listings::list_courses,
        handlers::listings::list_enrollments,
        handlers::listings::list_payments,
    ),
    components(
        schemas(
            // --- Session ---
            models::auth::Role,
            services::scope::AccessScope,
            services::scope::Capabilities,
            handlers::session::SessionInfo,

            // --- Entidades ---
            models::branch::Branch,
            models::academic::Student,
            models::academic::Course,
            models::finance::PaymentType,
            models::finance::PaymentStatus,
            models::finance::Enrollment,
            models::finance::Payment,

            // --- Reports ---
            models::reports::EnrollmentProgress,
            models::reports::StudentDebt,
            models::reports::CourseSummary,
            models::reports::DashboardStats,
            models::reports::DashboardOverview,
            models::reports::ReportTotals,
            models::reports::ReportOverview,
            models::reports::MonthlyIncome,
            models::reports::MonthHighlight,
            models::reports::YearSummary,
            models::reports::MonthlyIncomeReport,

            // --- Listings ---
            models::listing::StatusFilter,
            models::listing::SortOrder,
            models::listing::PaymentProgressFilter,
            models::listing::EnrollmentSortField,
            models::listing::PaymentSortField,
            models::listing::EnrollmentRow,
            models::listing::PaymentRow,
        )
    ),
    tags(
        (name = "Session", description = "Saúde do serviço e escopo do usuário"),
        (name = "Reports", description = "Indicadores financeiros e acadêmicos"),
        (name = "Listings", description = "Listas filtradas, ordenadas e paginadas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
