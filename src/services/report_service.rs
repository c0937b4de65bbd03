// src/services/report_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::{
        academic::{Course, Student},
        listing::{
            CourseCriteria, EnrollmentCriteria, EnrollmentRow, Page, PaymentCriteria, PaymentRow,
            StudentCriteria,
        },
        reports::{
            CourseSummary, DashboardOverview, EnrollmentProgress, MonthlyIncomeReport,
            ReportOverview, StudentDebt,
        },
        snapshot::Snapshot,
    },
    services::{
        aggregation::{
            compute_course_summary, compute_dashboard_stats, compute_enrollment_progress,
            compute_monthly_income, compute_report_totals, compute_student_debt,
            compute_year_summary, enrollments_with_pending, recent_payments, MonthlyIncomeFilter,
        },
        listing::{filter_courses, filter_enrollments, filter_payments, filter_students, paginate},
        scope::{restrict, AccessScope, Visibility},
    },
    upstream::CatalogSource,
};

// Linhas das tabelas do painel
const DASHBOARD_TABLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn CatalogSource>,
}

// Uma coleção que falhou vira lista vazia: o resto do relatório ainda é exibido
fn or_empty<T>(collection: &'static str, result: Result<Vec<T>, AppError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        tracing::warn!(collection, error = %err, "⚠️ Falha ao carregar coleção, usando lista vazia");
        Vec::new()
    })
}

impl ReportService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Busca as cinco coleções em paralelo e recorta para o escopo do usuário.
    pub async fn load_snapshot(&self, token: &str, scope: &AccessScope) -> Snapshot {
        if scope.visibility() == Visibility::Nothing {
            return Snapshot::default();
        }

        let branch_id = scope.upstream_branch_filter();
        let (branches, students, courses, enrollments, payments) = tokio::join!(
            self.source.branches(token),
            self.source.students(token, branch_id),
            self.source.courses(token),
            self.source.enrollments(token, branch_id),
            self.source.payments(token, branch_id),
        );

        let snapshot = Snapshot {
            branches: or_empty("branches", branches),
            students: or_empty("students", students),
            courses: or_empty("courses", courses),
            enrollments: or_empty("enrollments", enrollments),
            payments: or_empty("payments", payments),
        };

        tracing::debug!(
            students = snapshot.students.len(),
            enrollments = snapshot.enrollments.len(),
            payments = snapshot.payments.len(),
            "Coleções carregadas"
        );

        restrict(snapshot, scope)
    }

    pub async fn dashboard(&self, token: &str, scope: &AccessScope) -> DashboardOverview {
        let data = self.load_snapshot(token, scope).await;

        DashboardOverview {
            stats: compute_dashboard_stats(
                &data.students,
                &data.courses,
                &data.enrollments,
                &data.payments,
            ),
            recent_payments: recent_payments(&data.payments, DASHBOARD_TABLE_LIMIT),
            enrollments_with_pending: enrollments_with_pending(
                &data.enrollments,
                DASHBOARD_TABLE_LIMIT,
            ),
        }
    }

    pub async fn overview(&self, token: &str, scope: &AccessScope) -> ReportOverview {
        let data = self.load_snapshot(token, scope).await;

        let students_with_debt = compute_student_debt(&data.students, &data.enrollments);
        ReportOverview {
            totals: compute_report_totals(&data.enrollments, &students_with_debt),
            course_summaries: compute_course_summary(&data.courses, &data.enrollments),
            students_with_debt,
        }
    }

    pub async fn students_with_debt(&self, token: &str, scope: &AccessScope) -> Vec<StudentDebt> {
        let data = self.load_snapshot(token, scope).await;
        compute_student_debt(&data.students, &data.enrollments)
    }

    pub async fn course_summary(&self, token: &str, scope: &AccessScope) -> Vec<CourseSummary> {
        let data = self.load_snapshot(token, scope).await;
        compute_course_summary(&data.courses, &data.enrollments)
    }

    /// Matrícula fora do escopo responde como inexistente.
    pub async fn enrollment_progress(
        &self,
        token: &str,
        scope: &AccessScope,
        enrollment_id: i64,
    ) -> Result<EnrollmentProgress, AppError> {
        let data = self.load_snapshot(token, scope).await;
        data.find_enrollment(enrollment_id)
            .map(compute_enrollment_progress)
            .ok_or(AppError::EnrollmentNotFound(enrollment_id))
    }

    /// Sem sede no escopo, uma linha por mês e sede; com sede, só as linhas dela.
    pub async fn monthly_income(
        &self,
        token: &str,
        scope: &AccessScope,
        year: i32,
    ) -> MonthlyIncomeReport {
        let data = self.load_snapshot(token, scope).await;

        let branch_id = match scope.visibility() {
            Visibility::Branch(id) => Some(id),
            Visibility::All | Visibility::Student(_) | Visibility::Nothing => None,
        };

        let filter = MonthlyIncomeFilter { year, branch_id };
        let rows = compute_monthly_income(
            &data.payments,
            &data.enrollments,
            &data.students,
            &data.branches,
            &filter,
        );
        let summary = compute_year_summary(&rows);

        MonthlyIncomeReport {
            year,
            branch_id,
            rows,
            summary,
        }
    }

    // --- Listagens ---

    pub async fn list_students(
        &self,
        token: &str,
        scope: &AccessScope,
        criteria: &StudentCriteria,
        page: PageRequest,
    ) -> Page<Student> {
        let data = self.load_snapshot(token, scope).await;
        paginate(filter_students(&data.students, criteria), page.page, page.per_page)
    }

    pub async fn list_courses(
        &self,
        token: &str,
        scope: &AccessScope,
        criteria: &CourseCriteria,
        page: PageRequest,
    ) -> Page<Course> {
        let data = self.load_snapshot(token, scope).await;
        paginate(filter_courses(&data.courses, criteria), page.page, page.per_page)
    }

    pub async fn list_enrollments(
        &self,
        token: &str,
        scope: &AccessScope,
        criteria: &EnrollmentCriteria,
        page: PageRequest,
    ) -> Page<EnrollmentRow> {
        let data = self.load_snapshot(token, scope).await;
        paginate(filter_enrollments(&data, criteria), page.page, page.per_page)
    }

    pub async fn list_payments(
        &self,
        token: &str,
        scope: &AccessScope,
        criteria: &PaymentCriteria,
        page: PageRequest,
    ) -> Page<PaymentRow> {
        let data = self.load_snapshot(token, scope).await;
        paginate(filter_payments(&data, criteria), page.page, page.per_page)
    }
}
