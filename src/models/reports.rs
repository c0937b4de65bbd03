// src/models/reports.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    academic::{Course, Student},
    finance::{Enrollment, Payment},
};

// Rótulos usados quando uma referência aponta para um registro inexistente
pub const UNKNOWN_LABEL: &str = "Desconocido";
pub const NOT_AVAILABLE_LABEL: &str = "N/A";

// 1. Progresso de pagamento de uma matrícula
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentProgress {
    pub enrollment_id: i64,
    #[schema(example = 1000000)]
    pub total_amount: Decimal,
    #[schema(example = 400000)]
    pub paid: Decimal,
    #[schema(example = 600000)]
    pub pending: Decimal, // Nunca negativo
    #[schema(example = 40)]
    pub percent: u8, // 0..=100
}

// 2. Alunos com dívida
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDebt {
    pub student_id: i64,
    // None quando as matrículas apontam para um aluno que não veio na lista
    pub student: Option<Student>,
    #[schema(example = "Laura Gómez")]
    pub student_name: String,
    #[schema(example = 600000)]
    pub total_debt: Decimal,
    pub enrollments_count: usize,
}

// 3. Resumo financeiro por curso
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course_id: i64,
    pub course: Option<Course>,
    #[schema(example = "Licencia B1")]
    pub course_name: String,
    pub total_enrollments: usize,
    #[schema(example = 800000)]
    pub total_billed: Decimal,
    #[schema(example = 500000)]
    pub total_revenue: Decimal,
    #[schema(example = 300000)]
    pub total_pending: Decimal,
    // Pode passar de 100 quando há pagamento a maior
    #[schema(example = 62.5)]
    pub collection_rate: Decimal,
}

// 4. Os cards do topo do painel
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,   // Alunos ativos
    pub total_courses: usize,    // Cursos ativos
    pub total_enrollments: usize, // Todas as matrículas
    pub total_payments: usize,   // Pagamentos CONFIRMADO
    pub total_revenue: Decimal,  // Soma dos pagamentos CONFIRMADO
    pub pending_amount: Decimal, // Saldo das matrículas (outro livro-razão, ver DESIGN.md)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub recent_payments: Vec<Payment>,
    pub enrollments_with_pending: Vec<Enrollment>,
}

// 5. Totais da tela de relatórios
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_students_with_debt: usize,
    pub total_debt: Decimal,
    pub total_revenue: Decimal,
    pub total_billed: Decimal,
    pub collection_rate: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportOverview {
    pub totals: ReportTotals,
    pub students_with_debt: Vec<StudentDebt>,
    pub course_summaries: Vec<CourseSummary>,
}

// 6. Relatório mensal
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    #[schema(example = "Marzo")]
    pub month: String,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 3)]
    pub month_number: u32,
    pub total_sales: Decimal,   // Valor das matrículas vendidas no mês
    pub total_paid: Decimal,    // Pagamentos CONFIRMADO recebidos no mês
    pub total_pending: Decimal, // total_sales - total_paid
    pub payment_count: usize,
    pub branch_id: Option<i64>,
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthHighlight {
    #[schema(example = "Marzo 2024")]
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub total_paid: Decimal,
    pub total_payments: usize,
    pub average_monthly: Decimal,
    pub best_month: MonthHighlight,
    pub worst_month: MonthHighlight,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncomeReport {
    pub year: i32,
    pub branch_id: Option<i64>,
    pub rows: Vec<MonthlyIncome>,
    pub summary: Option<YearSummary>,
}
