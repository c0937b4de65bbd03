// src/models/listing.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    finance::{Enrollment, Payment, PaymentStatus, PaymentType},
    reports::EnrollmentProgress,
};

// --- Filtros compartilhados ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(self, active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => active,
            StatusFilter::Inactive => !active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

// Situação do pagamento de uma matrícula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProgressFilter {
    #[default]
    All,
    Paid,    // paid >= total
    Partial, // 0 < paid < total
    Pending, // paid == 0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum EnrollmentSortField {
    #[default]
    EnrollmentDate,
    TotalAmount,
    Progress,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PaymentSortField {
    #[default]
    PaymentDate,
    Amount,
}

// --- Critérios por tela ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct StudentCriteria {
    /// Nome, sobrenome ou documento
    pub search: Option<String>,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct CourseCriteria {
    pub search: Option<String>,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentCriteria {
    /// Nome completo do aluno
    pub search: Option<String>,
    pub course_id: Option<i64>,
    pub status: StatusFilter,
    pub payment_status: PaymentProgressFilter,
    pub sort_field: EnrollmentSortField,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PaymentCriteria {
    /// Rótulo da matrícula ("Nome Sobrenome - Curso")
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub status: Option<PaymentStatus>,
    /// Nome exato do método de pagamento
    pub method: Option<String>,
    pub sort_field: PaymentSortField,
    pub sort_order: SortOrder,
}

// --- Linhas enriquecidas ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRow {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student_name: String,
    pub course_name: String,
    pub progress: EnrollmentProgress,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub enrollment_label: String,
}

// --- Paginação ---

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}
