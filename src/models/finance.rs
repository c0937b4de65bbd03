// src/models/finance.rs

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Enums (Mapeando a API de origem) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Abono,     // Pagamento parcial
    PagoTotal, // Quita o saldo restante
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Confirmado, // Conta como receita
    Anulado,    // Cancelado, fica fora de qualquer soma
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[schema(example = 100)]
    pub id: i64,

    // Vínculos
    pub student_id: i64,
    pub course_id: i64,

    // A matrícula guarda a sede onde foi feita; se ausente, vale a do aluno
    #[serde(default)]
    pub branch_id: Option<i64>,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub enrollment_date: NaiveDate,

    // Valores
    #[schema(example = 1000000)]
    pub total_amount: Decimal, // Normalmente o preço do curso na data da matrícula
    #[schema(example = 400000)]
    pub paid_amount: Decimal,

    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[schema(example = 900)]
    pub id: i64,

    pub enrollment_id: i64,

    #[serde(default)]
    pub branch_id: Option<i64>,

    #[schema(example = 250000)]
    pub amount: Decimal,

    #[schema(value_type = String, format = DateTime, example = "2024-03-20T10:30:00")]
    pub payment_date: NaiveDateTime,

    #[serde(rename = "type")]
    pub payment_type: PaymentType,

    pub status: PaymentStatus,

    #[serde(default)]
    pub payment_method_id: Option<i64>,

    #[serde(default)]
    #[schema(example = "Efectivo")]
    pub payment_method_name: String,
}

impl Payment {
    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmado
    }
}
