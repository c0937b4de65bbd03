// src/models/academic.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. Student (O "Aluno")
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[schema(example = 42)]
    pub id: i64,

    #[schema(example = "Laura")]
    pub first_name: String,

    #[schema(example = "Gómez")]
    pub last_name: String,

    // Único na instituição
    #[schema(example = "1020304050")]
    pub document_number: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    pub active: bool,

    // Sede do aluno (ausente em dados legados)
    #[serde(default)]
    pub branch_id: Option<i64>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---
// 2. Course (O "Curso")
// ---
// Catálogo compartilhado entre as sedes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = "Licencia B1")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[schema(example = 1200000)]
    pub price: Decimal,

    #[schema(example = 40)]
    pub total_hours: u32,

    pub active: bool,
}
