// src/models/branch.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// Branch (A "Sede")
// ---
// Local físico da escola. Escopa alunos, equipe e relatórios.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[schema(example = 1)]
    pub id: i64,

    // Único, no máximo 10 caracteres
    #[schema(example = "NORTE")]
    pub code: String,

    #[schema(example = "Sede Norte")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Calle 100 # 15-20")]
    pub address: String,

    #[serde(default)]
    #[schema(example = "601 555 0101")]
    pub phone: String,

    #[serde(default)]
    #[schema(example = "norte@escuela.co")]
    pub email: String,

    // No máximo uma sede ativa pode ser a principal
    #[serde(default)]
    pub is_main: bool,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

