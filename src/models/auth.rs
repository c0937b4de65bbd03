// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Papéis do portal, com os mesmos nomes que a API de origem usa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin, // Todas as sedes
    Admin,      // Apenas a própria sede
    Student,    // Apenas os próprios registros
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // Subject (username)
    pub role: Role,

    // Obrigatório para ADMIN e STUDENT, ausente para SUPER_ADMIN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<i64>,

    // Preenchido apenas para STUDENT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,

    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
