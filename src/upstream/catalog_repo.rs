// src/upstream/catalog_repo.rs

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    common::error::AppError,
    models::{
        academic::{Course, Student},
        branch::Branch,
        finance::{Enrollment, Payment},
    },
};

// Fonte das coleções usadas nos relatórios. Cada chamada encaminha o token do
// usuário; `branch_id` restringe o resultado quando o usuário está numa sede.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn branches(&self, token: &str) -> Result<Vec<Branch>, AppError>;

    async fn students(&self, token: &str, branch_id: Option<i64>) -> Result<Vec<Student>, AppError>;

    // Catálogo compartilhado, nunca filtrado por sede
    async fn courses(&self, token: &str) -> Result<Vec<Course>, AppError>;

    async fn enrollments(
        &self,
        token: &str,
        branch_id: Option<i64>,
    ) -> Result<Vec<Enrollment>, AppError>;

    async fn payments(&self, token: &str, branch_id: Option<i64>) -> Result<Vec<Payment>, AppError>;
}

#[derive(Clone)]
pub struct UpstreamRepository {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET {base}/{collection}[?branchId=..] com o token do usuário.
    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        token: &str,
        branch_id: Option<i64>,
    ) -> Result<Vec<T>, AppError> {
        let url = format!("{}/{}", self.base_url, collection);

        let mut request = self.client.get(&url).bearer_auth(token);
        if let Some(branch_id) = branch_id {
            request = request.query(&[("branchId", branch_id)]);
        }

        tracing::debug!(%url, ?branch_id, "Consultando API de origem");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                collection,
                status: status.as_u16(),
            });
        }

        let raw = response.json::<Vec<serde_json::Value>>().await?;
        Ok(decode_each(collection, raw))
    }
}

// Registro malformado é descartado sozinho; o resto da coleção segue
fn decode_each<T: DeserializeOwned>(collection: &str, raw: Vec<serde_json::Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
            serde_json::from_value::<T>(value)
                .inspect_err(|e| {
                    tracing::warn!(collection, index, %id, "⚠️ Registro ignorado: {}", e);
                })
                .ok()
        })
        .collect()
}

#[async_trait]
impl CatalogSource for UpstreamRepository {
    async fn branches(&self, token: &str) -> Result<Vec<Branch>, AppError> {
        self.fetch("branches", token, None).await
    }

    async fn students(&self, token: &str, branch_id: Option<i64>) -> Result<Vec<Student>, AppError> {
        self.fetch("students", token, branch_id).await
    }

    async fn courses(&self, token: &str) -> Result<Vec<Course>, AppError> {
        self.fetch("courses", token, None).await
    }

    async fn enrollments(
        &self,
        token: &str,
        branch_id: Option<i64>,
    ) -> Result<Vec<Enrollment>, AppError> {
        self.fetch("enrollments", token, branch_id).await
    }

    async fn payments(&self, token: &str, branch_id: Option<i64>) -> Result<Vec<Payment>, AppError> {
        self.fetch("payments", token, branch_id).await
    }
}
