use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Empresa fornecedora de combustível (posto parceiro)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Empresa {
    pub id: Uuid,
    pub nome: String,
    pub cnpj: Option<String>,
    pub ativa: bool,
    pub created_at: DateTime<Utc>,
}
