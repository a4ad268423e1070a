use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Prefeitura atendida pelo sistema
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Municipio {
    pub id: Uuid,
    pub nome: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}
