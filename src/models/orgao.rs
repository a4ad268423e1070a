use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Órgão (secretaria/departamento) de uma prefeitura
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Orgao {
    pub id: Uuid,
    pub municipio_id: Uuid,
    pub nome: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}
