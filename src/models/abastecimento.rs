//! Modelo de Abastecimento
//!
//! Fato realizado e auditável de um veículo ter sido abastecido. Criado
//! exatamente uma vez por solicitação efetivada, ou diretamente em
//! lançamentos manuais.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registro de abastecimento - tabela abastecimentos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Abastecimento {
    pub id: Uuid,
    pub solicitacao_id: Option<Uuid>,
    pub veiculo_id: Uuid,
    pub motorista_id: Option<Uuid>,
    pub combustivel_id: Uuid,
    pub empresa_id: Uuid,
    pub cota_orgao_id: Option<Uuid>,
    pub quantidade: Decimal,
    pub valor_total: Decimal,
    pub status: String,
    pub nfe_numero: Option<String>,
    pub referencia: Option<String>,
    pub abastecido_em: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
