//! Modelo de Veículo
//!
//! Este módulo contém o struct Veiculo e a periodicidade de cota associada.
//! Mapeia exatamente ao schema PostgreSQL com primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Periodicidade da cota do veículo - mapeia ao ENUM periodicidade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "periodicidade", rename_all = "lowercase")]
pub enum Periodicidade {
    Diaria,
    Semanal,
    Mensal,
}

impl Periodicidade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicidade::Diaria => "diaria",
            Periodicidade::Semanal => "semanal",
            Periodicidade::Mensal => "mensal",
        }
    }

    /// Interpretar o valor armazenado na coluna `periodicidade`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "diaria" | "diária" => Some(Periodicidade::Diaria),
            "semanal" => Some(Periodicidade::Semanal),
            "mensal" => Some(Periodicidade::Mensal),
            _ => None,
        }
    }
}

/// Veiculo principal - mapeia exatamente à tabela veiculos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Veiculo {
    pub id: Uuid,
    pub orgao_id: Uuid,
    pub placa: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub combustivel_id: Option<Uuid>,
    pub capacidade_tanque: Option<Decimal>,
    // Veículo sem periodicidade não recebe acompanhamento de cota por janela
    pub periodicidade: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

impl Veiculo {
    /// Periodicidade interpretada, se configurada e válida
    pub fn periodicidade_parseada(&self) -> Option<Periodicidade> {
        self.periodicidade.as_deref().and_then(Periodicidade::parse)
    }
}
