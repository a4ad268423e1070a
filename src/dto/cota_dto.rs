use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::cota_periodo::CotaPeriodo;

/// Request para importação em massa de cotas a partir do texto já extraído
/// do documento PDF pelo colaborador externo de extração
#[derive(Debug, Deserialize, Validate)]
pub struct ImportarCotasRequest {
    #[validate(length(min = 1))]
    pub texto: String,
}

/// Placa atualizada com sucesso na importação
#[derive(Debug, Serialize)]
pub struct PlacaAtualizada {
    pub placa: String,
    pub veiculo_id: Uuid,
    pub cota_periodo_id: Uuid,
    pub quantidade_permitida: Decimal,
    pub quantidade_utilizada: Decimal,
    pub quantidade_disponivel: Decimal,
}

/// Resumo da importação: sucesso parcial é resultado esperado, nunca
/// aborta o lote por causa de uma linha malformada
#[derive(Debug, Serialize)]
pub struct ResumoImportacao {
    pub total_processadas: usize,
    pub total_atualizadas: usize,
    pub total_nao_atualizadas: usize,
    pub placas_atualizadas: Vec<PlacaAtualizada>,
    pub placas_nao_atualizadas: Vec<String>,
}

/// Response da cota vigente de um veículo
#[derive(Debug, Serialize)]
pub struct CotaPeriodoResponse {
    pub id: Uuid,
    pub veiculo_id: Uuid,
    pub periodicidade: String,
    pub quantidade_permitida: Decimal,
    pub quantidade_utilizada: Decimal,
    pub quantidade_disponivel: Decimal,
    pub janela_inicio: DateTime<Utc>,
    pub janela_fim: DateTime<Utc>,
    pub ativa: bool,
}

impl From<CotaPeriodo> for CotaPeriodoResponse {
    fn from(c: CotaPeriodo) -> Self {
        Self {
            id: c.id,
            veiculo_id: c.veiculo_id,
            periodicidade: c.periodicidade,
            quantidade_permitida: c.quantidade_permitida,
            quantidade_utilizada: c.quantidade_utilizada,
            quantidade_disponivel: c.quantidade_disponivel,
            janela_inicio: c.janela_inicio,
            janela_fim: c.janela_fim,
            ativa: c.ativa,
        }
    }
}
