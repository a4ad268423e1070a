//! Modelo de SolicitacaoAbastecimento
//!
//! Intenção de abastecimento anterior à sua realização. Percorre o ciclo
//! pendente → {aprovada, rejeitada, expirada}; aprovada → efetivada.
//! Rejeitada, expirada e efetivada são estados terminais. O vínculo com o
//! abastecimento (`abastecimento_id`) é definido exatamente uma vez, na
//! efetivação, e é não-nulo se e somente se status = efetivada.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Status da solicitação - mapeia ao ENUM status_solicitacao
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "status_solicitacao", rename_all = "lowercase")]
pub enum StatusSolicitacao {
    Pendente,
    Aprovada,
    Rejeitada,
    Expirada,
    Efetivada,
}

impl StatusSolicitacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSolicitacao::Pendente => "pendente",
            StatusSolicitacao::Aprovada => "aprovada",
            StatusSolicitacao::Rejeitada => "rejeitada",
            StatusSolicitacao::Expirada => "expirada",
            StatusSolicitacao::Efetivada => "efetivada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pendente" => Some(StatusSolicitacao::Pendente),
            "aprovada" => Some(StatusSolicitacao::Aprovada),
            "rejeitada" => Some(StatusSolicitacao::Rejeitada),
            "expirada" => Some(StatusSolicitacao::Expirada),
            "efetivada" => Some(StatusSolicitacao::Efetivada),
            _ => None,
        }
    }

    /// Estados terminais não admitem nenhuma transição posterior
    pub fn e_terminal(&self) -> bool {
        matches!(
            self,
            StatusSolicitacao::Rejeitada
                | StatusSolicitacao::Expirada
                | StatusSolicitacao::Efetivada
        )
    }
}

/// Modo de abastecimento da solicitação
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "modo_abastecimento", rename_all = "lowercase")]
pub enum ModoAbastecimento {
    /// Desconta da cota do órgão
    Cota,
    /// Sem vínculo com cota
    Livre,
    /// Exige autorização prévia
    Autorizacao,
}

impl ModoAbastecimento {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModoAbastecimento::Cota => "cota",
            ModoAbastecimento::Livre => "livre",
            ModoAbastecimento::Autorizacao => "autorizacao",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cota" => Some(ModoAbastecimento::Cota),
            "livre" => Some(ModoAbastecimento::Livre),
            "autorizacao" | "autorização" => Some(ModoAbastecimento::Autorizacao),
            _ => None,
        }
    }
}

/// Solicitação de abastecimento - tabela solicitacoes_abastecimento
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SolicitacaoAbastecimento {
    pub id: Uuid,
    pub veiculo_id: Uuid,
    pub motorista_id: Option<Uuid>,
    pub combustivel_id: Uuid,
    pub empresa_id: Uuid,
    pub quantidade: Decimal,
    pub valor_unitario: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    pub modo_abastecimento: String,
    pub status: String,
    pub abastecido_por: String,
    pub nfe_numero: Option<String>,
    pub referencia: Option<String>,
    pub solicitada_em: DateTime<Utc>,
    pub expira_em: DateTime<Utc>,
    /// Definido exatamente uma vez, na efetivação
    pub abastecimento_id: Option<Uuid>,
    /// Saldo de cota sobre o qual a reserva provisória foi colocada
    pub cota_orgao_id: Option<Uuid>,
    pub aprovada_por_nome: Option<String>,
    pub aprovada_por_email: Option<String>,
    pub aprovada_por_empresa: Option<String>,
    pub aprovada_em: Option<DateTime<Utc>>,
    pub rejeitada_por_nome: Option<String>,
    pub rejeitada_por_email: Option<String>,
    pub rejeitada_por_empresa: Option<String>,
    pub motivo_rejeicao: Option<String>,
    pub rejeitada_em: Option<DateTime<Utc>>,
    /// Desativação é ação administrativa, ortogonal ao status
    pub ativa: bool,
    pub created_at: DateTime<Utc>,
}

impl SolicitacaoAbastecimento {
    pub fn status_parseado(&self) -> Option<StatusSolicitacao> {
        StatusSolicitacao::parse(&self.status)
    }

    pub fn modo_parseado(&self) -> Option<ModoAbastecimento> {
        ModoAbastecimento::parse(&self.modo_abastecimento)
    }
}
