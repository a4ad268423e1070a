use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::abastecimento::Abastecimento;
use crate::models::solicitacao::SolicitacaoAbastecimento;

/// Request para criar uma nova solicitação de abastecimento
#[derive(Debug, Deserialize, Validate)]
pub struct CriarSolicitacaoRequest {
    pub veiculo_id: Uuid,

    pub motorista_id: Option<Uuid>,

    pub combustivel_id: Uuid,

    pub empresa_id: Uuid,

    pub quantidade: Decimal,

    pub valor_unitario: Option<Decimal>,

    pub valor_total: Option<Decimal>,

    #[validate(length(min = 4, max = 20))]
    pub modo_abastecimento: String,

    /// Status inicial explícito; na ausência a solicitação nasce pendente
    pub status_inicial: Option<String>,

    #[validate(length(max = 60))]
    pub nfe_numero: Option<String>,

    #[validate(length(max = 120))]
    pub referencia: Option<String>,

    pub expira_em: DateTime<Utc>,

    pub abastecido_por: Option<String>,
}

/// Request para atualização parcial de campos mutáveis
#[derive(Debug, Deserialize, Validate)]
pub struct AtualizarSolicitacaoRequest {
    pub quantidade: Option<Decimal>,

    pub valor_unitario: Option<Decimal>,

    pub valor_total: Option<Decimal>,

    pub motorista_id: Option<Uuid>,

    pub expira_em: Option<DateTime<Utc>>,

    #[validate(length(max = 60))]
    pub nfe_numero: Option<String>,

    #[validate(length(max = 120))]
    pub referencia: Option<String>,
}

/// Request para mudança de status (aprovação/rejeição)
#[derive(Debug, Deserialize, Validate)]
pub struct AtualizarStatusRequest {
    #[validate(length(min = 4, max = 20))]
    pub status: String,

    #[validate(length(min = 2, max = 120))]
    pub ator_nome: String,

    #[validate(length(max = 160))]
    pub ator_email: Option<String>,

    #[validate(length(max = 160))]
    pub ator_empresa: Option<String>,

    #[validate(length(max = 400))]
    pub motivo_rejeicao: Option<String>,
}

/// Request para efetivar a solicitação em abastecimento
#[derive(Debug, Deserialize, Validate)]
pub struct EfetivarSolicitacaoRequest {
    /// Empresa do chamador; precisa coincidir com a empresa da solicitação
    pub empresa_id: Uuid,

    #[validate(length(min = 2, max = 120))]
    pub ator_nome: String,

    #[validate(length(max = 160))]
    pub ator_email: Option<String>,

    pub valor_unitario: Option<Decimal>,

    pub valor_total: Option<Decimal>,

    #[validate(length(max = 60))]
    pub nfe_numero: Option<String>,
}

/// Filtros para listagem de solicitações
#[derive(Debug, Deserialize)]
pub struct SolicitacaoFilters {
    pub status: Option<String>,
    pub veiculo_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub modo_abastecimento: Option<String>,
    pub criada_apos: Option<DateTime<Utc>>,
    pub criada_antes: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response de solicitação para a API
#[derive(Debug, Serialize)]
pub struct SolicitacaoResponse {
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
    pub abastecimento_id: Option<Uuid>,
    pub aprovada_por_nome: Option<String>,
    pub aprovada_em: Option<DateTime<Utc>>,
    pub motivo_rejeicao: Option<String>,
    pub rejeitada_em: Option<DateTime<Utc>>,
    pub ativa: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SolicitacaoAbastecimento> for SolicitacaoResponse {
    fn from(s: SolicitacaoAbastecimento) -> Self {
        Self {
            id: s.id,
            veiculo_id: s.veiculo_id,
            motorista_id: s.motorista_id,
            combustivel_id: s.combustivel_id,
            empresa_id: s.empresa_id,
            quantidade: s.quantidade,
            valor_unitario: s.valor_unitario,
            valor_total: s.valor_total,
            modo_abastecimento: s.modo_abastecimento,
            status: s.status,
            abastecido_por: s.abastecido_por,
            nfe_numero: s.nfe_numero,
            referencia: s.referencia,
            solicitada_em: s.solicitada_em,
            expira_em: s.expira_em,
            abastecimento_id: s.abastecimento_id,
            aprovada_por_nome: s.aprovada_por_nome,
            aprovada_em: s.aprovada_em,
            motivo_rejeicao: s.motivo_rejeicao,
            rejeitada_em: s.rejeitada_em,
            ativa: s.ativa,
            created_at: s.created_at,
        }
    }
}

/// Response de abastecimento criado na efetivação
#[derive(Debug, Serialize)]
pub struct AbastecimentoResponse {
    pub id: Uuid,
    pub solicitacao_id: Option<Uuid>,
    pub veiculo_id: Uuid,
    pub quantidade: Decimal,
    pub valor_total: Decimal,
    pub status: String,
    pub cota_orgao_id: Option<Uuid>,
    pub abastecido_em: DateTime<Utc>,
}

impl From<Abastecimento> for AbastecimentoResponse {
    fn from(a: Abastecimento) -> Self {
        Self {
            id: a.id,
            solicitacao_id: a.solicitacao_id,
            veiculo_id: a.veiculo_id,
            quantidade: a.quantidade,
            valor_total: a.valor_total,
            status: a.status,
            cota_orgao_id: a.cota_orgao_id,
            abastecido_em: a.abastecido_em,
        }
    }
}

/// Response da efetivação de uma solicitação
#[derive(Debug, Serialize)]
pub struct EfetivacaoResponse {
    pub solicitacao_id: Uuid,
    /// true quando a solicitação pendente foi aprovada implicitamente
    pub auto_aprovada: bool,
    pub abastecimento: AbastecimentoResponse,
}
