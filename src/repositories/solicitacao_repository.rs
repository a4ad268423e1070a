//! Persistência das solicitações de abastecimento
//!
//! As mudanças de status são updates condicionais guardados pelo status
//! atual, para que transições concorrentes nunca dupliquem efeitos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::solicitacao_dto::{AtualizarSolicitacaoRequest, SolicitacaoFilters};
use crate::models::solicitacao::SolicitacaoAbastecimento;
use crate::utils::errors::AppError;

/// Dados para criação de uma solicitação
#[derive(Debug, Clone)]
pub struct NovaSolicitacao {
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
    pub expira_em: DateTime<Utc>,
    pub cota_orgao_id: Option<Uuid>,
}

pub struct SolicitacaoRepository {
    pool: PgPool,
}

impl SolicitacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(
        &self,
        nova: NovaSolicitacao,
    ) -> Result<SolicitacaoAbastecimento, AppError> {
        let agora = Utc::now();
        let solicitacao = sqlx::query_as::<_, SolicitacaoAbastecimento>(
            r#"
            INSERT INTO solicitacoes_abastecimento
                (id, veiculo_id, motorista_id, combustivel_id, empresa_id, quantidade,
                 valor_unitario, valor_total, modo_abastecimento, status, abastecido_por,
                 nfe_numero, referencia, solicitada_em, expira_em, cota_orgao_id, ativa, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, true, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nova.veiculo_id)
        .bind(nova.motorista_id)
        .bind(nova.combustivel_id)
        .bind(nova.empresa_id)
        .bind(nova.quantidade)
        .bind(nova.valor_unitario)
        .bind(nova.valor_total)
        .bind(nova.modo_abastecimento)
        .bind(nova.status)
        .bind(nova.abastecido_por)
        .bind(nova.nfe_numero)
        .bind(nova.referencia)
        .bind(agora)
        .bind(nova.expira_em)
        .bind(nova.cota_orgao_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    pub async fn buscar_por_id(
        &self,
        id: Uuid,
    ) -> Result<Option<SolicitacaoAbastecimento>, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoAbastecimento>(
            "SELECT * FROM solicitacoes_abastecimento WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    pub async fn listar(
        &self,
        filters: &SolicitacaoFilters,
    ) -> Result<Vec<SolicitacaoAbastecimento>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM solicitacoes_abastecimento WHERE 1=1");

        if let Some(status) = &filters.status {
            query.push(" AND status = ").push_bind(status.to_lowercase());
        }
        if let Some(veiculo_id) = filters.veiculo_id {
            query.push(" AND veiculo_id = ").push_bind(veiculo_id);
        }
        if let Some(empresa_id) = filters.empresa_id {
            query.push(" AND empresa_id = ").push_bind(empresa_id);
        }
        if let Some(modo) = &filters.modo_abastecimento {
            query.push(" AND modo_abastecimento = ").push_bind(modo.to_lowercase());
        }
        if let Some(apos) = filters.criada_apos {
            query.push(" AND created_at >= ").push_bind(apos);
        }
        if let Some(antes) = filters.criada_antes {
            query.push(" AND created_at <= ").push_bind(antes);
        }

        query.push(" ORDER BY created_at DESC");
        query.push(" LIMIT ").push_bind(filters.limit.unwrap_or(50).clamp(1, 200));
        query.push(" OFFSET ").push_bind(filters.offset.unwrap_or(0).max(0));

        let solicitacoes = query
            .build_query_as::<SolicitacaoAbastecimento>()
            .fetch_all(&self.pool)
            .await?;

        Ok(solicitacoes)
    }

    /// Atualização parcial de campos mutáveis; não toca status nem vínculos
    pub async fn atualizar_campos(
        &self,
        id: Uuid,
        request: &AtualizarSolicitacaoRequest,
    ) -> Result<SolicitacaoAbastecimento, AppError> {
        // Obter solicitação atual
        let atual = self
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        let solicitacao = sqlx::query_as::<_, SolicitacaoAbastecimento>(
            r#"
            UPDATE solicitacoes_abastecimento
            SET quantidade = $2, valor_unitario = $3, valor_total = $4,
                motorista_id = $5, expira_em = $6, nfe_numero = $7, referencia = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.quantidade.unwrap_or(atual.quantidade))
        .bind(request.valor_unitario.or(atual.valor_unitario))
        .bind(request.valor_total.or(atual.valor_total))
        .bind(request.motorista_id.or(atual.motorista_id))
        .bind(request.expira_em.unwrap_or(atual.expira_em))
        .bind(request.nfe_numero.clone().or(atual.nfe_numero))
        .bind(request.referencia.clone().or(atual.referencia))
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    /// Aprova somente se ainda pendente; retorna linhas afetadas
    pub async fn aprovar_condicional(
        &self,
        id: Uuid,
        ator_nome: &str,
        ator_email: Option<&str>,
        ator_empresa: Option<&str>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE solicitacoes_abastecimento
            SET status = 'aprovada',
                aprovada_por_nome = $2,
                aprovada_por_email = $3,
                aprovada_por_empresa = $4,
                aprovada_em = $5
            WHERE id = $1 AND status = 'pendente'
            "#,
        )
        .bind(id)
        .bind(ator_nome)
        .bind(ator_email)
        .bind(ator_empresa)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Rejeita somente se ainda pendente; retorna linhas afetadas
    pub async fn rejeitar_condicional(
        &self,
        id: Uuid,
        ator_nome: &str,
        ator_email: Option<&str>,
        ator_empresa: Option<&str>,
        motivo: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE solicitacoes_abastecimento
            SET status = 'rejeitada',
                rejeitada_por_nome = $2,
                rejeitada_por_email = $3,
                rejeitada_por_empresa = $4,
                motivo_rejeicao = $5,
                rejeitada_em = $6
            WHERE id = $1 AND status = 'pendente'
            "#,
        )
        .bind(id)
        .bind(ator_nome)
        .bind(ator_email)
        .bind(ator_empresa)
        .bind(motivo)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Expira somente se ainda pendente (guarda de idempotência do scheduler)
    pub async fn expirar_condicional(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE solicitacoes_abastecimento
            SET status = 'expirada'
            WHERE id = $1 AND status = 'pendente'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Solicitações pendentes cujo prazo já venceu
    pub async fn listar_pendentes_vencidas(
        &self,
        agora: DateTime<Utc>,
    ) -> Result<Vec<SolicitacaoAbastecimento>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoAbastecimento>(
            r#"
            SELECT * FROM solicitacoes_abastecimento
            WHERE status = 'pendente' AND expira_em < $1
            ORDER BY expira_em ASC
            "#,
        )
        .bind(agora)
        .fetch_all(&self.pool)
        .await?;

        Ok(solicitacoes)
    }

    /// Desativação administrativa; não interfere no ciclo de status
    pub async fn desativar(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE solicitacoes_abastecimento SET ativa = false WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
