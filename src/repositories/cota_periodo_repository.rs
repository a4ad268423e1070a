//! Persistência de períodos de cota
//!
//! O acesso passa pelo trait `CotaPeriodoStore` para que o serviço de cota
//! seja testável com um store em memória, sem banco.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::cota_periodo::CotaPeriodo;
use crate::models::veiculo::Periodicidade;
use crate::utils::errors::AppError;

/// Dados para criação de uma nova janela de cota
#[derive(Debug, Clone)]
pub struct NovaCotaPeriodo {
    pub veiculo_id: Uuid,
    pub periodicidade: Periodicidade,
    pub quantidade_permitida: Decimal,
    pub quantidade_utilizada: Decimal,
    pub quantidade_disponivel: Decimal,
    pub janela_inicio: DateTime<Utc>,
    pub janela_fim: DateTime<Utc>,
}

/// Abstração de persistência dos períodos de cota
#[async_trait]
pub trait CotaPeriodoStore: Send + Sync {
    /// Registro ativo cuja janela contém o instante, para (veículo, periodicidade)
    async fn buscar_vigente(
        &self,
        veiculo_id: Uuid,
        periodicidade: Periodicidade,
        instante: DateTime<Utc>,
    ) -> Result<Option<CotaPeriodo>, AppError>;

    /// Registro ativo cuja janela contém o instante, qualquer periodicidade
    async fn buscar_vigente_por_veiculo(
        &self,
        veiculo_id: Uuid,
        instante: DateTime<Utc>,
    ) -> Result<Option<CotaPeriodo>, AppError>;

    async fn criar(&self, nova: NovaCotaPeriodo) -> Result<CotaPeriodo, AppError>;

    /// Sobrescreve as quantidades sem alterar os limites da janela
    async fn atualizar_quantidades(
        &self,
        id: Uuid,
        permitida: Decimal,
        utilizada: Decimal,
        disponivel: Decimal,
    ) -> Result<CotaPeriodo, AppError>;
}

pub struct CotaPeriodoRepository {
    pool: PgPool,
}

impl CotaPeriodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CotaPeriodoStore for CotaPeriodoRepository {
    async fn buscar_vigente(
        &self,
        veiculo_id: Uuid,
        periodicidade: Periodicidade,
        instante: DateTime<Utc>,
    ) -> Result<Option<CotaPeriodo>, AppError> {
        let cota = sqlx::query_as::<_, CotaPeriodo>(
            r#"
            SELECT * FROM cotas_periodo
            WHERE veiculo_id = $1
              AND periodicidade = $2
              AND ativa = true
              AND janela_inicio <= $3
              AND janela_fim >= $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(veiculo_id)
        .bind(periodicidade.as_str())
        .bind(instante)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cota)
    }

    async fn buscar_vigente_por_veiculo(
        &self,
        veiculo_id: Uuid,
        instante: DateTime<Utc>,
    ) -> Result<Option<CotaPeriodo>, AppError> {
        let cota = sqlx::query_as::<_, CotaPeriodo>(
            r#"
            SELECT * FROM cotas_periodo
            WHERE veiculo_id = $1
              AND ativa = true
              AND janela_inicio <= $2
              AND janela_fim >= $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(veiculo_id)
        .bind(instante)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cota)
    }

    async fn criar(&self, nova: NovaCotaPeriodo) -> Result<CotaPeriodo, AppError> {
        let agora = Utc::now();
        let cota = sqlx::query_as::<_, CotaPeriodo>(
            r#"
            INSERT INTO cotas_periodo
                (id, veiculo_id, periodicidade, quantidade_permitida, quantidade_utilizada,
                 quantidade_disponivel, janela_inicio, janela_fim, ativa, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nova.veiculo_id)
        .bind(nova.periodicidade.as_str())
        .bind(nova.quantidade_permitida)
        .bind(nova.quantidade_utilizada)
        .bind(nova.quantidade_disponivel)
        .bind(nova.janela_inicio)
        .bind(nova.janela_fim)
        .bind(agora)
        .fetch_one(&self.pool)
        .await?;

        Ok(cota)
    }

    async fn atualizar_quantidades(
        &self,
        id: Uuid,
        permitida: Decimal,
        utilizada: Decimal,
        disponivel: Decimal,
    ) -> Result<CotaPeriodo, AppError> {
        let cota = sqlx::query_as::<_, CotaPeriodo>(
            r#"
            UPDATE cotas_periodo
            SET quantidade_permitida = $2,
                quantidade_utilizada = $3,
                quantidade_disponivel = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(permitida)
        .bind(utilizada)
        .bind(disponivel)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(cota)
    }
}
