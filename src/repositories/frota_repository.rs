//! Consultas de resolução de entidades da frota
//!
//! Resolve município → órgão → veículo a partir dos nomes heurísticos
//! extraídos do documento de cotas, sempre restrito a registros ativos.

use crate::models::empresa::Empresa;
use crate::models::municipio::Municipio;
use crate::models::orgao::Orgao;
use crate::models::veiculo::Veiculo;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FrotaRepository {
    pool: PgPool,
}

impl FrotaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca município por contenção de substring, sem diferenciar
    /// maiúsculas. O match vale nos dois sentidos porque o nome extraído do
    /// documento pode vir mais longo ou mais curto que o cadastrado.
    pub async fn buscar_municipio_por_nome(
        &self,
        nome: &str,
    ) -> Result<Option<Municipio>, AppError> {
        let municipio = sqlx::query_as::<_, Municipio>(
            r#"
            SELECT * FROM municipios
            WHERE ativo = true
              AND (nome ILIKE '%' || $1 || '%' OR $1 ILIKE '%' || nome || '%')
            ORDER BY length(nome) ASC
            LIMIT 1
            "#,
        )
        .bind(nome)
        .fetch_optional(&self.pool)
        .await?;

        Ok(municipio)
    }

    /// Busca órgão ativo do município por contenção de substring
    pub async fn buscar_orgao_por_nome(
        &self,
        municipio_id: Uuid,
        nome: &str,
    ) -> Result<Option<Orgao>, AppError> {
        let orgao = sqlx::query_as::<_, Orgao>(
            r#"
            SELECT * FROM orgaos
            WHERE municipio_id = $1
              AND ativo = true
              AND (nome ILIKE '%' || $2 || '%' OR $2 ILIKE '%' || nome || '%')
            ORDER BY length(nome) ASC
            LIMIT 1
            "#,
        )
        .bind(municipio_id)
        .bind(nome)
        .fetch_optional(&self.pool)
        .await?;

        Ok(orgao)
    }

    /// Busca veículo ativo do órgão por placa exata (case-insensitive)
    pub async fn buscar_veiculo_por_placa(
        &self,
        orgao_id: Uuid,
        placa: &str,
    ) -> Result<Option<Veiculo>, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>(
            r#"
            SELECT * FROM veiculos
            WHERE orgao_id = $1
              AND ativo = true
              AND LOWER(placa) = LOWER($2)
            LIMIT 1
            "#,
        )
        .bind(orgao_id)
        .bind(placa)
        .fetch_optional(&self.pool)
        .await?;

        Ok(veiculo)
    }

    pub async fn buscar_veiculo_por_id(&self, id: Uuid) -> Result<Option<Veiculo>, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>("SELECT * FROM veiculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(veiculo)
    }

    pub async fn buscar_empresa_por_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(empresa)
    }
}
