//! Persistência do saldo de cota por órgão
//!
//! Todas as mutações de saldo são statements atômicos de incremento no
//! banco; nunca read-modify-write na aplicação.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::cota_orgao::CotaOrgao;
use crate::utils::errors::AppError;

pub struct CotaOrgaoRepository {
    pool: PgPool,
}

impl CotaOrgaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<CotaOrgao>, AppError> {
        let cota = sqlx::query_as::<_, CotaOrgao>("SELECT * FROM cotas_orgao WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cota)
    }

    /// Saldo ativo criado mais recentemente para (órgão, combustível)
    pub async fn buscar_mais_recente_ativa(
        &self,
        orgao_id: Uuid,
        combustivel_id: Uuid,
    ) -> Result<Option<CotaOrgao>, AppError> {
        let cota = sqlx::query_as::<_, CotaOrgao>(
            r#"
            SELECT * FROM cotas_orgao
            WHERE orgao_id = $1
              AND combustivel_id = $2
              AND ativa = true
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(orgao_id)
        .bind(combustivel_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cota)
    }

    /// Coloca reserva provisória sobre o saldo
    pub async fn reservar(&self, id: Uuid, quantidade: Decimal) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE cotas_orgao
            SET quantidade_reservada = quantidade_reservada + $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(quantidade)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Devolve reserva provisória ao saldo; nunca deixa a reserva negativa
    pub async fn liberar_reserva(&self, id: Uuid, quantidade: Decimal) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE cotas_orgao
            SET quantidade_reservada = GREATEST(quantidade_reservada - $2, 0)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(quantidade)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
