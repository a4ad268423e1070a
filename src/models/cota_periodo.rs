//! Modelo de CotaPeriodo
//!
//! Janela concreta (diária/semanal/mensal) de cota de um veículo, com as
//! quantidades permitida/utilizada/disponível. Existe no máximo um registro
//! ativo por veículo cuja janela contém o instante atual; janelas antigas
//! são mantidas como histórico.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registro de cota por janela - mapeia à tabela cotas_periodo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CotaPeriodo {
    pub id: Uuid,
    pub veiculo_id: Uuid,
    pub periodicidade: String,
    pub quantidade_permitida: Decimal,
    pub quantidade_utilizada: Decimal,
    /// Sempre rederivada como max(permitida - utilizada, 0); nunca confiada
    /// de forma independente
    pub quantidade_disponivel: Decimal,
    pub janela_inicio: DateTime<Utc>,
    pub janela_fim: DateTime<Utc>,
    pub ativa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Disponível nunca é negativo, mesmo com utilizada > permitida
pub fn quantidade_disponivel(permitida: Decimal, utilizada: Decimal) -> Decimal {
    (permitida - utilizada).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disponivel_nunca_negativo() {
        let d = quantidade_disponivel(Decimal::new(100, 0), Decimal::new(130, 0));
        assert_eq!(d, Decimal::ZERO);
    }

    #[test]
    fn test_disponivel_derivado() {
        let d = quantidade_disponivel(Decimal::new(100, 0), Decimal::new(30, 0));
        assert_eq!(d, Decimal::new(70, 0));
    }
}
