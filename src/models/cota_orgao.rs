//! Modelo de CotaOrgao
//!
//! Saldo de cota de combustível alocado a um órgão dentro de um processo
//! de compra. Mutado apenas por incrementos atômicos no banco (reserva,
//! liberação e consumo na efetivação).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Saldo de cota por (processo, órgão, combustível) - tabela cotas_orgao
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CotaOrgao {
    pub id: Uuid,
    pub processo_id: Option<Uuid>,
    pub orgao_id: Uuid,
    pub combustivel_id: Uuid,
    pub quantidade: Decimal,
    pub quantidade_utilizada: Decimal,
    /// Reserva provisória colocada por solicitações pendentes em modo cota
    pub quantidade_reservada: Decimal,
    pub ativa: bool,
    pub created_at: DateTime<Utc>,
}

impl CotaOrgao {
    /// Saldo restante considerando consumo e reservas em aberto
    pub fn restante(&self) -> Decimal {
        (self.quantidade - self.quantidade_utilizada - self.quantidade_reservada)
            .max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cota(quantidade: i64, utilizada: i64, reservada: i64) -> CotaOrgao {
        CotaOrgao {
            id: Uuid::new_v4(),
            processo_id: None,
            orgao_id: Uuid::new_v4(),
            combustivel_id: Uuid::new_v4(),
            quantidade: Decimal::new(quantidade, 0),
            quantidade_utilizada: Decimal::new(utilizada, 0),
            quantidade_reservada: Decimal::new(reservada, 0),
            ativa: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_restante_desconta_reserva() {
        assert_eq!(cota(1000, 200, 50).restante(), Decimal::new(750, 0));
    }

    #[test]
    fn test_restante_nunca_negativo() {
        assert_eq!(cota(100, 90, 30).restante(), Decimal::ZERO);
    }
}
