//! Serviço de períodos de cota
//!
//! Traduz a periodicidade do veículo em uma janela concreta e faz o upsert
//! idempotente das quantidades permitida/utilizada/disponível dentro dessa
//! janela. Reingestão do mesmo documento dentro da mesma janela produz o
//! mesmo estado armazenado.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::cota_periodo::{quantidade_disponivel, CotaPeriodo};
use crate::models::veiculo::Periodicidade;
use crate::repositories::cota_periodo_repository::{
    CotaPeriodoRepository, CotaPeriodoStore, NovaCotaPeriodo,
};
use crate::utils::errors::AppError;

/// Janela concreta da periodicidade contendo o instante de referência.
///
/// Diária: 00:00:00.000 até 23:59:59.999 do próprio dia. Semanal: segunda
/// 00:00:00.000 até domingo 23:59:59.999. Mensal: dia 1 até o último dia do
/// mês (calculado como dia anterior ao dia 1 do mês seguinte).
pub fn janela_para(
    periodicidade: Periodicidade,
    instante: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let data = instante.date_naive();

    match periodicidade {
        Periodicidade::Diaria => (inicio_do_dia(data), fim_do_dia(data)),
        Periodicidade::Semanal => {
            let segunda =
                data - Duration::days(data.weekday().num_days_from_monday() as i64);
            let domingo = segunda + Duration::days(6);
            (inicio_do_dia(segunda), fim_do_dia(domingo))
        }
        Periodicidade::Mensal => {
            let primeiro = data.with_day(1).unwrap_or(data);
            let (ano_seguinte, mes_seguinte) = if data.month() == 12 {
                (data.year() + 1, 1)
            } else {
                (data.year(), data.month() + 1)
            };
            let ultimo = NaiveDate::from_ymd_opt(ano_seguinte, mes_seguinte, 1)
                .and_then(|d| d.pred_opt())
                .unwrap_or(data);
            (inicio_do_dia(primeiro), fim_do_dia(ultimo))
        }
    }
}

fn inicio_do_dia(data: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&data.and_hms_opt(0, 0, 0).unwrap())
}

fn fim_do_dia(data: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&data.and_hms_milli_opt(23, 59, 59, 999).unwrap())
}

/// Serviço de upsert de cotas por janela
pub struct CotaPeriodoService {
    store: Arc<dyn CotaPeriodoStore>,
}

impl CotaPeriodoService {
    pub fn new(store: Arc<dyn CotaPeriodoStore>) -> Self {
        Self { store }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(CotaPeriodoRepository::new(pool)))
    }

    /// Upsert idempotente das quantidades na janela vigente do veículo.
    ///
    /// Ausente: cria o registro da janela. Presente: sobrescreve permitida e
    /// utilizada sem alterar os limites da janela. `disponivel` é sempre
    /// rederivado e nunca negativo.
    pub async fn upsert(
        &self,
        veiculo_id: Uuid,
        periodicidade: Periodicidade,
        quantidade_permitida: Decimal,
        quantidade_utilizada: Decimal,
    ) -> Result<CotaPeriodo, AppError> {
        let agora = Utc::now();
        let (janela_inicio, janela_fim) = janela_para(periodicidade, agora);
        let disponivel = quantidade_disponivel(quantidade_permitida, quantidade_utilizada);

        match self
            .store
            .buscar_vigente(veiculo_id, periodicidade, agora)
            .await?
        {
            Some(vigente) => {
                self.store
                    .atualizar_quantidades(
                        vigente.id,
                        quantidade_permitida,
                        quantidade_utilizada,
                        disponivel,
                    )
                    .await
            }
            None => {
                self.store
                    .criar(NovaCotaPeriodo {
                        veiculo_id,
                        periodicidade,
                        quantidade_permitida,
                        quantidade_utilizada,
                        quantidade_disponivel: disponivel,
                        janela_inicio,
                        janela_fim,
                    })
                    .await
            }
        }
    }

    /// Cota vigente do veículo, qualquer periodicidade
    pub async fn vigente_por_veiculo(
        &self,
        veiculo_id: Uuid,
    ) -> Result<Option<CotaPeriodo>, AppError> {
        self.store
            .buscar_vigente_por_veiculo(veiculo_id, Utc::now())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Weekday;
    use std::sync::Mutex;

    /// Store em memória para testes determinísticos, sem banco
    struct MemStore {
        registros: Mutex<Vec<CotaPeriodo>>,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                registros: Mutex::new(Vec::new()),
            }
        }

        fn total(&self) -> usize {
            self.registros.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CotaPeriodoStore for MemStore {
        async fn buscar_vigente(
            &self,
            veiculo_id: Uuid,
            periodicidade: Periodicidade,
            instante: DateTime<Utc>,
        ) -> Result<Option<CotaPeriodo>, AppError> {
            Ok(self
                .registros
                .lock()
                .unwrap()
                .iter()
                .find(|c| {
                    c.veiculo_id == veiculo_id
                        && c.periodicidade == periodicidade.as_str()
                        && c.ativa
                        && c.janela_inicio <= instante
                        && c.janela_fim >= instante
                })
                .cloned())
        }

        async fn buscar_vigente_por_veiculo(
            &self,
            veiculo_id: Uuid,
            instante: DateTime<Utc>,
        ) -> Result<Option<CotaPeriodo>, AppError> {
            Ok(self
                .registros
                .lock()
                .unwrap()
                .iter()
                .find(|c| {
                    c.veiculo_id == veiculo_id
                        && c.ativa
                        && c.janela_inicio <= instante
                        && c.janela_fim >= instante
                })
                .cloned())
        }

        async fn criar(&self, nova: NovaCotaPeriodo) -> Result<CotaPeriodo, AppError> {
            let agora = Utc::now();
            let cota = CotaPeriodo {
                id: Uuid::new_v4(),
                veiculo_id: nova.veiculo_id,
                periodicidade: nova.periodicidade.as_str().to_string(),
                quantidade_permitida: nova.quantidade_permitida,
                quantidade_utilizada: nova.quantidade_utilizada,
                quantidade_disponivel: nova.quantidade_disponivel,
                janela_inicio: nova.janela_inicio,
                janela_fim: nova.janela_fim,
                ativa: true,
                created_at: agora,
                updated_at: agora,
            };
            self.registros.lock().unwrap().push(cota.clone());
            Ok(cota)
        }

        async fn atualizar_quantidades(
            &self,
            id: Uuid,
            permitida: Decimal,
            utilizada: Decimal,
            disponivel: Decimal,
        ) -> Result<CotaPeriodo, AppError> {
            let mut registros = self.registros.lock().unwrap();
            let cota = registros
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::NotFound("cota não encontrada".to_string()))?;
            cota.quantidade_permitida = permitida;
            cota.quantidade_utilizada = utilizada;
            cota.quantidade_disponivel = disponivel;
            cota.updated_at = Utc::now();
            Ok(cota.clone())
        }
    }

    fn instante(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_janela_diaria_contem_instante() {
        let agora = instante("2026-03-17T14:25:00Z");
        let (inicio, fim) = janela_para(Periodicidade::Diaria, agora);

        assert!(inicio <= agora && agora <= fim);
        assert_eq!(inicio, instante("2026-03-17T00:00:00Z"));
        assert_eq!(fim, instante("2026-03-17T23:59:59.999Z"));
    }

    #[test]
    fn test_janela_semanal_comeca_na_segunda() {
        // 2026-03-19 é quinta-feira
        let agora = instante("2026-03-19T10:00:00Z");
        let (inicio, fim) = janela_para(Periodicidade::Semanal, agora);

        assert!(inicio <= agora && agora <= fim);
        assert_eq!(inicio.date_naive().weekday(), Weekday::Mon);
        assert_eq!(inicio, instante("2026-03-16T00:00:00Z"));
        assert_eq!(fim, instante("2026-03-22T23:59:59.999Z"));
    }

    #[test]
    fn test_janela_semanal_na_propria_segunda() {
        let segunda = instante("2026-03-16T00:30:00Z");
        let (inicio, _) = janela_para(Periodicidade::Semanal, segunda);
        assert_eq!(inicio, instante("2026-03-16T00:00:00Z"));
    }

    #[test]
    fn test_janela_mensal_fevereiro_bissexto() {
        let agora = instante("2024-02-10T08:00:00Z");
        let (inicio, fim) = janela_para(Periodicidade::Mensal, agora);

        assert_eq!(inicio, instante("2024-02-01T00:00:00Z"));
        assert_eq!(fim, instante("2024-02-29T23:59:59.999Z"));
    }

    #[test]
    fn test_janela_mensal_virada_de_ano() {
        let agora = instante("2025-12-31T23:00:00Z");
        let (inicio, fim) = janela_para(Periodicidade::Mensal, agora);

        assert_eq!(inicio, instante("2025-12-01T00:00:00Z"));
        assert_eq!(fim, instante("2025-12-31T23:59:59.999Z"));
    }

    #[tokio::test]
    async fn test_upsert_cria_e_atualiza_na_mesma_janela() {
        let store = Arc::new(MemStore::new());
        let service = CotaPeriodoService::new(store.clone());
        let veiculo_id = Uuid::new_v4();

        let criada = service
            .upsert(
                veiculo_id,
                Periodicidade::Semanal,
                Decimal::new(100, 0),
                Decimal::new(30, 0),
            )
            .await
            .unwrap();

        assert_eq!(criada.quantidade_disponivel, Decimal::new(70, 0));
        assert_eq!(store.total(), 1);

        // Reingestão com novos valores na mesma janela: atualiza in loco
        let atualizada = service
            .upsert(
                veiculo_id,
                Periodicidade::Semanal,
                Decimal::new(120, 0),
                Decimal::new(45, 0),
            )
            .await
            .unwrap();

        assert_eq!(atualizada.id, criada.id);
        assert_eq!(atualizada.quantidade_disponivel, Decimal::new(75, 0));
        assert_eq!(store.total(), 1);
        assert_eq!(atualizada.janela_inicio, criada.janela_inicio);
        assert_eq!(atualizada.janela_fim, criada.janela_fim);
    }

    #[tokio::test]
    async fn test_upsert_idempotente() {
        let store = Arc::new(MemStore::new());
        let service = CotaPeriodoService::new(store.clone());
        let veiculo_id = Uuid::new_v4();

        let primeira = service
            .upsert(
                veiculo_id,
                Periodicidade::Mensal,
                Decimal::new(500, 0),
                Decimal::new(125, 0),
            )
            .await
            .unwrap();
        let segunda = service
            .upsert(
                veiculo_id,
                Periodicidade::Mensal,
                Decimal::new(500, 0),
                Decimal::new(125, 0),
            )
            .await
            .unwrap();

        assert_eq!(store.total(), 1);
        assert_eq!(primeira.id, segunda.id);
        assert_eq!(
            primeira.quantidade_disponivel,
            segunda.quantidade_disponivel
        );
    }

    #[tokio::test]
    async fn test_upsert_disponivel_nunca_negativo() {
        let store = Arc::new(MemStore::new());
        let service = CotaPeriodoService::new(store);

        let cota = service
            .upsert(
                Uuid::new_v4(),
                Periodicidade::Diaria,
                Decimal::new(50, 0),
                Decimal::new(80, 0),
            )
            .await
            .unwrap();

        assert_eq!(cota.quantidade_disponivel, Decimal::ZERO);
    }
}
