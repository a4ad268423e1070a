use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::cota_dto::{CotaPeriodoResponse, ImportarCotasRequest, ResumoImportacao};
use crate::services::cota_import_service::CotaImportService;
use crate::services::cota_periodo_service::CotaPeriodoService;
use crate::utils::errors::AppError;

pub struct CotaController {
    import_service: CotaImportService,
    cota_service: CotaPeriodoService,
}

impl CotaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            import_service: CotaImportService::new(pool.clone()),
            cota_service: CotaPeriodoService::from_pool(pool),
        }
    }

    /// Importação em massa a partir do texto extraído do documento.
    /// Falha de documento inteiro vira 4xx; falha de linha vira sucesso
    /// parcial no resumo.
    pub async fn importar(
        &self,
        request: ImportarCotasRequest,
    ) -> Result<ResumoImportacao, AppError> {
        request.validate()?;
        self.import_service.importar_texto(&request.texto).await
    }

    /// Cota vigente do veículo (janela que contém o instante atual)
    pub async fn vigente_do_veiculo(
        &self,
        veiculo_id: Uuid,
    ) -> Result<CotaPeriodoResponse, AppError> {
        let cota = self
            .cota_service
            .vigente_por_veiculo(veiculo_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Veículo não possui cota vigente".to_string())
            })?;

        Ok(cota.into())
    }
}
