use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::cota_controller::CotaController;
use crate::dto::cota_dto::{CotaPeriodoResponse, ImportarCotasRequest, ResumoImportacao};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_cota_router() -> Router<AppState> {
    Router::new()
        .route("/importar", post(importar_cotas))
        .route("/veiculo/:veiculo_id/vigente", get(cota_vigente_do_veiculo))
}

async fn importar_cotas(
    State(state): State<AppState>,
    Json(request): Json<ImportarCotasRequest>,
) -> Result<Json<ResumoImportacao>, AppError> {
    let controller = CotaController::new(state.pool.clone());
    let response = controller.importar(request).await?;
    Ok(Json(response))
}

async fn cota_vigente_do_veiculo(
    State(state): State<AppState>,
    Path(veiculo_id): Path<Uuid>,
) -> Result<Json<CotaPeriodoResponse>, AppError> {
    let controller = CotaController::new(state.pool.clone());
    let response = controller.vigente_do_veiculo(veiculo_id).await?;
    Ok(Json(response))
}
