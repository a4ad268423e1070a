use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::solicitacao_controller::SolicitacaoController;
use crate::dto::common::ApiResponse;
use crate::dto::solicitacao_dto::{
    AtualizarSolicitacaoRequest, AtualizarStatusRequest, CriarSolicitacaoRequest,
    EfetivacaoResponse, EfetivarSolicitacaoRequest, SolicitacaoFilters, SolicitacaoResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_solicitacao_router() -> Router<AppState> {
    Router::new()
        .route("/", post(criar_solicitacao))
        .route("/", get(listar_solicitacoes))
        .route("/:id", get(buscar_solicitacao))
        .route("/:id", put(atualizar_solicitacao))
        .route("/:id", delete(desativar_solicitacao))
        .route("/:id/status", patch(atualizar_status))
        .route("/:id/efetivar", post(efetivar_solicitacao))
}

async fn criar_solicitacao(
    State(state): State<AppState>,
    Json(request): Json<CriarSolicitacaoRequest>,
) -> Result<Json<ApiResponse<SolicitacaoResponse>>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.criar(request).await?;
    Ok(Json(response))
}

async fn listar_solicitacoes(
    State(state): State<AppState>,
    Query(filters): Query<SolicitacaoFilters>,
) -> Result<Json<Vec<SolicitacaoResponse>>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.listar(filters).await?;
    Ok(Json(response))
}

async fn buscar_solicitacao(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.buscar_por_id(id).await?;
    Ok(Json(response))
}

async fn atualizar_solicitacao(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AtualizarSolicitacaoRequest>,
) -> Result<Json<ApiResponse<SolicitacaoResponse>>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.atualizar(id, request).await?;
    Ok(Json(response))
}

async fn atualizar_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AtualizarStatusRequest>,
) -> Result<Json<ApiResponse<SolicitacaoResponse>>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.atualizar_status(id, request).await?;
    Ok(Json(response))
}

async fn efetivar_solicitacao(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EfetivarSolicitacaoRequest>,
) -> Result<Json<ApiResponse<EfetivacaoResponse>>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    let response = controller.efetivar(id, request).await?;
    Ok(Json(response))
}

async fn desativar_solicitacao(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = SolicitacaoController::new(state.pool.clone());
    controller.desativar(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Solicitação desativada com sucesso"
    })))
}
