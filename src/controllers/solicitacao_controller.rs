use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::solicitacao_dto::{
    AtualizarSolicitacaoRequest, AtualizarStatusRequest, CriarSolicitacaoRequest,
    EfetivacaoResponse, EfetivarSolicitacaoRequest, SolicitacaoFilters, SolicitacaoResponse,
};
use crate::repositories::solicitacao_repository::SolicitacaoRepository;
use crate::services::solicitacao_service::SolicitacaoService;
use crate::utils::errors::AppError;

pub struct SolicitacaoController {
    service: SolicitacaoService,
    repository: SolicitacaoRepository,
}

impl SolicitacaoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: SolicitacaoService::new(pool.clone()),
            repository: SolicitacaoRepository::new(pool),
        }
    }

    pub async fn criar(
        &self,
        request: CriarSolicitacaoRequest,
    ) -> Result<ApiResponse<SolicitacaoResponse>, AppError> {
        request.validate()?;

        if request.quantidade <= rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest(
                "A quantidade deve ser maior que zero".to_string(),
            ));
        }

        let solicitacao = self.service.criar(request).await?;

        Ok(ApiResponse::success_with_message(
            solicitacao.into(),
            "Solicitação criada com sucesso".to_string(),
        ))
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<SolicitacaoResponse, AppError> {
        let solicitacao = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        Ok(solicitacao.into())
    }

    pub async fn listar(
        &self,
        filters: SolicitacaoFilters,
    ) -> Result<Vec<SolicitacaoResponse>, AppError> {
        let solicitacoes = self.repository.listar(&filters).await?;
        Ok(solicitacoes.into_iter().map(Into::into).collect())
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        request: AtualizarSolicitacaoRequest,
    ) -> Result<ApiResponse<SolicitacaoResponse>, AppError> {
        request.validate()?;

        let solicitacao = self.repository.atualizar_campos(id, &request).await?;

        Ok(ApiResponse::success_with_message(
            solicitacao.into(),
            "Solicitação atualizada com sucesso".to_string(),
        ))
    }

    pub async fn atualizar_status(
        &self,
        id: Uuid,
        request: AtualizarStatusRequest,
    ) -> Result<ApiResponse<SolicitacaoResponse>, AppError> {
        request.validate()?;

        let solicitacao = self.service.atualizar_status(id, request).await?;

        Ok(ApiResponse::success_with_message(
            solicitacao.into(),
            "Status atualizado com sucesso".to_string(),
        ))
    }

    pub async fn efetivar(
        &self,
        id: Uuid,
        request: EfetivarSolicitacaoRequest,
    ) -> Result<ApiResponse<EfetivacaoResponse>, AppError> {
        request.validate()?;

        let efetivacao = self.service.efetivar(id, request).await?;

        Ok(ApiResponse::success_with_message(
            efetivacao,
            "Solicitação efetivada com sucesso".to_string(),
        ))
    }

    pub async fn desativar(&self, id: Uuid) -> Result<(), AppError> {
        let afetadas = self.repository.desativar(id).await?;
        if afetadas == 0 {
            return Err(AppError::NotFound("Solicitação não encontrada".to_string()));
        }
        Ok(())
    }
}
