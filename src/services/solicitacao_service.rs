//! Serviço do ciclo de vida das solicitações de abastecimento
//!
//! Estados: pendente → {aprovada, rejeitada, expirada}; aprovada →
//! efetivada. Rejeitada, expirada e efetivada são terminais. A efetivação
//! acontece exclusivamente pela transação de criação do abastecimento, que
//! aprova implicitamente solicitações pendentes, vincula o abastecimento e
//! consome a cota do órgão de forma atômica.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::solicitacao_dto::{
    AtualizarStatusRequest, CriarSolicitacaoRequest, EfetivacaoResponse,
    EfetivarSolicitacaoRequest,
};
use crate::models::abastecimento::Abastecimento;
use crate::models::cota_orgao::CotaOrgao;
use crate::models::solicitacao::{ModoAbastecimento, SolicitacaoAbastecimento, StatusSolicitacao};
use crate::repositories::cota_orgao_repository::CotaOrgaoRepository;
use crate::repositories::frota_repository::FrotaRepository;
use crate::repositories::solicitacao_repository::{NovaSolicitacao, SolicitacaoRepository};
use crate::utils::errors::AppError;

/// Tabela de transições do ciclo de vida
pub fn transicao_permitida(de: StatusSolicitacao, para: StatusSolicitacao) -> bool {
    use StatusSolicitacao::*;
    matches!(
        (de, para),
        (Pendente, Aprovada) | (Pendente, Rejeitada) | (Pendente, Expirada) | (Aprovada, Efetivada)
    )
}

pub struct SolicitacaoService {
    pool: PgPool,
    solicitacoes: SolicitacaoRepository,
    cotas_orgao: CotaOrgaoRepository,
    frota: FrotaRepository,
}

impl SolicitacaoService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            solicitacoes: SolicitacaoRepository::new(pool.clone()),
            cotas_orgao: CotaOrgaoRepository::new(pool.clone()),
            frota: FrotaRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cria a solicitação. Em modo cota, coloca reserva provisória sobre o
    /// saldo ativo mais recente do órgão e memoriza o saldo reservado para
    /// liberação na expiração/rejeição ou consumo na efetivação.
    pub async fn criar(
        &self,
        request: CriarSolicitacaoRequest,
    ) -> Result<SolicitacaoAbastecimento, AppError> {
        let modo = ModoAbastecimento::parse(&request.modo_abastecimento)
            .ok_or_else(|| AppError::BadRequest("Modo de abastecimento inválido".to_string()))?;

        let status = match &request.status_inicial {
            Some(valor) => StatusSolicitacao::parse(valor)
                .ok_or_else(|| AppError::BadRequest("Status inicial inválido".to_string()))?,
            None => StatusSolicitacao::Pendente,
        };

        let veiculo = self
            .frota
            .buscar_veiculo_por_id(request.veiculo_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Veículo não encontrado".to_string()))?;

        // Reserva provisória só faz sentido enquanto a solicitação ainda
        // pode ser efetivada
        let cota_orgao_id = if modo == ModoAbastecimento::Cota && !status.e_terminal() {
            self.reservar_cota(veiculo.orgao_id, request.combustivel_id, request.quantidade)
                .await?
        } else {
            None
        };

        let solicitacao = self
            .solicitacoes
            .criar(NovaSolicitacao {
                veiculo_id: request.veiculo_id,
                motorista_id: request.motorista_id,
                combustivel_id: request.combustivel_id,
                empresa_id: request.empresa_id,
                quantidade: request.quantidade,
                valor_unitario: request.valor_unitario,
                valor_total: request.valor_total,
                modo_abastecimento: modo.as_str().to_string(),
                status: status.as_str().to_string(),
                abastecido_por: request
                    .abastecido_por
                    .unwrap_or_else(|| "Sistema".to_string()),
                nfe_numero: request.nfe_numero,
                referencia: request.referencia,
                expira_em: request.expira_em,
                cota_orgao_id,
            })
            .await?;

        info!(
            "📝 Solicitação {} criada (status {}, modo {})",
            solicitacao.id, solicitacao.status, solicitacao.modo_abastecimento
        );

        Ok(solicitacao)
    }

    async fn reservar_cota(
        &self,
        orgao_id: Uuid,
        combustivel_id: Uuid,
        quantidade: Decimal,
    ) -> Result<Option<Uuid>, AppError> {
        match self
            .cotas_orgao
            .buscar_mais_recente_ativa(orgao_id, combustivel_id)
            .await?
        {
            Some(cota) => {
                self.cotas_orgao.reservar(cota.id, quantidade).await?;
                info!("🔒 Reserva de {} colocada na cota {}", quantidade, cota.id);
                Ok(Some(cota.id))
            }
            None => Ok(None),
        }
    }

    /// Aprovação/rejeição/expiração manual, guardada pela tabela de
    /// transições. Estados terminais nunca transicionam de novo.
    pub async fn atualizar_status(
        &self,
        id: Uuid,
        request: AtualizarStatusRequest,
    ) -> Result<SolicitacaoAbastecimento, AppError> {
        let solicitacao = self
            .solicitacoes
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        let atual = solicitacao.status_parseado().ok_or_else(|| {
            AppError::Internal(format!("status desconhecido '{}'", solicitacao.status))
        })?;

        let novo = StatusSolicitacao::parse(&request.status)
            .ok_or_else(|| AppError::BadRequest("Status inválido".to_string()))?;

        if novo == StatusSolicitacao::Efetivada {
            return Err(AppError::BadRequest(
                "Efetivação ocorre pela criação do abastecimento, não por mudança direta de status"
                    .to_string(),
            ));
        }

        if !transicao_permitida(atual, novo) {
            return Err(AppError::InvalidTransition(format!(
                "Transição de '{}' para '{}' não é permitida",
                atual.as_str(),
                novo.as_str()
            )));
        }

        let afetadas = match novo {
            StatusSolicitacao::Aprovada => {
                self.solicitacoes
                    .aprovar_condicional(
                        id,
                        &request.ator_nome,
                        request.ator_email.as_deref(),
                        request.ator_empresa.as_deref(),
                    )
                    .await?
            }
            StatusSolicitacao::Rejeitada => {
                let motivo = request
                    .motivo_rejeicao
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| {
                        AppError::BadRequest("Motivo da rejeição é obrigatório".to_string())
                    })?;
                self.solicitacoes
                    .rejeitar_condicional(
                        id,
                        &request.ator_nome,
                        request.ator_email.as_deref(),
                        request.ator_empresa.as_deref(),
                        motivo,
                    )
                    .await?
            }
            StatusSolicitacao::Expirada => self.solicitacoes.expirar_condicional(id).await?,
            // Pendente/Efetivada nunca chegam aqui pela tabela de transições
            _ => 0,
        };

        if afetadas == 0 {
            return Err(AppError::Conflict(
                "Solicitação foi alterada por outra operação".to_string(),
            ));
        }

        // Rejeição e expiração devolvem a reserva provisória
        if matches!(
            novo,
            StatusSolicitacao::Rejeitada | StatusSolicitacao::Expirada
        ) {
            self.liberar_reserva_da(&solicitacao).await?;
        }

        let atualizada = self
            .solicitacoes
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        info!(
            "🔄 Solicitação {} transicionou de '{}' para '{}'",
            id,
            atual.as_str(),
            atualizada.status
        );

        Ok(atualizada)
    }

    async fn liberar_reserva_da(
        &self,
        solicitacao: &SolicitacaoAbastecimento,
    ) -> Result<(), AppError> {
        if solicitacao.modo_parseado() != Some(ModoAbastecimento::Cota) {
            return Ok(());
        }
        if let Some(cota_orgao_id) = solicitacao.cota_orgao_id {
            self.cotas_orgao
                .liberar_reserva(cota_orgao_id, solicitacao.quantidade)
                .await?;
            info!(
                "🔓 Reserva de {} devolvida à cota {}",
                solicitacao.quantidade, cota_orgao_id
            );
        }
        Ok(())
    }

    /// Efetiva a solicitação criando o abastecimento.
    ///
    /// Solicitações pendentes são aprovadas implicitamente dentro da mesma
    /// transação (`auto_aprovada = true`). Aprovação, criação do
    /// abastecimento, vínculo e consumo da cota acontecem em uma única
    /// transação; qualquer falha desfaz tudo.
    pub async fn efetivar(
        &self,
        id: Uuid,
        request: EfetivarSolicitacaoRequest,
    ) -> Result<EfetivacaoResponse, AppError> {
        let solicitacao = self
            .solicitacoes
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitação não encontrada".to_string()))?;

        // Contexto de empresa do chamador precisa bater com a solicitação
        if solicitacao.empresa_id != request.empresa_id {
            return Err(AppError::Unauthorized(
                "Solicitação pertence a outra empresa".to_string(),
            ));
        }

        let empresa = self
            .frota
            .buscar_empresa_por_id(request.empresa_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa não encontrada".to_string()))?;
        if !empresa.ativa {
            return Err(AppError::BadRequest("Empresa está inativa".to_string()));
        }

        if solicitacao.abastecimento_id.is_some() {
            return Err(AppError::Conflict(
                "Solicitação já possui abastecimento vinculado".to_string(),
            ));
        }

        if !solicitacao.ativa {
            return Err(AppError::BadRequest(
                "Solicitação está desativada".to_string(),
            ));
        }

        let status = solicitacao.status_parseado().ok_or_else(|| {
            AppError::Internal(format!("status desconhecido '{}'", solicitacao.status))
        })?;

        match status {
            StatusSolicitacao::Rejeitada | StatusSolicitacao::Expirada => {
                return Err(AppError::BadRequest(format!(
                    "Solicitação {} não pode ser efetivada",
                    status.as_str()
                )));
            }
            StatusSolicitacao::Efetivada => {
                return Err(AppError::Conflict(
                    "Solicitação já foi efetivada".to_string(),
                ));
            }
            StatusSolicitacao::Pendente | StatusSolicitacao::Aprovada => {}
        }

        let veiculo = self
            .frota
            .buscar_veiculo_por_id(solicitacao.veiculo_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Veículo da solicitação não encontrado".to_string()))?;

        // Validação de capacidade: acima do tanque, a efetivação nem começa
        if let Some(capacidade) = veiculo.capacidade_tanque {
            if solicitacao.quantidade > capacidade {
                return Err(AppError::BadRequest(format!(
                    "Quantidade {} excede a capacidade do tanque ({})",
                    solicitacao.quantidade, capacidade
                )));
            }
        }

        let auto_aprovada = status == StatusSolicitacao::Pendente;
        let modo = solicitacao.modo_parseado();

        let mut tx = self.pool.begin().await?;

        // Aprovação implícita, guardada pelo status para perder a corrida
        // com segurança se outra operação chegou antes
        if auto_aprovada {
            let aprovadas = sqlx::query(
                r#"
                UPDATE solicitacoes_abastecimento
                SET status = 'aprovada',
                    aprovada_por_nome = $2,
                    aprovada_por_email = $3,
                    aprovada_por_empresa = $4,
                    aprovada_em = $5
                WHERE id = $1 AND status = 'pendente'
                "#,
            )
            .bind(id)
            .bind(&request.ator_nome)
            .bind(request.ator_email.as_deref())
            .bind(&empresa.nome)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if aprovadas == 0 {
                tx.rollback().await?;
                return Err(AppError::Conflict(
                    "Solicitação foi alterada por outra operação".to_string(),
                ));
            }
        }

        // Em modo cota, vincula o saldo reservado na criação ou, na falta
        // dele, o saldo ativo mais recente do órgão
        let cota_vinculada: Option<CotaOrgao> = if modo == Some(ModoAbastecimento::Cota) {
            match solicitacao.cota_orgao_id {
                Some(cota_id) => {
                    sqlx::query_as::<_, CotaOrgao>("SELECT * FROM cotas_orgao WHERE id = $1")
                        .bind(cota_id)
                        .fetch_optional(&mut *tx)
                        .await?
                }
                None => {
                    sqlx::query_as::<_, CotaOrgao>(
                        r#"
                        SELECT * FROM cotas_orgao
                        WHERE orgao_id = $1 AND combustivel_id = $2 AND ativa = true
                        ORDER BY created_at DESC
                        LIMIT 1
                        "#,
                    )
                    .bind(veiculo.orgao_id)
                    .bind(solicitacao.combustivel_id)
                    .fetch_optional(&mut *tx)
                    .await?
                }
            }
        } else {
            None
        };

        let valor_total = request
            .valor_total
            .or(solicitacao.valor_total)
            .or_else(|| {
                request
                    .valor_unitario
                    .or(solicitacao.valor_unitario)
                    .map(|unitario| unitario * solicitacao.quantidade)
            })
            .unwrap_or(Decimal::ZERO);

        let agora = chrono::Utc::now();
        let abastecimento = sqlx::query_as::<_, Abastecimento>(
            r#"
            INSERT INTO abastecimentos
                (id, solicitacao_id, veiculo_id, motorista_id, combustivel_id, empresa_id,
                 cota_orgao_id, quantidade, valor_total, status, nfe_numero, referencia,
                 abastecido_em, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'aprovado', $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(solicitacao.veiculo_id)
        .bind(solicitacao.motorista_id)
        .bind(solicitacao.combustivel_id)
        .bind(solicitacao.empresa_id)
        .bind(cota_vinculada.as_ref().map(|c| c.id))
        .bind(solicitacao.quantidade)
        .bind(valor_total)
        .bind(request.nfe_numero.as_deref().or(solicitacao.nfe_numero.as_deref()))
        .bind(solicitacao.referencia.as_deref())
        .bind(agora)
        .fetch_one(&mut *tx)
        .await?;

        // Vínculo condicional: zero linhas afetadas significa que uma
        // efetivação concorrente chegou primeiro
        let vinculadas = sqlx::query(
            r#"
            UPDATE solicitacoes_abastecimento
            SET abastecimento_id = $2, status = 'efetivada'
            WHERE id = $1 AND abastecimento_id IS NULL
            "#,
        )
        .bind(id)
        .bind(abastecimento.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if vinculadas == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                "Solicitação já possui abastecimento vinculado".to_string(),
            ));
        }

        // Consumo atômico da cota: incremento único no banco, nunca
        // read-modify-write. A reserva só é abatida quando foi esta
        // solicitação que a colocou.
        if let Some(cota) = &cota_vinculada {
            if solicitacao.cota_orgao_id == Some(cota.id) {
                sqlx::query(
                    r#"
                    UPDATE cotas_orgao
                    SET quantidade_utilizada = quantidade_utilizada + $2,
                        quantidade_reservada = GREATEST(quantidade_reservada - $2, 0)
                    WHERE id = $1
                    "#,
                )
                .bind(cota.id)
                .bind(solicitacao.quantidade)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    r#"
                    UPDATE cotas_orgao
                    SET quantidade_utilizada = quantidade_utilizada + $2
                    WHERE id = $1
                    "#,
                )
                .bind(cota.id)
                .bind(solicitacao.quantidade)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(
            "⛽ Solicitação {} efetivada no abastecimento {} (auto aprovada: {})",
            id, abastecimento.id, auto_aprovada
        );

        Ok(EfetivacaoResponse {
            solicitacao_id: id,
            auto_aprovada,
            abastecimento: abastecimento.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StatusSolicitacao::*;

    #[test]
    fn test_transicoes_a_partir_de_pendente() {
        assert!(transicao_permitida(Pendente, Aprovada));
        assert!(transicao_permitida(Pendente, Rejeitada));
        assert!(transicao_permitida(Pendente, Expirada));
        assert!(!transicao_permitida(Pendente, Efetivada));
    }

    #[test]
    fn test_aprovada_so_efetiva() {
        assert!(transicao_permitida(Aprovada, Efetivada));
        assert!(!transicao_permitida(Aprovada, Rejeitada));
        assert!(!transicao_permitida(Aprovada, Expirada));
        assert!(!transicao_permitida(Aprovada, Pendente));
    }

    #[test]
    fn test_estados_terminais_nao_transicionam() {
        for terminal in [Rejeitada, Expirada, Efetivada] {
            assert!(terminal.e_terminal());
            for destino in [Pendente, Aprovada, Rejeitada, Expirada, Efetivada] {
                assert!(!transicao_permitida(terminal, destino));
            }
        }
    }
}
