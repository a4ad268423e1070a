//! Varredura de solicitações expiradas
//!
//! Job recorrente que transiciona solicitações pendentes vencidas para
//! expirada e devolve a reserva provisória de cota. A lógica de cada
//! execução é uma função plana, testável sem o timer; o loop é iniciado no
//! boot e encerrado pelo canal de shutdown.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::models::solicitacao::{ModoAbastecimento, SolicitacaoAbastecimento};
use crate::repositories::cota_orgao_repository::CotaOrgaoRepository;
use crate::repositories::solicitacao_repository::SolicitacaoRepository;
use crate::utils::errors::AppError;

/// Resultado de uma execução da varredura
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ResultadoVarredura {
    pub processadas: usize,
    pub liberadas: usize,
}

/// Uma execução da varredura: expira pendentes vencidas e devolve reservas.
///
/// Falha em uma solicitação não interrompe as demais; a guarda
/// `status = 'pendente'` no update condicional torna execuções repetidas
/// sobre os mesmos dados um no-op.
pub async fn varrer_expiradas(pool: &PgPool) -> Result<ResultadoVarredura, AppError> {
    let solicitacoes = SolicitacaoRepository::new(pool.clone());
    let cotas_orgao = CotaOrgaoRepository::new(pool.clone());

    let vencidas = solicitacoes.listar_pendentes_vencidas(Utc::now()).await?;

    let mut processadas = 0usize;
    let mut liberadas = 0usize;

    for solicitacao in &vencidas {
        match expirar_uma(&solicitacoes, &cotas_orgao, solicitacao).await {
            Ok(Some(liberou_reserva)) => {
                processadas += 1;
                if liberou_reserva {
                    liberadas += 1;
                }
            }
            // Outra execução chegou primeiro; nada a fazer
            Ok(None) => {}
            Err(e) => {
                // Expirada sem reserva devolvida é vazamento silencioso de
                // cota; precisa aparecer alto no log para ser investigado
                error!(
                    "❌ Falha ao expirar solicitação {} (reserva pode ter ficado retida): {}",
                    solicitacao.id, e
                );
            }
        }
    }

    if processadas > 0 {
        info!(
            "⏱️ Varredura de expiração: {} processadas, {} reservas liberadas",
            processadas, liberadas
        );
    }

    Ok(ResultadoVarredura {
        processadas,
        liberadas,
    })
}

/// Expira uma solicitação. Retorna None quando a guarda de status não
/// afetou nenhuma linha (já processada), Some(liberou_reserva) no sucesso.
async fn expirar_uma(
    solicitacoes: &SolicitacaoRepository,
    cotas_orgao: &CotaOrgaoRepository,
    solicitacao: &SolicitacaoAbastecimento,
) -> Result<Option<bool>, AppError> {
    let afetadas = solicitacoes.expirar_condicional(solicitacao.id).await?;
    if afetadas == 0 {
        return Ok(None);
    }

    if solicitacao.modo_parseado() == Some(ModoAbastecimento::Cota) {
        if let Some(cota_orgao_id) = solicitacao.cota_orgao_id {
            cotas_orgao
                .liberar_reserva(cota_orgao_id, solicitacao.quantidade)
                .await?;
            return Ok(Some(true));
        }
    }

    Ok(Some(false))
}

/// Loop do scheduler: dispara a varredura no intervalo configurado até o
/// sinal de shutdown. A execução é aguardada dentro do próprio loop, então
/// uma varredura lenta nunca é sobreposta pela seguinte.
pub async fn executar_loop(
    pool: PgPool,
    intervalo: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(intervalo);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "⏱️ Scheduler de expiração iniciado (intervalo: {}s)",
        intervalo.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = varrer_expiradas(&pool).await {
                    warn!("⚠️ Varredura de expiração falhou, nova tentativa no próximo ciclo: {}", e);
                }
            }
            _ = shutdown.changed() => {
                info!("🛑 Scheduler de expiração encerrado");
                break;
            }
        }
    }
}
