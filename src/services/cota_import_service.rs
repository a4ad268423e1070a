//! Serviço de importação em massa de cotas
//!
//! Recebe o texto extraído do documento, resolve cada linha para
//! (município → órgão → veículo) e aplica o upsert de cota linha a linha.
//! Falha de linha nunca aborta as demais: o lote degrada para sucesso
//! parcial, com as placas não atualizadas relatadas no resumo.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::cota_dto::{PlacaAtualizada, ResumoImportacao};
use crate::services::cota_pdf_parser::{CotaPdfParser, ErroDocumento, LinhaCota};
use crate::services::cota_periodo_service::CotaPeriodoService;
use crate::repositories::frota_repository::FrotaRepository;
use crate::utils::errors::AppError;

/// Falha sinalizada pelo colaborador de extração de texto
#[derive(Error, Debug)]
#[error("falha na extração de texto do PDF: {0}")]
pub struct ErroExtracao(pub String);

/// Contrato do colaborador externo "PDF → texto". O core não conhece a
/// biblioteca de extração; só precisa do texto completo ou de uma falha
/// claramente distinguível.
#[async_trait]
pub trait ExtratorDeTexto: Send + Sync {
    async fn extrair(&self, bytes: &[u8]) -> Result<String, ErroExtracao>;
}

pub struct CotaImportService {
    frota: FrotaRepository,
    cotas: CotaPeriodoService,
    parser: CotaPdfParser,
}

impl CotaImportService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            frota: FrotaRepository::new(pool.clone()),
            cotas: CotaPeriodoService::from_pool(pool),
            parser: CotaPdfParser::new(),
        }
    }

    /// Importa a partir dos bytes do PDF, delegando a extração de texto
    /// ao colaborador externo
    pub async fn importar_pdf(
        &self,
        extrator: &dyn ExtratorDeTexto,
        bytes: &[u8],
    ) -> Result<ResumoImportacao, AppError> {
        let texto = extrator
            .extrair(bytes)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.importar_texto(&texto).await
    }

    /// Importa a partir do texto já extraído.
    ///
    /// Falhas de documento inteiro abortam com erro tipado; falhas de linha
    /// são coletadas em `placas_nao_atualizadas` e nunca escalam.
    pub async fn importar_texto(&self, texto: &str) -> Result<ResumoImportacao, AppError> {
        let documento = self.parser.analisar(texto)?;

        let municipio = self
            .frota
            .buscar_municipio_por_nome(&documento.prefeitura)
            .await?
            .ok_or_else(|| {
                AppError::from(ErroDocumento::PrefeituraNaoCadastrada(
                    documento.prefeitura.clone(),
                ))
            })?;

        info!(
            "📄 Importando {} linhas de cota para o município '{}'",
            documento.linhas.len(),
            municipio.nome
        );

        let mut placas_atualizadas = Vec::new();
        let mut placas_nao_atualizadas = Vec::new();

        for linha in &documento.linhas {
            match self.aplicar_linha(municipio.id, linha).await {
                Ok(atualizada) => {
                    info!(
                        "✅ Cota atualizada: placa {} disponível {}",
                        atualizada.placa, atualizada.quantidade_disponivel
                    );
                    placas_atualizadas.push(atualizada);
                }
                Err(motivo) => {
                    warn!(
                        "⚠️ Linha {} não aplicada ({}): {}",
                        linha.numero_linha,
                        rotulo_linha(linha),
                        motivo
                    );
                    placas_nao_atualizadas.push(rotulo_linha(linha));
                }
            }
        }

        let resumo = ResumoImportacao {
            total_processadas: documento.linhas.len(),
            total_atualizadas: placas_atualizadas.len(),
            total_nao_atualizadas: placas_nao_atualizadas.len(),
            placas_atualizadas,
            placas_nao_atualizadas,
        };

        info!(
            "📊 Importação concluída: {} processadas, {} atualizadas, {} não atualizadas",
            resumo.total_processadas, resumo.total_atualizadas, resumo.total_nao_atualizadas
        );

        Ok(resumo)
    }

    /// Resolve e aplica uma única linha. Qualquer falha (resolução, falta de
    /// periodicidade, banco) vira motivo textual para o resumo.
    async fn aplicar_linha(
        &self,
        municipio_id: Uuid,
        linha: &LinhaCota,
    ) -> Result<PlacaAtualizada, String> {
        let orgao = self
            .frota
            .buscar_orgao_por_nome(municipio_id, &linha.orgao)
            .await
            .map_err(|e| format!("erro ao buscar órgão: {}", e))?
            .ok_or_else(|| format!("órgão '{}' não cadastrado no município", linha.orgao))?;

        let veiculo = self
            .frota
            .buscar_veiculo_por_placa(orgao.id, &linha.placa)
            .await
            .map_err(|e| format!("erro ao buscar veículo: {}", e))?
            .ok_or_else(|| format!("placa '{}' não cadastrada no órgão '{}'", linha.placa, orgao.nome))?;

        let periodicidade = veiculo
            .periodicidade_parseada()
            .ok_or_else(|| "veículo sem periodicidade de cota configurada".to_string())?;

        let cota = self
            .cotas
            .upsert(veiculo.id, periodicidade, linha.cota_total, linha.cota_utilizada)
            .await
            .map_err(|e| format!("erro ao gravar cota: {}", e))?;

        Ok(PlacaAtualizada {
            placa: veiculo.placa,
            veiculo_id: veiculo.id,
            cota_periodo_id: cota.id,
            quantidade_permitida: cota.quantidade_permitida,
            quantidade_utilizada: cota.quantidade_utilizada,
            quantidade_disponivel: cota.quantidade_disponivel,
        })
    }
}

/// Rótulo da linha no resumo: a placa quando existe, senão a posição
fn rotulo_linha(linha: &LinhaCota) -> String {
    if linha.placa.is_empty() {
        format!("Linha {}", linha.numero_linha)
    } else {
        linha.placa.clone()
    }
}
