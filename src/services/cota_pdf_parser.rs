//! Parser do documento de correção de cotas
//!
//! Os documentos chegam como texto extraído de PDF (camada de texto ou OCR),
//! com espaçamento inconsistente e cabeçalhos repetidos por página. O parser
//! é heurístico por natureza: linhas malformadas são puladas, nunca abortam
//! o lote. Falhas de documento inteiro (vazio, sem cabeçalho, sem linha
//! válida) são erros tipados e abortam a importação.
//!
//! Função pura: texto → linhas estruturadas, sem nenhum I/O.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::errors::AppError;

/// Quantas linhas não-vazias do topo do documento são examinadas
/// em busca do nome da prefeitura
const LINHAS_BUSCA_PREFEITURA: usize = 30;

/// Falhas de documento inteiro; abortam a importação com contexto
#[derive(Error, Debug, PartialEq)]
pub enum ErroDocumento {
    #[error("documento vazio")]
    DocumentoVazio,

    #[error("nome da prefeitura não encontrado nas primeiras linhas do documento")]
    PrefeituraNaoEncontrada,

    #[error("prefeitura '{0}' não cadastrada")]
    PrefeituraNaoCadastrada(String),

    #[error("cabeçalho da tabela de cotas (órgão/placa/cota) não encontrado")]
    CabecalhoNaoEncontrado,

    #[error("nenhuma linha de cota válida encontrada ({linhas_analisadas} linhas analisadas)")]
    NenhumaLinhaValida { linhas_analisadas: usize },
}

impl From<ErroDocumento> for AppError {
    fn from(e: ErroDocumento) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// Linha de cota extraída do documento
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaCota {
    /// Número da linha no documento original (1-based), para diagnóstico
    pub numero_linha: usize,
    pub orgao: String,
    pub placa: String,
    pub cota_total: Decimal,
    pub cota_utilizada: Decimal,
}

/// Documento estruturado após o parse
#[derive(Debug)]
pub struct DocumentoCotas {
    pub prefeitura: String,
    pub linhas: Vec<LinhaCota>,
}

pub struct CotaPdfParser {
    separador_campos: Regex,
    rodape_pagina: Regex,
    caractere_nao_numerico: Regex,
}

impl CotaPdfParser {
    pub fn new() -> Self {
        // Campos são separados por corridas de 2+ espaços ou tabs
        let separador_campos = Regex::new(r"\s{2,}|\t+").unwrap();
        // Rodapé de paginação: "3 de 12", "Página 3 de 12"
        let rodape_pagina = Regex::new(r"(?i)^\s*(página\s+|pagina\s+)?\d+\s+de\s+\d+\s*$").unwrap();
        let caractere_nao_numerico = Regex::new(r"[^0-9.,]").unwrap();

        Self {
            separador_campos,
            rodape_pagina,
            caractere_nao_numerico,
        }
    }

    /// Analisa o texto bruto extraído do PDF
    pub fn analisar(&self, texto: &str) -> Result<DocumentoCotas, ErroDocumento> {
        if texto.trim().is_empty() {
            return Err(ErroDocumento::DocumentoVazio);
        }

        let linhas: Vec<&str> = texto.lines().collect();

        let prefeitura = self.extrair_prefeitura(&linhas)?;
        let indice_cabecalho = self.localizar_cabecalho(&linhas)?;

        let mut linhas_validas = Vec::new();
        let mut linhas_analisadas = 0usize;

        for (offset, linha) in linhas[indice_cabecalho + 1..].iter().enumerate() {
            let numero_linha = indice_cabecalho + 1 + offset + 1;
            let conteudo = linha.trim();
            if conteudo.is_empty() {
                continue;
            }
            linhas_analisadas += 1;

            if self.e_linha_estrutural(conteudo) {
                continue;
            }

            if let Some(linha_cota) = self.extrair_linha(conteudo, numero_linha) {
                linhas_validas.push(linha_cota);
            }
        }

        if linhas_validas.is_empty() {
            return Err(ErroDocumento::NenhumaLinhaValida { linhas_analisadas });
        }

        log::debug!(
            "📄 Documento analisado: {} linhas válidas de {} analisadas",
            linhas_validas.len(),
            linhas_analisadas
        );

        Ok(DocumentoCotas {
            prefeitura,
            linhas: linhas_validas,
        })
    }

    /// Nome da prefeitura nas primeiras linhas do documento.
    ///
    /// Procura o token "prefeitura"; o nome vem na mesma linha após o token
    /// ou, na ausência, na próxima linha não-vazia. Candidatos que são só
    /// boilerplate ("municipal", "de") ou curtos demais são descartados.
    fn extrair_prefeitura(&self, linhas: &[&str]) -> Result<String, ErroDocumento> {
        let nao_vazias: Vec<(usize, &str)> = linhas
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| (i, l.trim()))
            .take(LINHAS_BUSCA_PREFEITURA)
            .collect();

        for (posicao, (_, linha)) in nao_vazias.iter().enumerate() {
            let minuscula = linha.to_lowercase();
            let Some(indice_token) = minuscula.find("prefeitura") else {
                continue;
            };

            // Nome na mesma linha, após o token; slice com verificação porque
            // o índice vem da cópia em minúsculas
            let apos_token = linha
                .get(indice_token + "prefeitura".len()..)
                .unwrap_or("")
                .trim();
            let candidato = limpar_candidato(apos_token);
            if candidato_aceitavel(&candidato) {
                return Ok(candidato);
            }

            // Nome na próxima linha não-vazia
            if let Some((_, proxima)) = nao_vazias.get(posicao + 1) {
                let candidato = limpar_candidato(proxima);
                if candidato_aceitavel(&candidato) {
                    return Ok(candidato);
                }
            }
        }

        Err(ErroDocumento::PrefeituraNaoEncontrada)
    }

    /// Linha de cabeçalho da tabela: precisa mencionar órgão, placa e
    /// alguma coluna de cota. A primeira linha de dados é a seguinte.
    fn localizar_cabecalho(&self, linhas: &[&str]) -> Result<usize, ErroDocumento> {
        for (indice, linha) in linhas.iter().enumerate() {
            if self.e_cabecalho(linha) {
                return Ok(indice);
            }
        }
        Err(ErroDocumento::CabecalhoNaoEncontrado)
    }

    fn e_cabecalho(&self, linha: &str) -> bool {
        let minuscula = linha.to_lowercase();
        let tem_orgao = minuscula.contains("órgão") || minuscula.contains("orgao");
        let tem_placa = minuscula.contains("placa");
        let tem_cota = minuscula.contains("cota")
            || minuscula.contains("total")
            || minuscula.contains("utilizada");
        tem_orgao && tem_placa && tem_cota
    }

    /// Linhas que fazem parte da estrutura do documento, não dos dados:
    /// cabeçalhos repetidos por página, separadores, rodapés e totalizações
    fn e_linha_estrutural(&self, linha: &str) -> bool {
        if self.e_cabecalho(linha) {
            return true;
        }
        if linha.chars().all(|c| "-=_.* ".contains(c)) {
            return true;
        }
        if self.rodape_pagina.is_match(linha) {
            return true;
        }
        linha.to_lowercase().contains("total geral")
    }

    /// Uma linha de dados: [órgão...] [placa] [cota total] [cota utilizada].
    /// Retorna None para linhas malformadas (puladas, nunca fatais).
    fn extrair_linha(&self, linha: &str, numero_linha: usize) -> Option<LinhaCota> {
        let campos: Vec<&str> = self
            .separador_campos
            .split(linha)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        if campos.len() < 4 {
            return None;
        }

        let total = campos.len();
        let cota_total = self.parsear_quantidade(campos[total - 2])?;
        let cota_utilizada = self.parsear_quantidade(campos[total - 1])?;

        let placa = campos[total - 3].to_uppercase();
        if placa.chars().count() < 3 {
            return None;
        }

        let orgao = campos[..total - 3].join(" ").trim().to_string();
        if orgao.is_empty() {
            return None;
        }

        Some(LinhaCota {
            numero_linha,
            orgao,
            placa,
            cota_total,
            cota_utilizada,
        })
    }

    /// Número não-negativo após limpeza: remove tudo que não é dígito,
    /// ponto ou vírgula e normaliza vírgula decimal para ponto
    fn parsear_quantidade(&self, campo: &str) -> Option<Decimal> {
        let limpo = self
            .caractere_nao_numerico
            .replace_all(campo, "")
            .replace(',', ".");
        if limpo.is_empty() {
            return None;
        }

        Decimal::from_str(&limpo).ok().filter(|d| !d.is_sign_negative())
    }
}

fn limpar_candidato(texto: &str) -> String {
    texto
        .trim()
        .trim_end_matches(['.', ',', ';', ':', '-'])
        .trim()
        .to_string()
}

fn candidato_aceitavel(candidato: &str) -> bool {
    if candidato.chars().count() <= 3 {
        return false;
    }
    let minuscula = candidato.to_lowercase();
    !matches!(minuscula.as_str(), "municipal" | "de" | "do" | "da")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CotaPdfParser {
        CotaPdfParser::new()
    }

    const DOCUMENTO_COMPLETO: &str = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ
Relatório de Cotas de Combustível

Órgão                           Placa      Cota Total    Cota Utilizada
Secretaria de Saúde             ABC1234    100,00        30,00
Secretaria de Educação          DEF5678    250,50        100,25
--------------------------------------------------------------------
1 de 2
Secretaria de Obras Públicas    GHI9J12    80            0
Total Geral                                430,50        130,25
";

    #[test]
    fn test_documento_completo() {
        let doc = parser().analisar(DOCUMENTO_COMPLETO).unwrap();

        assert_eq!(doc.prefeitura, "MUNICIPAL DE PORTO FELIZ");
        assert_eq!(doc.linhas.len(), 3);

        let saude = &doc.linhas[0];
        assert_eq!(saude.orgao, "Secretaria de Saúde");
        assert_eq!(saude.placa, "ABC1234");
        assert_eq!(saude.cota_total, Decimal::new(10000, 2));
        assert_eq!(saude.cota_utilizada, Decimal::new(3000, 2));

        // Separador, rodapé de página e total geral não viram linhas
        assert_eq!(doc.linhas[2].orgao, "Secretaria de Obras Públicas");
    }

    #[test]
    fn test_documento_vazio() {
        assert_eq!(
            parser().analisar("   \n  \n").unwrap_err(),
            ErroDocumento::DocumentoVazio
        );
    }

    #[test]
    fn test_prefeitura_na_linha_seguinte() {
        let texto = "\
PREFEITURA
Porto Feliz

Órgão              Placa     Cota    Utilizada
Secretaria Saúde   ABC1234   100     30
";
        let doc = parser().analisar(texto).unwrap();
        assert_eq!(doc.prefeitura, "Porto Feliz");
    }

    #[test]
    fn test_prefeitura_nao_encontrada() {
        let texto = "\
Relatório sem identificação

Órgão     Placa     Cota    Utilizada
Saúde     ABC1234   100     30
";
        assert_eq!(
            parser().analisar(texto).unwrap_err(),
            ErroDocumento::PrefeituraNaoEncontrada
        );
    }

    #[test]
    fn test_cabecalho_nao_encontrado() {
        let texto = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ

Listagem de veículos sem tabela de cotas
ABC1234   100   30
";
        assert_eq!(
            parser().analisar(texto).unwrap_err(),
            ErroDocumento::CabecalhoNaoEncontrado
        );
    }

    #[test]
    fn test_cabecalho_sem_linhas_validas() {
        let texto = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ

Órgão     Placa     Cota Total    Cota Utilizada
???
linha totalmente malformada
";
        match parser().analisar(texto).unwrap_err() {
            ErroDocumento::NenhumaLinhaValida { linhas_analisadas } => {
                assert_eq!(linhas_analisadas, 2);
            }
            outro => panic!("erro inesperado: {:?}", outro),
        }
    }

    #[test]
    fn test_linha_com_numero_invalido_e_pulada() {
        let texto = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ

Órgão              Placa     Cota      Utilizada
Secretaria Saúde   ABC1234   cem       30
Secretaria Obras   DEF5678   200,00    50,00
";
        let doc = parser().analisar(texto).unwrap();
        assert_eq!(doc.linhas.len(), 1);
        assert_eq!(doc.linhas[0].placa, "DEF5678");
    }

    #[test]
    fn test_placa_curta_e_pulada() {
        let texto = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ

Órgão              Placa     Cota      Utilizada
Secretaria Saúde   AB        100,00    30,00
Secretaria Obras   DEF5678   200,00    50,00
";
        let doc = parser().analisar(texto).unwrap();
        assert_eq!(doc.linhas.len(), 1);
        assert_eq!(doc.linhas[0].placa, "DEF5678");
    }

    #[test]
    fn test_quantidade_com_simbolos() {
        let p = parser();
        assert_eq!(p.parsear_quantidade("R$ 1234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(p.parsear_quantidade("100 L"), Some(Decimal::new(100, 0)));
        assert_eq!(p.parsear_quantidade("---"), None);
        assert_eq!(p.parsear_quantidade("abc"), None);
    }

    #[test]
    fn test_campos_separados_por_tab() {
        let texto = "\
PREFEITURA MUNICIPAL DE PORTO FELIZ

Órgão\tPlaca\tCota Total\tCota Utilizada
Secretaria de Saúde\tABC1234\t100\t30
";
        let doc = parser().analisar(texto).unwrap();
        assert_eq!(doc.linhas.len(), 1);
        assert_eq!(doc.linhas[0].orgao, "Secretaria de Saúde");
        assert_eq!(doc.linhas[0].cota_total, Decimal::new(100, 0));
    }

    #[test]
    fn test_numero_linha_para_diagnostico() {
        let doc = parser().analisar(DOCUMENTO_COMPLETO).unwrap();
        // Primeira linha de dados é a quinta linha do documento
        assert_eq!(doc.linhas[0].numero_linha, 5);
    }
}
