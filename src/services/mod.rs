//! Services module
//!
//! Este módulo contém a lógica de negócio da aplicação: janelas de cota,
//! importação de documentos, ciclo de vida das solicitações e a varredura
//! de expiração.

pub mod cota_periodo_service;
pub mod cota_pdf_parser;
pub mod cota_import_service;
pub mod solicitacao_service;
pub mod expiracao_service;
