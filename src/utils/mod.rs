//! Utilidades do sistema
//!
//! Este módulo contém utilidades para tratamento de erros, validação
//! e outras funcionalidades comuns.

pub mod errors;
pub mod validation;
