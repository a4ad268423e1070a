//! Configuração do projeto
//!
//! Este módulo contém a configuração de base de dados, variáveis de
//! ambiente e outras configurações do sistema.

pub mod database;
pub mod environment;

pub use environment::*;
