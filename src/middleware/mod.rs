//! Middleware do sistema
//!
//! Este módulo contém o middleware de CORS e outras funcionalidades
//! transversais do HTTP.

pub mod cors;

pub use cors::*;
