//! Configuração de variáveis de ambiente
//!
//! Este módulo gerencia a configuração do ambiente e variáveis de
//! configuração.

use std::env;

/// Configuração do ambiente
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Intervalo da varredura de expiração de solicitações, em minutos
    pub expiracao_intervalo_minutos: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            expiracao_intervalo_minutos: env::var("EXPIRACAO_INTERVALO_MINUTOS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("EXPIRACAO_INTERVALO_MINUTOS must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar se estamos em modo desenvolvimento
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar se estamos em modo produção
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
