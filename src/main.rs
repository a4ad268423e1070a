mod config;
mod state;
mod database;
mod services;
mod utils;
mod models;
mod middleware;
mod controllers;
mod repositories;
mod routes;
mod dto;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Carregar variáveis de ambiente
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("⛽ Gestão de Abastecimento da Frota Municipal");
    info!("=============================================");

    // Inicializar base de dados
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Erro conectando à base de dados: {}", e);
            return Err(anyhow::anyhow!("Erro de base de dados: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let env_config = EnvironmentConfig::default();

    // Scheduler de expiração: iniciado no boot, encerrado no shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let intervalo = Duration::from_secs(env_config.expiracao_intervalo_minutos * 60);
    let scheduler_handle = tokio::spawn(services::expiracao_service::executar_loop(
        pool.clone(),
        intervalo,
        shutdown_rx,
    ));

    // Criar router da API
    let app_state = AppState::new(pool, env_config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/solicitacao", routes::solicitacao_routes::create_solicitacao_router())
        .nest("/api/cota", routes::cota_routes::create_cota_router())
        .layer(cors_middleware())
        .with_state(app_state);

    // Porta do servidor
    let addr: SocketAddr = format!("{}:{}", env_config.host, env_config.port).parse()?;

    info!("🌐 Servidor iniciando em http://{}", addr);
    info!("🔍 Endpoints disponíveis:");
    info!("   GET  /health - Health check");
    info!("📋 Endpoints - Solicitação de Abastecimento:");
    info!("   POST   /api/solicitacao - Criar solicitação");
    info!("   GET    /api/solicitacao - Listar solicitações (com filtros)");
    info!("   GET    /api/solicitacao/:id - Obter solicitação");
    info!("   PUT    /api/solicitacao/:id - Atualizar campos");
    info!("   PATCH  /api/solicitacao/:id/status - Aprovar/rejeitar");
    info!("   POST   /api/solicitacao/:id/efetivar - Efetivar em abastecimento");
    info!("   DELETE /api/solicitacao/:id - Desativar solicitação");
    info!("⛽ Endpoints - Cotas:");
    info!("   POST /api/cota/importar - Importação em massa do documento de cotas");
    info!("   GET  /api/cota/veiculo/:veiculo_id/vigente - Cota vigente do veículo");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Erro do servidor: {}", e);
    }

    // Encerrar o scheduler junto com o servidor
    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_handle.await {
        error!("❌ Scheduler terminou com erro: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simples
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "frota-abastecimento",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Sinal de desligamento graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Sinal Ctrl+C recebido, desligando servidor...");
        },
        _ = terminate => {
            info!("🛑 Sinal de término recebido, desligando servidor...");
        },
    }
}
