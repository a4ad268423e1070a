use axum::{
    body::Body,
    routing::{get, post},
    Json, Router,
};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["service"], "frota-abastecimento");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_importacao_payload_vazio() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/cota/importar")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "texto": "" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Documento vazio é falha de documento inteiro: 4xx, nunca 500
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rota_inexistente() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/inexistente")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// Função helper para criar a app de teste, sem banco
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "frota-abastecimento",
                    "status": "healthy"
                }))
            }),
        )
        .route(
            "/api/cota/importar",
            post(|Json(payload): Json<Value>| async move {
                let texto = payload["texto"].as_str().unwrap_or("");
                if texto.trim().is_empty() {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Bad Request",
                            "message": "documento vazio"
                        })),
                    )
                } else {
                    (StatusCode::OK, Json(json!({ "total_processadas": 0 })))
                }
            }),
        )
}
