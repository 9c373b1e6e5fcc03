// src/middleware/cors.rs

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::CorsLayer;

/// CORS aberto (`*`) em todas as rotas.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Qualquer OPTIONS responde 200 sem corpo, mesmo sem os cabeçalhos de preflight.
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
