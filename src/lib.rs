// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, BlobBackend},
    docs::ApiDoc,
    middleware::{auth::admin_guard, cors},
    services::upload_service::MAX_UPLOAD_BYTES,
};

// Folga para os cabeçalhos do multipart e para o aumento de ~4/3 do base64
const MULTIPART_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;
const BASE64_BODY_LIMIT: usize = MAX_UPLOAD_BYTES * 3 / 2 + 1024 * 1024;

async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "Endpoint da API não encontrado." })),
        )
            .into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

// Caminho existe, mas o método não
async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "success": false, "error": "Método não permitido" })),
    )
        .into_response()
}

/// Monta o router completo (rotas + middlewares), usado pelo binário e pelos testes.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de servidores (protegidas pelo middleware de administrador)
    let servidor_routes = Router::new()
        .route(
            "/api/servidores",
            get(handlers::servidores::list_servidores)
                .post(handlers::servidores::create_servidor)
                .put(handlers::servidores::update_servidor)
                .delete(handlers::servidores::delete_servidor),
        )
        .route(
            "/api/servidores/{id}",
            get(handlers::servidores::get_servidor)
                .put(handlers::servidores::update_servidor_by_path)
                .delete(handlers::servidores::delete_servidor_by_path),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    let mut app = Router::new()
        .route("/api", get(handlers::status::api_index))
        .route("/api/status", get(handlers::status::get_status))
        .route("/api/login/servidor", post(handlers::auth::login_servidor))
        .route("/api/login/admin", post(handlers::auth::login_admin))
        .route(
            "/api/solicitacoes",
            post(handlers::solicitacoes::create_solicitacao)
                .get(handlers::solicitacoes::list_solicitacoes)
                .put(handlers::solicitacoes::update_solicitacao),
        )
        .route(
            "/api/solicitacoes/{id}",
            get(handlers::solicitacoes::get_solicitacao).put(handlers::solicitacoes::update_solicitacao_by_path),
        )
        .route(
            "/api/upload",
            post(handlers::uploads::upload_multipart).layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
        .route(
            "/api/uploads",
            post(handlers::uploads::upload_base64).layer(DefaultBodyLimit::max(BASE64_BODY_LIMIT)),
        )
        .merge(servidor_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Arquivos gravados em disco ficam acessíveis em /uploads/<chave>
    if app_state.config.blob_backend == BlobBackend::Local {
        app = app.nest_service("/uploads", ServeDir::new(&app_state.config.upload_dir));
    }

    app.method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(axum_middleware::from_fn(cors::preflight))
        .layer(TraceLayer::new_for_http())
        .layer(cors::cors_layer())
        .with_state(app_state)
}
