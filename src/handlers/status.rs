// src/handlers/status.rs

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
    #[schema(example = "online")]
    pub status: String,
    pub system: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiIndexResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub endpoints: BTreeMap<String, String>,
}

// GET /api/status
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Status",
    responses(
        (status = 200, description = "API no ar", body = StatusResponse)
    )
)]
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        status: "online".to_string(),
        system: "Prefeitura de Botucatu - Sistema de Croqui".to_string(),
        timestamp: Utc::now(),
    })
}

// GET /api
#[utoipa::path(
    get,
    path = "/api",
    tag = "Status",
    responses(
        (status = 200, description = "Índice das rotas disponíveis", body = ApiIndexResponse)
    )
)]
pub async fn api_index(State(app_state): State<AppState>) -> Json<ApiIndexResponse> {
    let endpoints = [
        ("status", "/api/status [GET]"),
        ("login", "/api/login/servidor [POST], /api/login/admin [POST]"),
        ("servidores", "/api/servidores [GET,POST,PUT,DELETE]"),
        ("solicitacoes", "/api/solicitacoes [GET,POST,PUT]"),
        ("upload", "/api/upload [POST multipart], /api/uploads [POST base64]"),
        ("armazenamento", app_state.upload_service.backend_name()),
        ("docs", "/swagger-ui"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Json(ApiIndexResponse {
        success: true,
        status: "API online".to_string(),
        message: "Sistema de Croqui Botucatu".to_string(),
        timestamp: Utc::now(),
        endpoints,
    })
}
