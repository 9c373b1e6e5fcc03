// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    models::auth::{LoginAdminPayload, LoginResponse, LoginServidorPayload},
};

// POST /api/login/servidor
#[utoipa::path(
    post,
    path = "/api/login/servidor",
    tag = "Auth",
    request_body = LoginServidorPayload,
    responses(
        (status = 200, description = "Login realizado", body = LoginResponse),
        (status = 400, description = "RI ou senha ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login_servidor(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginServidorPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let ri = payload.ri.unwrap_or_default();
    let senha = payload.senha.unwrap_or_default();

    let (usuario, token) = app_state.auth_service.login_servidor(ri.trim(), &senha).await?;

    Ok(Json(LoginResponse {
        success: true,
        usuario,
        token,
        message: "Login realizado com sucesso".to_string(),
    }))
}

// POST /api/login/admin
#[utoipa::path(
    post,
    path = "/api/login/admin",
    tag = "Auth",
    request_body = LoginAdminPayload,
    responses(
        (status = 200, description = "Login realizado", body = LoginResponse),
        (status = 400, description = "Usuário ou senha ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login_admin(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginAdminPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let usuario = payload.usuario.unwrap_or_default();
    let senha = payload.senha.unwrap_or_default();

    let (usuario, token) = app_state.auth_service.login_admin(usuario.trim(), &senha).await?;

    Ok(Json(LoginResponse {
        success: true,
        usuario,
        token,
        message: "Login realizado com sucesso".to_string(),
    }))
}
