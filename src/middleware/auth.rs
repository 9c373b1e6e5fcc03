// src/middleware/auth.rs

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::PrincipalKind,
};

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Exige um token de administrador nas rotas de gestão de servidores.
/// Com `REQUIRE_ADMIN_TOKEN=false` deixa tudo passar.
pub async fn admin_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !app_state.config.require_admin_token {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(&request).ok_or(AppError::InvalidToken)?;
    let principal = app_state.auth_service.validate_token(token)?;

    if principal.kind != PrincipalKind::Administrador {
        tracing::warn!(subject = %principal.subject, "Servidor tentou acessar rota de administrador");
        return Err(AppError::Forbidden);
    }

    // Insere o principal nos "extensions" da requisição
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
