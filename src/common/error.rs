use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::storage::StorageError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entrada malformada que não passa pelo `validator` (JSON inválido, id inválido...)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("{0} não encontrado(a)")]
    ResourceNotFound(String),

    // Unicidade ou guarda referencial violada
    #[error("{0}")]
    Conflict(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] StorageError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Junta as mensagens do `validator` por campo, em ordem estável.
fn validation_details(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut details = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    details
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match &self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let details = validation_details(errors);
                let mut messages: Vec<&str> = Vec::new();
                for message in details.values().flatten() {
                    if !messages.contains(&message.as_str()) {
                        messages.push(message);
                    }
                }
                let summary = messages.join("; ");
                let body = Json(json!({
                    "success": false,
                    "error": summary,
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidInput(message) | AppError::Conflict(message) => message.clone(),
            AppError::InvalidCredentials => "Credenciais inválidas.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::Forbidden => "Acesso restrito a administradores.".to_string(),
            AppError::ResourceNotFound(resource) => format!("{} não encontrado(a).", resource),

            // Todos os outros erros viram 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Erro interno do servidor.".to_string()
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
