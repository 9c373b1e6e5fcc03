// src/common/extract.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::common::error::AppError;

/// `Json<T>` que devolve erros de desserialização como `AppError::InvalidInput`,
/// para o cliente sempre receber `{ success: false, error }`.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidInput(format!("JSON inválido: {}", e.body_text())))?;
        Ok(AppJson(value))
    }
}

/// `Query<T>` com a mesma conversão de erros do `AppJson`.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::InvalidInput(format!("Parâmetros inválidos: {}", e.body_text())))?;
        Ok(AppQuery(value))
    }
}

// O id pode vir no path (/recurso/{id}) ou na query (?id=); o path tem prioridade.
pub fn resolve_id(
    from_path: Option<String>,
    from_query: Option<String>,
    missing_message: &str,
) -> Result<Uuid, AppError> {
    let raw = from_path
        .filter(|s| !s.trim().is_empty())
        .or(from_query.filter(|s| !s.trim().is_empty()))
        .ok_or_else(|| AppError::InvalidInput(missing_message.to_string()))?;

    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidInput(format!("ID inválido: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_id_wins_over_query_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let id = resolve_id(Some(a.to_string()), Some(b.to_string()), "faltou").unwrap();
        assert_eq!(id, a);
    }

    #[test]
    fn query_id_is_accepted() {
        let b = Uuid::new_v4();
        let id = resolve_id(None, Some(b.to_string()), "faltou").unwrap();
        assert_eq!(id, b);
    }

    #[test]
    fn missing_id_is_invalid_input() {
        let err = resolve_id(None, Some("  ".into()), "ID obrigatório").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "ID obrigatório"));
    }

    #[test]
    fn malformed_id_is_invalid_input() {
        let err = resolve_id(Some("123".into()), None, "faltou").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
