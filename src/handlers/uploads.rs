// src/handlers/uploads.rs

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    models::upload::{Base64UploadPayload, UploadForm, UploadResponse},
};

// Nome do campo do formulário que carrega o PDF
const CAMPO_ARQUIVO: &str = "pdf";

// POST /api/upload (multipart, campo "pdf")
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF armazenado", body = UploadResponse),
        (status = 400, description = "Nenhum arquivo, arquivo não PDF ou acima do limite")
    )
)]
pub async fn upload_multipart(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        AppError::InvalidInput(format!("Upload inválido: {}", e.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(CAMPO_ARQUIVO) {
            continue;
        }

        let filename = field.file_name().unwrap_or("arquivo.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(invalid)?;

        let arquivo = app_state
            .upload_service
            .store_multipart(&filename, content_type.as_deref(), data.to_vec())
            .await?;

        return Ok(Json(UploadResponse {
            success: true,
            mensagem: "PDF enviado com sucesso!".to_string(),
            arquivo,
        }));
    }

    Err(AppError::InvalidInput("Nenhum arquivo enviado.".to_string()))
}

// POST /api/uploads (JSON com base64)
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "Uploads",
    request_body = Base64UploadPayload,
    responses(
        (status = 200, description = "PDF armazenado, com URL pública", body = UploadResponse),
        (status = 400, description = "Conteúdo ausente, base64 inválido ou arquivo não PDF")
    )
)]
pub async fn upload_base64(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<Base64UploadPayload>,
) -> Result<Json<UploadResponse>, AppError> {
    let arquivo = app_state.upload_service.store_base64(payload).await?;

    Ok(Json(UploadResponse {
        success: true,
        mensagem: "Arquivo enviado com sucesso".to_string(),
        arquivo,
    }))
}
