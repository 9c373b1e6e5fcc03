// src/handlers/servidores.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{resolve_id, AppJson, AppQuery},
    },
    config::AppState,
    models::{
        servidor::{
            CreateServidorPayload, ListaServidoresResponse, MensagemResponse, ServidorDetalheResponse,
            ServidorResponse, UpdateServidorPayload,
        },
        solicitacao::IdQuery,
    },
};

const ID_OBRIGATORIO: &str = "ID do servidor é obrigatório.";

// GET /api/servidores
#[utoipa::path(
    get,
    path = "/api/servidores",
    tag = "Servidores",
    responses(
        (status = 200, description = "Servidores ordenados por nome, sem senha", body = ListaServidoresResponse),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_servidores(
    State(app_state): State<AppState>,
) -> Result<Json<ListaServidoresResponse>, AppError> {
    let dados = app_state.servidor_service.list().await?;

    Ok(Json(ListaServidoresResponse {
        success: true,
        total: dados.len(),
        dados,
    }))
}

// GET /api/servidores/{id}
#[utoipa::path(
    get,
    path = "/api/servidores/{id}",
    tag = "Servidores",
    params(
        ("id" = String, Path, description = "ID do servidor")
    ),
    responses(
        (status = 200, description = "Servidor encontrado", body = ServidorDetalheResponse),
        (status = 404, description = "Servidor não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_servidor(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServidorDetalheResponse>, AppError> {
    let id = resolve_id(Some(id), None, ID_OBRIGATORIO)?;
    let (dados, solicitacoes_atribuidas) = app_state.servidor_service.get_with_workload(id).await?;

    Ok(Json(ServidorDetalheResponse {
        success: true,
        dados,
        solicitacoes_atribuidas,
    }))
}

// POST /api/servidores
#[utoipa::path(
    post,
    path = "/api/servidores",
    tag = "Servidores",
    request_body = CreateServidorPayload,
    responses(
        (status = 201, description = "Servidor cadastrado", body = ServidorResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "RI já cadastrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_servidor(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateServidorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let servidor = app_state.servidor_service.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ServidorResponse {
            success: true,
            servidor,
            mensagem: "Servidor cadastrado com sucesso".to_string(),
        }),
    ))
}

async fn update(
    app_state: &AppState,
    id: Option<String>,
    query: IdQuery,
    payload: UpdateServidorPayload,
) -> Result<Json<ServidorResponse>, AppError> {
    let id = resolve_id(id, query.id, ID_OBRIGATORIO)?;
    let servidor = app_state.servidor_service.update(id, payload).await?;

    Ok(Json(ServidorResponse {
        success: true,
        servidor,
        mensagem: "Servidor atualizado com sucesso".to_string(),
    }))
}

// PUT /api/servidores/{id}
#[utoipa::path(
    put,
    path = "/api/servidores/{id}",
    tag = "Servidores",
    request_body = UpdateServidorPayload,
    params(
        ("id" = String, Path, description = "ID do servidor")
    ),
    responses(
        (status = 200, description = "Servidor atualizado", body = ServidorResponse),
        (status = 400, description = "Nenhum dado para atualizar ou dados inválidos"),
        (status = 404, description = "Servidor não encontrado"),
        (status = 409, description = "Novo RI já em uso")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_servidor_by_path(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateServidorPayload>,
) -> Result<Json<ServidorResponse>, AppError> {
    update(&app_state, Some(id), query, payload).await
}

// PUT /api/servidores?id=
#[utoipa::path(
    put,
    path = "/api/servidores",
    tag = "Servidores",
    request_body = UpdateServidorPayload,
    params(IdQuery),
    responses(
        (status = 200, description = "Servidor atualizado", body = ServidorResponse),
        (status = 400, description = "ID ausente ou dados inválidos"),
        (status = 404, description = "Servidor não encontrado"),
        (status = 409, description = "Novo RI já em uso")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_servidor(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateServidorPayload>,
) -> Result<Json<ServidorResponse>, AppError> {
    update(&app_state, None, query, payload).await
}

async fn delete(app_state: &AppState, id: Option<String>, query: IdQuery) -> Result<Json<MensagemResponse>, AppError> {
    let id = resolve_id(id, query.id, ID_OBRIGATORIO)?;
    app_state.servidor_service.delete(id).await?;

    Ok(Json(MensagemResponse {
        success: true,
        mensagem: "Servidor excluído com sucesso".to_string(),
    }))
}

// DELETE /api/servidores/{id}
#[utoipa::path(
    delete,
    path = "/api/servidores/{id}",
    tag = "Servidores",
    params(
        ("id" = String, Path, description = "ID do servidor")
    ),
    responses(
        (status = 200, description = "Servidor excluído", body = MensagemResponse),
        (status = 404, description = "Servidor não encontrado"),
        (status = 409, description = "Servidor possui solicitações atribuídas")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_servidor_by_path(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<IdQuery>,
) -> Result<Json<MensagemResponse>, AppError> {
    delete(&app_state, Some(id), query).await
}

// DELETE /api/servidores?id=
#[utoipa::path(
    delete,
    path = "/api/servidores",
    tag = "Servidores",
    params(IdQuery),
    responses(
        (status = 200, description = "Servidor excluído", body = MensagemResponse),
        (status = 400, description = "ID ausente ou inválido"),
        (status = 404, description = "Servidor não encontrado"),
        (status = 409, description = "Servidor possui solicitações atribuídas")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_servidor(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<IdQuery>,
) -> Result<Json<MensagemResponse>, AppError> {
    delete(&app_state, None, query).await
}
