// src/handlers/solicitacoes.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{resolve_id, AppJson, AppQuery},
    },
    config::AppState,
    models::solicitacao::{
        CreateSolicitacaoPayload, IdQuery, ListSolicitacoesQuery, ListaSolicitacoesResponse,
        SolicitacaoResponse, UpdateSolicitacaoPayload,
    },
};

const ID_OBRIGATORIO: &str = "ID da solicitação é obrigatório.";

// POST /api/solicitacoes
#[utoipa::path(
    post,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    request_body = CreateSolicitacaoPayload,
    responses(
        (status = 200, description = "Solicitação criada com status pendente", body = SolicitacaoResponse),
        (status = 400, description = "Campos obrigatórios ausentes (tipo, nome, iptu)")
    )
)]
pub async fn create_solicitacao(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateSolicitacaoPayload>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let solicitacao = app_state.solicitacao_service.create(payload).await?;

    Ok(Json(SolicitacaoResponse {
        success: true,
        solicitacao,
    }))
}

// GET /api/solicitacoes?status=&tipo=
#[utoipa::path(
    get,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    params(ListSolicitacoesQuery),
    responses(
        (status = 200, description = "Solicitações, das mais novas para as mais antigas", body = ListaSolicitacoesResponse),
        (status = 400, description = "Status inválido")
    )
)]
pub async fn list_solicitacoes(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<ListSolicitacoesQuery>,
) -> Result<Json<ListaSolicitacoesResponse>, AppError> {
    let dados = app_state.solicitacao_service.list(query).await?;

    Ok(Json(ListaSolicitacoesResponse {
        success: true,
        total: dados.len(),
        dados,
    }))
}

// GET /api/solicitacoes/{id}
#[utoipa::path(
    get,
    path = "/api/solicitacoes/{id}",
    tag = "Solicitações",
    params(
        ("id" = String, Path, description = "ID da solicitação")
    ),
    responses(
        (status = 200, description = "Solicitação encontrada", body = SolicitacaoResponse),
        (status = 400, description = "ID inválido"),
        (status = 404, description = "Solicitação não encontrada")
    )
)]
pub async fn get_solicitacao(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let id = resolve_id(Some(id), None, ID_OBRIGATORIO)?;
    let solicitacao = app_state.solicitacao_service.get(id).await?;

    Ok(Json(SolicitacaoResponse {
        success: true,
        solicitacao,
    }))
}

// PUT /api/solicitacoes/{id}
#[utoipa::path(
    put,
    path = "/api/solicitacoes/{id}",
    tag = "Solicitações",
    request_body = UpdateSolicitacaoPayload,
    params(
        ("id" = String, Path, description = "ID da solicitação")
    ),
    responses(
        (status = 200, description = "Solicitação atualizada", body = SolicitacaoResponse),
        (status = 400, description = "ID inválido ou transição de status inválida"),
        (status = 404, description = "Solicitação não encontrada")
    )
)]
pub async fn update_solicitacao_by_path(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateSolicitacaoPayload>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let id = resolve_id(Some(id), query.id, ID_OBRIGATORIO)?;
    let solicitacao = app_state.solicitacao_service.update(id, payload).await?;

    Ok(Json(SolicitacaoResponse {
        success: true,
        solicitacao,
    }))
}

// PUT /api/solicitacoes?id=
#[utoipa::path(
    put,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    request_body = UpdateSolicitacaoPayload,
    params(IdQuery),
    responses(
        (status = 200, description = "Solicitação atualizada", body = SolicitacaoResponse),
        (status = 400, description = "ID ausente ou inválido"),
        (status = 404, description = "Solicitação não encontrada")
    )
)]
pub async fn update_solicitacao(
    State(app_state): State<AppState>,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateSolicitacaoPayload>,
) -> Result<Json<SolicitacaoResponse>, AppError> {
    let id = resolve_id(None, query.id, ID_OBRIGATORIO)?;
    let solicitacao = app_state.solicitacao_service.update(id, payload).await?;

    Ok(Json(SolicitacaoResponse {
        success: true,
        solicitacao,
    }))
}
