// src/services/solicitacao_service.rs

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::SolicitacaoRepository,
    models::solicitacao::{
        CreateSolicitacaoPayload, ListSolicitacoesQuery, Solicitacao, SolicitacaoFilter,
        UpdateSolicitacaoPayload,
    },
};

const MAX_TENTATIVAS_NUMERO: usize = 5;

/// `SOL-` + os seis últimos dígitos do timestamp em milissegundos.
pub fn numero_from_millis(millis: i64) -> String {
    format!("SOL-{:06}", millis.rem_euclid(1_000_000))
}

// Sufixo aleatório usado depois de uma colisão
fn numero_aleatorio() -> String {
    let suffix = (Uuid::new_v4().as_u128() % 1_000_000) as i64;
    numero_from_millis(suffix)
}

#[derive(Clone)]
pub struct SolicitacaoService {
    repo: Arc<dyn SolicitacaoRepository>,
}

impl SolicitacaoService {
    pub fn new(repo: Arc<dyn SolicitacaoRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: CreateSolicitacaoPayload) -> Result<Solicitacao, AppError> {
        payload.validate()?;
        let dados = payload.into_nova()?;

        let now = Utc::now();
        let mut numero = numero_from_millis(now.timestamp_millis());

        // O número não é garantidamente único; o store recusa duplicados e tentamos outro.
        for tentativa in 1..=MAX_TENTATIVAS_NUMERO {
            let solicitacao = Solicitacao::new(dados.clone(), numero.clone(), now);
            match self.repo.insert(&solicitacao).await {
                Ok(created) => {
                    tracing::info!(numero = %created.numero, id = %created.id, "Solicitação criada");
                    return Ok(created);
                }
                Err(AppError::Conflict(_)) if tentativa < MAX_TENTATIVAS_NUMERO => {
                    tracing::warn!(%numero, tentativa, "Número de solicitação em uso, gerando outro");
                    numero = numero_aleatorio();
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(
            "Não foi possível gerar um número de solicitação único.".to_string(),
        ))
    }

    pub async fn list(&self, query: ListSolicitacoesQuery) -> Result<Vec<Solicitacao>, AppError> {
        let filter = SolicitacaoFilter::try_from(query)?;
        self.repo.list(&filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Solicitacao, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Solicitação".to_string()))
    }

    pub async fn update(&self, id: Uuid, patch: UpdateSolicitacaoPayload) -> Result<Solicitacao, AppError> {
        patch.validate()?;

        // O store procura a solicitação antes de conferir o servidor atribuído:
        // id desconhecido é sempre 404, mesmo com servidor inexistente.
        let updated = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Solicitação".to_string()))?;

        tracing::info!(id = %updated.id, status = updated.status.as_str(), "Solicitação atualizada");
        Ok(updated)
    }
}
