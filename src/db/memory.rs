// src/db/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        repository::{ServidorRepository, SolicitacaoRepository},
        NUMERO_EM_USO, RI_EM_USO,
    },
    models::{
        servidor::{DeleteOutcome, Servidor, ServidorPatch},
        solicitacao::{Solicitacao, SolicitacaoFilter, UpdateSolicitacaoPayload},
    },
};

#[derive(Default)]
struct MemoryData {
    solicitacoes: Vec<Solicitacao>,
    servidores: Vec<Servidor>,
}

/// Backend não persistente. As duas tabelas ficam sob o mesmo lock, então as
/// mesmas garantias do Postgres (unicidade, chave estrangeira) valem aqui.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SolicitacaoRepository for MemoryStore {
    async fn insert(&self, solicitacao: &Solicitacao) -> Result<Solicitacao, AppError> {
        let mut data = self.data.write().await;
        if data.solicitacoes.iter().any(|s| s.numero == solicitacao.numero) {
            return Err(AppError::Conflict(NUMERO_EM_USO.to_string()));
        }
        data.solicitacoes.push(solicitacao.clone());
        Ok(solicitacao.clone())
    }

    async fn list(&self, filter: &SolicitacaoFilter) -> Result<Vec<Solicitacao>, AppError> {
        let data = self.data.read().await;
        let mut filtradas: Vec<Solicitacao> = data
            .solicitacoes
            .iter()
            .rev() // empates ficam com a mais recente primeiro
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        filtradas.sort_by(|a, b| b.data_criacao.cmp(&a.data_criacao));
        Ok(filtradas)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Solicitacao>, AppError> {
        let data = self.data.read().await;
        Ok(data.solicitacoes.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: UpdateSolicitacaoPayload) -> Result<Option<Solicitacao>, AppError> {
        let mut data = self.data.write().await;
        let data = &mut *data;

        let Some(solicitacao) = data.solicitacoes.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(servidor_id) = patch.assigned_staff() {
            if !data.servidores.iter().any(|s| s.id == servidor_id) {
                return Err(AppError::InvalidInput("Servidor responsável não encontrado.".to_string()));
            }
        }
        patch.apply_to(solicitacao, Utc::now())?;
        Ok(Some(solicitacao.clone()))
    }

    async fn count_assigned_to(&self, servidor_id: Uuid) -> Result<i64, AppError> {
        let data = self.data.read().await;
        let count = data
            .solicitacoes
            .iter()
            .filter(|s| s.servidor_responsavel == Some(servidor_id))
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl ServidorRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Servidor>, AppError> {
        let data = self.data.read().await;
        let mut servidores = data.servidores.clone();
        servidores.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(servidores)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Servidor>, AppError> {
        let data = self.data.read().await;
        Ok(data.servidores.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_ri(&self, ri: &str) -> Result<Option<Servidor>, AppError> {
        let data = self.data.read().await;
        Ok(data.servidores.iter().find(|s| s.ri == ri).cloned())
    }

    async fn insert(&self, servidor: &Servidor) -> Result<Servidor, AppError> {
        let mut data = self.data.write().await;
        if data.servidores.iter().any(|s| s.ri == servidor.ri) {
            return Err(AppError::Conflict(RI_EM_USO.to_string()));
        }
        data.servidores.push(servidor.clone());
        Ok(servidor.clone())
    }

    async fn update(&self, id: Uuid, patch: ServidorPatch) -> Result<Option<Servidor>, AppError> {
        let mut data = self.data.write().await;

        if let Some(ri) = patch.ri.as_deref() {
            if data.servidores.iter().any(|s| s.ri == ri && s.id != id) {
                return Err(AppError::Conflict(
                    "Novo RI já está em uso por outro servidor.".to_string(),
                ));
            }
        }

        let Some(servidor) = data.servidores.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        patch.apply_to(servidor, Utc::now());
        Ok(Some(servidor.clone()))
    }

    async fn delete_unassigned(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut data = self.data.write().await;

        let Some(index) = data.servidores.iter().position(|s| s.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if data.solicitacoes.iter().any(|s| s.servidor_responsavel == Some(id)) {
            return Ok(DeleteOutcome::HasAssignments);
        }
        data.servidores.remove(index);
        Ok(DeleteOutcome::Deleted)
    }
}
