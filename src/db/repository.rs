// src/db/repository.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        servidor::{DeleteOutcome, Servidor, ServidorPatch},
        solicitacao::{Solicitacao, SolicitacaoFilter, UpdateSolicitacaoPayload},
    },
};

/// Persistência das solicitações. Implementada em memória e em Postgres.
#[async_trait]
pub trait SolicitacaoRepository: Send + Sync {
    /// Insere o registro completo. `Conflict` se o número já existir.
    async fn insert(&self, solicitacao: &Solicitacao) -> Result<Solicitacao, AppError>;

    /// Mais recentes primeiro (`data_criacao` decrescente).
    async fn list(&self, filter: &SolicitacaoFilter) -> Result<Vec<Solicitacao>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Solicitacao>, AppError>;

    /// Mescla o payload no registro. `Ok(None)` quando o id não existe.
    async fn update(&self, id: Uuid, patch: UpdateSolicitacaoPayload) -> Result<Option<Solicitacao>, AppError>;

    async fn count_assigned_to(&self, servidor_id: Uuid) -> Result<i64, AppError>;
}

/// Persistência dos servidores.
#[async_trait]
pub trait ServidorRepository: Send + Sync {
    /// Ordenados por nome.
    async fn list(&self) -> Result<Vec<Servidor>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Servidor>, AppError>;

    async fn find_by_ri(&self, ri: &str) -> Result<Option<Servidor>, AppError>;

    /// `Conflict` se o RI já existir.
    async fn insert(&self, servidor: &Servidor) -> Result<Servidor, AppError>;

    /// `Conflict` se o novo RI pertencer a outro servidor; `Ok(None)` se o id não existir.
    async fn update(&self, id: Uuid, patch: ServidorPatch) -> Result<Option<Servidor>, AppError>;

    /// Exclui apenas se nenhuma solicitação referenciar o servidor.
    /// A verificação e a exclusão são atômicas.
    async fn delete_unassigned(&self, id: Uuid) -> Result<DeleteOutcome, AppError>;
}
