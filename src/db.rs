pub mod repository;
pub use repository::{ServidorRepository, SolicitacaoRepository};
pub mod memory;
pub use memory::MemoryStore;
pub mod solicitacao_repo;
pub use solicitacao_repo::PgSolicitacaoRepository;
pub mod servidor_repo;
pub use servidor_repo::PgServidorRepository;

use crate::common::error::AppError;

pub(crate) const RI_EM_USO: &str = "RI já está cadastrado.";
pub(crate) const NUMERO_EM_USO: &str = "Número de solicitação já existe.";

// Converte violações de constraint do Postgres em erros de domínio.
pub(crate) fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    "servidores_ri_key" => AppError::Conflict(RI_EM_USO.to_string()),
                    "solicitacoes_numero_key" => AppError::Conflict(NUMERO_EM_USO.to_string()),
                    other => AppError::Conflict(format!("Valor duplicado ({})", other)),
                };
            }
        }
        if db_err.is_foreign_key_violation() {
            return AppError::InvalidInput("Servidor responsável não encontrado.".to_string());
        }
    }
    e.into()
}
