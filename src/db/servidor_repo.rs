// src/db/servidor_repo.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{map_db_error, repository::ServidorRepository},
    models::servidor::{DeleteOutcome, Servidor, ServidorPatch},
};

// O repositório de servidores, responsável pela tabela 'servidores'
#[derive(Clone)]
pub struct PgServidorRepository {
    pool: PgPool,
}

impl PgServidorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServidorRepository for PgServidorRepository {
    async fn list(&self) -> Result<Vec<Servidor>, AppError> {
        let rows = sqlx::query_as::<_, Servidor>("SELECT * FROM servidores ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Servidor>, AppError> {
        let row = sqlx::query_as::<_, Servidor>("SELECT * FROM servidores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_ri(&self, ri: &str) -> Result<Option<Servidor>, AppError> {
        let row = sqlx::query_as::<_, Servidor>("SELECT * FROM servidores WHERE ri = $1")
            .bind(ri)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, s: &Servidor) -> Result<Servidor, AppError> {
        sqlx::query_as::<_, Servidor>(
            r#"
            INSERT INTO servidores (id, ri, nome, senha_hash, data_criacao, data_atualizacao)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.ri)
        .bind(&s.nome)
        .bind(&s.senha_hash)
        .bind(s.data_criacao)
        .bind(s.data_atualizacao)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn update(&self, id: Uuid, patch: ServidorPatch) -> Result<Option<Servidor>, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Servidor>("SELECT * FROM servidores WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut servidor) = current else {
            return Ok(None);
        };
        patch.apply_to(&mut servidor, Utc::now());

        let updated = sqlx::query_as::<_, Servidor>(
            r#"
            UPDATE servidores
            SET ri = $2, nome = $3, senha_hash = $4, data_atualizacao = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&servidor.ri)
        .bind(&servidor.nome)
        .bind(&servidor.senha_hash)
        .bind(servidor.data_atualizacao)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match map_db_error(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("Novo RI já está em uso por outro servidor.".to_string())
            }
            other => other,
        })?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_unassigned(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Travar o servidor impede que uma atribuição concorrente passe pela FK
        // entre a verificação e o DELETE.
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM servidores WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let assigned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM solicitacoes WHERE servidor_responsavel = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if assigned {
            return Ok(DeleteOutcome::HasAssignments);
        }

        let result = sqlx::query("DELETE FROM servidores WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(_) => {
                tx.commit().await?;
                Ok(DeleteOutcome::Deleted)
            }
            // ON DELETE RESTRICT ainda protege se algo escapou da verificação
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Ok(DeleteOutcome::HasAssignments)
            }
            Err(e) => Err(e.into()),
        }
    }
}
