// src/db/solicitacao_repo.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{map_db_error, repository::SolicitacaoRepository},
    models::solicitacao::{Solicitacao, SolicitacaoFilter, UpdateSolicitacaoPayload},
};

// O repositório de solicitações, responsável pela tabela 'solicitacoes'
#[derive(Clone)]
pub struct PgSolicitacaoRepository {
    pool: PgPool,
}

impl PgSolicitacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SolicitacaoRepository for PgSolicitacaoRepository {
    async fn insert(&self, s: &Solicitacao) -> Result<Solicitacao, AppError> {
        sqlx::query_as::<_, Solicitacao>(
            r#"
            INSERT INTO solicitacoes (
                id, numero, tipo, nome, cpf, iptu, endereco, numero_imovel,
                bairro, quadra, lote, comprovacao_url, status,
                servidor_responsavel, resultado, data_criacao, data_atualizacao
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.numero)
        .bind(&s.tipo)
        .bind(&s.nome)
        .bind(&s.cpf)
        .bind(&s.iptu)
        .bind(&s.endereco)
        .bind(&s.numero_imovel)
        .bind(&s.bairro)
        .bind(&s.quadra)
        .bind(&s.lote)
        .bind(&s.comprovacao_url)
        .bind(s.status)
        .bind(s.servidor_responsavel)
        .bind(&s.resultado)
        .bind(s.data_criacao)
        .bind(s.data_atualizacao)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn list(&self, filter: &SolicitacaoFilter) -> Result<Vec<Solicitacao>, AppError> {
        // Filtros opcionais: NULL desliga a condição
        let rows = sqlx::query_as::<_, Solicitacao>(
            r#"
            SELECT * FROM solicitacoes
            WHERE ($1::status_solicitacao IS NULL OR status = $1)
              AND ($2::text IS NULL OR tipo = $2)
            ORDER BY data_criacao DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.tipo.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Solicitacao>, AppError> {
        let row = sqlx::query_as::<_, Solicitacao>("SELECT * FROM solicitacoes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateSolicitacaoPayload) -> Result<Option<Solicitacao>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha enquanto mesclamos o payload
        let current = sqlx::query_as::<_, Solicitacao>(
            "SELECT * FROM solicitacoes WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut solicitacao) = current else {
            return Ok(None);
        };
        patch.apply_to(&mut solicitacao, Utc::now())?;

        let updated = sqlx::query_as::<_, Solicitacao>(
            r#"
            UPDATE solicitacoes SET
                tipo = $2, nome = $3, cpf = $4, iptu = $5, endereco = $6,
                numero_imovel = $7, bairro = $8, quadra = $9, lote = $10,
                comprovacao_url = $11, status = $12, servidor_responsavel = $13,
                resultado = $14, data_atualizacao = $15
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&solicitacao.tipo)
        .bind(&solicitacao.nome)
        .bind(&solicitacao.cpf)
        .bind(&solicitacao.iptu)
        .bind(&solicitacao.endereco)
        .bind(&solicitacao.numero_imovel)
        .bind(&solicitacao.bairro)
        .bind(&solicitacao.quadra)
        .bind(&solicitacao.lote)
        .bind(&solicitacao.comprovacao_url)
        .bind(solicitacao.status)
        .bind(solicitacao.servidor_responsavel)
        .bind(&solicitacao.resultado)
        .bind(solicitacao.data_atualizacao)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn count_assigned_to(&self, servidor_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM solicitacoes WHERE servidor_responsavel = $1",
        )
        .bind(servidor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

