// src/models/servidor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::validation::not_blank, models::solicitacao::bump_timestamp};

// Representa um servidor vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Servidor {
    pub id: Uuid,

    #[schema(example = "12345")]
    pub ri: String,

    #[schema(example = "Carlos Silva")]
    pub nome: String,

    #[serde(skip_serializing)] // Nunca sai na resposta
    #[schema(ignore)]
    pub senha_hash: String,

    pub data_criacao: DateTime<Utc>,
    pub data_atualizacao: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServidorPayload {
    #[validate(
        required(message = "O RI é obrigatório."),
        custom(function = "not_blank", message = "O RI é obrigatório.")
    )]
    #[schema(example = "12345")]
    pub ri: Option<String>,

    #[validate(
        required(message = "O nome é obrigatório."),
        custom(function = "not_blank", message = "O nome é obrigatório.")
    )]
    #[schema(example = "Carlos Silva")]
    pub nome: Option<String>,

    #[validate(
        required(message = "A senha é obrigatória."),
        length(min = 4, message = "Senha deve ter pelo menos 4 caracteres.")
    )]
    #[schema(example = "senha123")]
    pub senha: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServidorPayload {
    #[validate(custom(function = "not_blank", message = "O RI não pode ser vazio."))]
    pub ri: Option<String>,

    #[validate(custom(function = "not_blank", message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,

    #[validate(length(min = 4, message = "Senha deve ter pelo menos 4 caracteres."))]
    pub senha: Option<String>,
}

impl UpdateServidorPayload {
    pub fn is_empty(&self) -> bool {
        self.ri.is_none() && self.nome.is_none() && self.senha.is_none()
    }
}

/// Alterações já preparadas pelo serviço (senha já convertida em hash).
#[derive(Debug, Default, Clone)]
pub struct ServidorPatch {
    pub ri: Option<String>,
    pub nome: Option<String>,
    pub senha_hash: Option<String>,
}

impl ServidorPatch {
    pub fn apply_to(self, target: &mut Servidor, now: DateTime<Utc>) {
        if let Some(ri) = self.ri {
            target.ri = ri;
        }
        if let Some(nome) = self.nome {
            target.nome = nome;
        }
        if let Some(senha_hash) = self.senha_hash {
            target.senha_hash = senha_hash;
        }
        let last = target.data_atualizacao.unwrap_or(target.data_criacao);
        target.data_atualizacao = Some(bump_timestamp(last, now));
    }
}

#[derive(Debug, Clone)]
pub struct NovoServidor {
    pub ri: String,
    pub nome: String,
    pub senha_hash: String,
}

impl Servidor {
    pub fn new(dados: NovoServidor, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            ri: dados.ri,
            nome: dados.nome,
            senha_hash: dados.senha_hash,
            data_criacao: now,
            data_atualizacao: None,
        }
    }
}

/// Resultado da exclusão com a guarda de solicitações atribuídas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    HasAssignments,
}

// --- RESPOSTAS ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ListaServidoresResponse {
    pub success: bool,
    pub total: usize,
    pub dados: Vec<Servidor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServidorDetalheResponse {
    pub success: bool,
    pub dados: Servidor,
    pub solicitacoes_atribuidas: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServidorResponse {
    pub success: bool,
    pub servidor: Servidor,
    pub mensagem: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MensagemResponse {
    pub success: bool,
    pub mensagem: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servidor() -> Servidor {
        Servidor::new(
            NovoServidor {
                ri: "12345".into(),
                nome: "Carlos Silva".into(),
                senha_hash: "hash".into(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn serialization_never_contains_password() {
        let json = serde_json::to_value(servidor()).unwrap();
        assert!(json.get("senha_hash").is_none());
        assert!(json.get("senha").is_none());
        assert_eq!(json["ri"], "12345");
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let mut s = servidor();
        let patch = ServidorPatch {
            nome: Some("Carlos S.".into()),
            ..Default::default()
        };
        patch.apply_to(&mut s, Utc::now());

        assert_eq!(s.nome, "Carlos S.");
        assert_eq!(s.ri, "12345");
        assert_eq!(s.senha_hash, "hash");
        assert!(s.data_atualizacao.unwrap() > s.data_criacao);
    }

    #[test]
    fn short_password_fails_validation() {
        let payload = CreateServidorPayload {
            ri: Some("1".into()),
            nome: Some("A".into()),
            senha: Some("abc".into()),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("senha"));

        let update = UpdateServidorPayload {
            senha: Some("abc".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn whitespace_ri_and_nome_fail_validation() {
        let payload = CreateServidorPayload {
            ri: Some("   ".into()),
            nome: Some("  ".into()),
            senha: Some("senha123".into()),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ri"));
        assert!(errors.field_errors().contains_key("nome"));

        let update = UpdateServidorPayload {
            nome: Some(" ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateServidorPayload::default().is_empty());
    }
}
