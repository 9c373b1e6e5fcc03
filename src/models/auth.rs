// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::servidor::Servidor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Servidor,
    Administrador,
}

// Dados para login do servidor
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginServidorPayload {
    #[validate(required(message = "RI e senha são obrigatórios."))]
    #[schema(example = "12345")]
    pub ri: Option<String>,
    #[validate(required(message = "RI e senha são obrigatórios."))]
    #[schema(example = "senha123")]
    pub senha: Option<String>,
}

// Dados para login do administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginAdminPayload {
    #[validate(required(message = "Usuário e senha são obrigatórios."))]
    #[schema(example = "admin")]
    pub usuario: Option<String>,
    #[validate(required(message = "Usuário e senha são obrigatórios."))]
    pub senha: Option<String>,
}

/// Visão sanitizada de quem fez login. Nunca carrega a senha.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Usuario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ri: Option<String>,
    pub nome: String,
    pub tipo: PrincipalKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<DateTime<Utc>>,
}

impl From<&Servidor> for Usuario {
    fn from(s: &Servidor) -> Self {
        Self {
            id: Some(s.id),
            ri: Some(s.ri.clone()),
            nome: s.nome.clone(),
            tipo: PrincipalKind::Servidor,
            data_criacao: Some(s.data_criacao),
        }
    }
}

impl Usuario {
    pub fn administrador(usuario: &str) -> Self {
        Self {
            id: None,
            ri: None,
            nome: usuario.to_string(),
            tipo: PrincipalKind::Administrador,
            data_criacao: None,
        }
    }
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub usuario: Usuario,
    pub token: String,
    pub message: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (id do servidor ou usuário do admin)
    pub kind: PrincipalKind,  // Tipo do principal
    pub exp: usize,           // Expiration time
    pub iat: usize,           // Issued At
}

/// Principal autenticado extraído do token.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub subject: String,
    pub kind: PrincipalKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::servidor::NovoServidor;

    #[test]
    fn servidor_view_is_sanitized() {
        let servidor = Servidor::new(
            NovoServidor {
                ri: "12345".into(),
                nome: "Carlos".into(),
                senha_hash: "segredo".into(),
            },
            Utc::now(),
        );
        let json = serde_json::to_value(Usuario::from(&servidor)).unwrap();
        assert_eq!(json["tipo"], "servidor");
        assert_eq!(json["ri"], "12345");
        assert!(!json.to_string().contains("segredo"));
    }

    #[test]
    fn admin_view_omits_staff_fields() {
        let json = serde_json::to_value(Usuario::administrador("admin")).unwrap();
        assert_eq!(json["tipo"], "administrador");
        assert_eq!(json["nome"], "admin");
        assert!(json.get("id").is_none());
        assert!(json.get("ri").is_none());
    }
}
