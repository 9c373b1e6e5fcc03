// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::ServidorRepository,
    models::auth::{AuthenticatedPrincipal, Claims, PrincipalKind, Usuario},
};

// Credencial de administrador: a senha só existe como hash em memória.
struct AdminCredential {
    usuario: String,
    senha_hash: String,
}

#[derive(Clone)]
pub struct AuthService {
    servidor_repo: Arc<dyn ServidorRepository>,
    admins: Arc<Vec<AdminCredential>>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
    // Usado quando o identificador não existe, para o tempo de resposta não denunciar isso
    dummy_hash: Arc<String>,
}

impl AuthService {
    /// `admins` chega em texto puro da configuração e é convertido em hash aqui.
    pub fn new(
        servidor_repo: Arc<dyn ServidorRepository>,
        admins: &[(String, String)],
        jwt_secret: String,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let admins = admins
            .iter()
            .map(|(usuario, senha)| {
                Ok(AdminCredential {
                    usuario: usuario.clone(),
                    senha_hash: hash(senha, bcrypt_cost)?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let dummy_hash = hash("senha-inexistente", bcrypt_cost)?;

        Ok(Self {
            servidor_repo,
            admins: Arc::new(admins),
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            dummy_hash: Arc::new(dummy_hash),
        })
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;

        // bcrypt é caro: roda fora do executor assíncrono
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = password_hash.to_owned();

        let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        Ok(is_valid)
    }

    /// RI desconhecido e senha errada resultam no mesmo `InvalidCredentials`.
    pub async fn login_servidor(&self, ri: &str, senha: &str) -> Result<(Usuario, String), AppError> {
        let servidor = self.servidor_repo.find_by_ri(ri).await?;

        let stored_hash = servidor
            .as_ref()
            .map(|s| s.senha_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let is_password_valid = self.verify_password(senha, stored_hash).await?;

        match servidor {
            Some(servidor) if is_password_valid => {
                tracing::info!(servidor_id = %servidor.id, "Login de servidor realizado");
                let token = self.create_token(&servidor.id.to_string(), PrincipalKind::Servidor)?;
                Ok((Usuario::from(&servidor), token))
            }
            _ => {
                tracing::warn!("Tentativa de login de servidor inválida");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    pub async fn login_admin(&self, usuario: &str, senha: &str) -> Result<(Usuario, String), AppError> {
        let admin = self.admins.iter().find(|a| a.usuario == usuario);

        let stored_hash = admin
            .map(|a| a.senha_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let is_password_valid = self.verify_password(senha, stored_hash).await?;

        match admin {
            Some(admin) if is_password_valid => {
                tracing::info!(usuario = %admin.usuario, "Login de administrador realizado");
                let token = self.create_token(&admin.usuario, PrincipalKind::Administrador)?;
                Ok((Usuario::administrador(&admin.usuario), token))
            }
            _ => {
                tracing::warn!("Tentativa de login de administrador inválida");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedPrincipal, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(AuthenticatedPrincipal {
            subject: token_data.claims.sub,
            kind: token_data.claims.kind,
        })
    }

    fn create_token(&self, subject: &str, kind: PrincipalKind) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: subject.to_string(),
            kind,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
