// src/config.rs

use anyhow::{anyhow, bail, Context};
use sqlx::postgres::PgPoolOptions;
use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    db::{MemoryStore, PgServidorRepository, PgSolicitacaoRepository, ServidorRepository, SolicitacaoRepository},
    services::{
        auth::AuthService, servidor_service::ServidorService,
        solicitacao_service::SolicitacaoService, upload_service::UploadService,
    },
    storage::{BlobStore, LocalBlobStore, SupabaseBlobStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobBackend {
    Local,
    Supabase {
        url: String,
        service_key: String,
        bucket: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub require_admin_token: bool,
    pub admin_credentials: Vec<(String, String)>,
    pub blob_backend: BlobBackend,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub seed_staff: Vec<(String, String, String)>,
}

impl Config {
    /// Lê a configuração do ambiente (com suporte a `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual a `from_env`, mas com a origem das variáveis injetada.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL");
        let store_backend = match get("STORE_BACKEND").as_deref() {
            Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("STORE_BACKEND inválido: '{}' (use 'postgres' ou 'memory')", other),
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida para STORE_BACKEND=postgres");
        }

        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_ttl_hours: i64 = parse_or("JWT_TTL_HOURS", get("JWT_TTL_HOURS"), 8)?;
        if jwt_ttl_hours <= 0 || chrono::TimeDelta::try_hours(jwt_ttl_hours).is_none() {
            bail!("JWT_TTL_HOURS inválido: '{}' (use um número positivo de horas)", jwt_ttl_hours);
        }

        let blob_backend = match get("BLOB_BACKEND").as_deref() {
            None | Some("local") => BlobBackend::Local,
            Some("supabase") => BlobBackend::Supabase {
                url: get("SUPABASE_URL").context("SUPABASE_URL deve ser definida para BLOB_BACKEND=supabase")?,
                service_key: get("SUPABASE_SERVICE_KEY")
                    .context("SUPABASE_SERVICE_KEY deve ser definida para BLOB_BACKEND=supabase")?,
                bucket: get("SUPABASE_BUCKET").unwrap_or_else(|| "pdfs-croqui".to_string()),
            },
            Some(other) => bail!("BLOB_BACKEND inválido: '{}' (use 'local' ou 'supabase')", other),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            store_backend,
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5)?,
            jwt_secret,
            jwt_ttl_hours,
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), bcrypt::DEFAULT_COST)?,
            require_admin_token: parse_bool("REQUIRE_ADMIN_TOKEN", get("REQUIRE_ADMIN_TOKEN"), true)?,
            admin_credentials: parse_pairs(get("ADMIN_CREDENTIALS").as_deref())?,
            blob_backend,
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            public_base_url: get("PUBLIC_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            seed_staff: parse_seed(get("SEED_STAFF").as_deref())?,
        })
    }

    /// Configuração mínima em memória, usada pelos testes.
    pub fn for_tests(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            jwt_secret: "segredo-de-teste".to_string(),
            jwt_ttl_hours: 1,
            bcrypt_cost: 4,
            require_admin_token: true,
            admin_credentials: vec![("admin".to_string(), "admin123".to_string())],
            blob_backend: BlobBackend::Local,
            upload_dir: upload_dir.into(),
            public_base_url: "http://localhost:3000".to_string(),
            seed_staff: Vec::new(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| anyhow!("{} inválido ('{}'): {}", key, value, e)),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> anyhow::Result<bool> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes" | "sim") => Ok(true),
        Some("false" | "0" | "no" | "nao" | "não") => Ok(false),
        Some(other) => bail!("{} inválido: '{}'", key, other),
    }
}

// `usuario:senha[,usuario:senha...]`
fn parse_pairs(raw: Option<&str>) -> anyhow::Result<Vec<(String, String)>> {
    let Some(raw) = raw else { return Ok(Vec::new()) };
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((usuario, senha)) if !usuario.is_empty() && !senha.is_empty() => {
                Ok((usuario.to_string(), senha.to_string()))
            }
            _ => bail!("ADMIN_CREDENTIALS: entrada inválida '{}' (esperado usuario:senha)", entry),
        })
        .collect()
}

// `ri:nome:senha[,ri:nome:senha...]`
fn parse_seed(raw: Option<&str>) -> anyhow::Result<Vec<(String, String, String)>> {
    let Some(raw) = raw else { return Ok(Vec::new()) };
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(ri), Some(nome), Some(senha)) if !ri.is_empty() && !nome.is_empty() && !senha.is_empty() => {
                    Ok((ri.to_string(), nome.to_string(), senha.to_string()))
                }
                _ => bail!("SEED_STAFF: entrada inválida '{}' (esperado ri:nome:senha)", entry),
            }
        })
        .collect()
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub servidor_service: ServidorService,
    pub solicitacao_service: SolicitacaoService,
    pub upload_service: UploadService,
}

impl AppState {
    /// Conecta ao banco (ou usa memória), roda as migrações e monta os serviços.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (solicitacao_repo, servidor_repo): (Arc<dyn SolicitacaoRepository>, Arc<dyn ServidorRepository>) =
            match config.store_backend {
                StoreBackend::Postgres => {
                    let database_url = config
                        .database_url
                        .as_deref()
                        .context("DATABASE_URL deve ser definida")?;

                    let db_pool = PgPoolOptions::new()
                        .max_connections(config.database_max_connections)
                        .acquire_timeout(Duration::from_secs(3))
                        .connect(database_url)
                        .await
                        .context("Falha ao conectar ao banco de dados")?;
                    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                    sqlx::migrate!()
                        .run(&db_pool)
                        .await
                        .context("Falha ao rodar as migrações do banco de dados")?;
                    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                    (
                        Arc::new(PgSolicitacaoRepository::new(db_pool.clone())),
                        Arc::new(PgServidorRepository::new(db_pool)),
                    )
                }
                StoreBackend::Memory => {
                    tracing::warn!("Usando armazenamento em memória: os dados se perdem ao reiniciar");
                    let store = MemoryStore::new();
                    (Arc::new(store.clone()), Arc::new(store))
                }
            };

        let blob_store: Arc<dyn BlobStore> = match &config.blob_backend {
            BlobBackend::Local => {
                let base_url = format!("{}/uploads", config.public_base_url.trim_end_matches('/'));
                Arc::new(LocalBlobStore::new(&config.upload_dir, base_url).await?)
            }
            BlobBackend::Supabase { url, service_key, bucket } => {
                Arc::new(SupabaseBlobStore::new(url.clone(), service_key.clone(), bucket.clone()))
            }
        };

        Self::assemble(config, solicitacao_repo, servidor_repo, blob_store).await
    }

    /// Monta o gráfico de dependências sobre repositórios já prontos.
    pub async fn assemble(
        config: Config,
        solicitacao_repo: Arc<dyn SolicitacaoRepository>,
        servidor_repo: Arc<dyn ServidorRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> anyhow::Result<Self> {
        if config.admin_credentials.is_empty() {
            tracing::warn!("ADMIN_CREDENTIALS vazio: login de administrador desabilitado");
        }

        let token_ttl = chrono::TimeDelta::try_hours(config.jwt_ttl_hours)
            .filter(|ttl| *ttl > chrono::TimeDelta::zero())
            .ok_or_else(|| anyhow!("JWT_TTL_HOURS fora do intervalo: {}", config.jwt_ttl_hours))?;

        let auth_service = AuthService::new(
            servidor_repo.clone(),
            &config.admin_credentials,
            config.jwt_secret.clone(),
            token_ttl,
            config.bcrypt_cost,
        )?;
        let servidor_service =
            ServidorService::new(servidor_repo, solicitacao_repo.clone(), auth_service.clone());
        let solicitacao_service = SolicitacaoService::new(solicitacao_repo);
        let upload_service = UploadService::new(blob_store);

        if !config.seed_staff.is_empty() {
            let created = servidor_service.seed(&config.seed_staff).await?;
            tracing::info!(created, "Servidores iniciais verificados");
        }

        Ok(Self {
            config: Arc::new(config),
            auth_service,
            servidor_service,
            solicitacao_service,
            upload_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_memory_and_local_storage() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.blob_backend, BlobBackend::Local);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.jwt_ttl_hours, 8);
        assert!(config.require_admin_token);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
    }

    #[test]
    fn database_url_selects_postgres() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);

        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("STORE_BACKEND", "postgres")])).is_err());
    }

    #[test]
    fn token_lifetime_must_be_positive_and_in_range() {
        for ttl in ["0", "-3", "9223372036854775807", "oito"] {
            assert!(
                Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("JWT_TTL_HOURS", ttl)])).is_err(),
                "JWT_TTL_HOURS={} deveria falhar",
                ttl
            );
        }
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("JWT_TTL_HOURS", "24")])).unwrap();
        assert_eq!(config.jwt_ttl_hours, 24);
    }

    #[test]
    fn missing_secret_fails() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn credential_lists_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("ADMIN_CREDENTIALS", "admin:admin123, chefe:s3nh@:x"),
            ("SEED_STAFF", "12345:Carlos Silva:senha123"),
            ("REQUIRE_ADMIN_TOKEN", "false"),
        ]))
        .unwrap();

        assert_eq!(
            config.admin_credentials,
            vec![
                ("admin".to_string(), "admin123".to_string()),
                ("chefe".to_string(), "s3nh@:x".to_string()),
            ]
        );
        assert_eq!(
            config.seed_staff,
            vec![("12345".to_string(), "Carlos Silva".to_string(), "senha123".to_string())]
        );
        assert!(!config.require_admin_token);
    }

    #[test]
    fn malformed_values_fail_startup() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("JWT_TTL_HOURS", "oito")])).is_err());
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("ADMIN_CREDENTIALS", "semsenha")])).is_err());
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("BLOB_BACKEND", "s3")])).is_err());
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "s"), ("BLOB_BACKEND", "supabase")])).is_err());
    }
}
