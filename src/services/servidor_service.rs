// src/services/servidor_service.rs

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{ServidorRepository, SolicitacaoRepository, RI_EM_USO},
    models::servidor::{
        CreateServidorPayload, DeleteOutcome, NovoServidor, Servidor, ServidorPatch,
        UpdateServidorPayload,
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct ServidorService {
    repo: Arc<dyn ServidorRepository>,
    solicitacao_repo: Arc<dyn SolicitacaoRepository>,
    auth_service: AuthService,
}

impl ServidorService {
    pub fn new(
        repo: Arc<dyn ServidorRepository>,
        solicitacao_repo: Arc<dyn SolicitacaoRepository>,
        auth_service: AuthService,
    ) -> Self {
        Self {
            repo,
            solicitacao_repo,
            auth_service,
        }
    }

    pub async fn list(&self) -> Result<Vec<Servidor>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Servidor, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Servidor".to_string()))
    }

    /// Servidor + quantas solicitações estão atribuídas a ele.
    pub async fn get_with_workload(&self, id: Uuid) -> Result<(Servidor, i64), AppError> {
        let servidor = self.get(id).await?;
        let atribuidas = self.solicitacao_repo.count_assigned_to(id).await?;
        Ok((servidor, atribuidas))
    }

    pub async fn create(&self, payload: CreateServidorPayload) -> Result<Servidor, AppError> {
        payload.validate()?;

        // Os campos obrigatórios já foram garantidos pelo `validate`
        let (Some(ri), Some(nome), Some(senha)) = (payload.ri, payload.nome, payload.senha) else {
            return Err(AppError::InvalidInput(
                "RI, nome e senha são obrigatórios.".to_string(),
            ));
        };
        let ri = ri.trim().to_string();

        if self.repo.find_by_ri(&ri).await?.is_some() {
            return Err(AppError::Conflict(RI_EM_USO.to_string()));
        }

        let senha_hash = self.auth_service.hash_password(&senha).await?;
        let servidor = Servidor::new(
            NovoServidor {
                ri,
                nome: nome.trim().to_string(),
                senha_hash,
            },
            Utc::now(),
        );

        // O índice único ainda cobre a corrida entre a verificação e o INSERT
        let created = self.repo.insert(&servidor).await?;
        tracing::info!(servidor_id = %created.id, ri = %created.ri, "Servidor cadastrado");
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateServidorPayload) -> Result<Servidor, AppError> {
        if payload.is_empty() {
            return Err(AppError::InvalidInput("Nenhum dado para atualizar.".to_string()));
        }
        payload.validate()?;

        let senha_hash = match payload.senha.as_deref() {
            Some(senha) => Some(self.auth_service.hash_password(senha).await?),
            None => None,
        };

        let patch = ServidorPatch {
            ri: payload.ri.map(|ri| ri.trim().to_string()),
            nome: payload.nome.map(|nome| nome.trim().to_string()),
            senha_hash,
        };

        let updated = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Servidor".to_string()))?;

        tracing::info!(servidor_id = %updated.id, "Servidor atualizado");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.repo.delete_unassigned(id).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(servidor_id = %id, "Servidor excluído");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(AppError::ResourceNotFound("Servidor".to_string())),
            DeleteOutcome::HasAssignments => Err(AppError::Conflict(
                "Não é possível excluir servidor com solicitações atribuídas.".to_string(),
            )),
        }
    }

    /// Cadastra os servidores iniciais que ainda não existem (por RI).
    pub async fn seed(&self, entries: &[(String, String, String)]) -> Result<usize, AppError> {
        let mut created = 0;
        for (ri, nome, senha) in entries {
            if self.repo.find_by_ri(ri).await?.is_some() {
                tracing::debug!(%ri, "Servidor inicial já existe");
                continue;
            }
            self.create(CreateServidorPayload {
                ri: Some(ri.clone()),
                nome: Some(nome.clone()),
                senha: Some(senha.clone()),
            })
            .await?;
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStore,
        models::solicitacao::{NovaSolicitacao, Solicitacao},
    };

    fn service() -> (ServidorService, MemoryStore) {
        let store = MemoryStore::new();
        let repo: Arc<dyn ServidorRepository> = Arc::new(store.clone());
        let auth = AuthService::new(repo.clone(), &[], "segredo".to_string(), chrono::Duration::hours(1), 4)
            .unwrap();
        (ServidorService::new(repo, Arc::new(store.clone()), auth), store)
    }

    fn payload(ri: &str) -> CreateServidorPayload {
        CreateServidorPayload {
            ri: Some(ri.to_string()),
            nome: Some("Carlos Silva".to_string()),
            senha: Some("senha123".to_string()),
        }
    }

    #[tokio::test]
    async fn create_hashes_password_and_rejects_duplicate_ri() {
        let (service, _) = service();
        let created = service.create(payload("12345")).await.unwrap();
        assert_ne!(created.senha_hash, "senha123");
        assert!(bcrypt::verify("senha123", &created.senha_hash).unwrap());

        let err = service.create(payload("12345")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == RI_EM_USO));
    }

    #[tokio::test]
    async fn update_requires_some_field() {
        let (service, _) = service();
        let created = service.create(payload("1")).await.unwrap();
        let err = service
            .update(created.id, UpdateServidorPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "Nenhum dado para atualizar."));
    }

    #[tokio::test]
    async fn update_changes_password_hash() {
        let (service, _) = service();
        let created = service.create(payload("1")).await.unwrap();
        let updated = service
            .update(
                created.id,
                UpdateServidorPayload {
                    senha: Some("nova-senha".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(bcrypt::verify("nova-senha", &updated.senha_hash).unwrap());
        assert_eq!(updated.ri, "1");
        assert!(updated.data_atualizacao.is_some());
    }

    #[tokio::test]
    async fn update_to_taken_ri_is_conflict() {
        let (service, _) = service();
        service.create(payload("1")).await.unwrap();
        let second = service.create(payload("2")).await.unwrap();
        let err = service
            .update(
                second.id,
                UpdateServidorPayload {
                    ri: Some("1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_assigned() {
        let (service, store) = service();
        let servidor = service.create(payload("1")).await.unwrap();

        let mut solicitacao = Solicitacao::new(
            NovaSolicitacao {
                tipo: "croqui".into(),
                nome: "Maria".into(),
                cpf: None,
                iptu: "1".into(),
                endereco: None,
                numero_imovel: None,
                bairro: None,
                quadra: None,
                lote: None,
                comprovacao_url: None,
            },
            "SOL-000001".into(),
            Utc::now(),
        );
        solicitacao.servidor_responsavel = Some(servidor.id);
        SolicitacaoRepository::insert(&store, &solicitacao).await.unwrap();

        let err = service.delete(servidor.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let (_, atribuidas) = service.get_with_workload(servidor.id).await.unwrap();
        assert_eq!(atribuidas, 1);

        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn seed_skips_existing_ri() {
        let (service, _) = service();
        let entries = vec![
            ("1".to_string(), "Ana".to_string(), "senha1".to_string()),
            ("2".to_string(), "Bruno".to_string(), "senha2".to_string()),
        ];
        assert_eq!(service.seed(&entries).await.unwrap(), 2);
        assert_eq!(service.seed(&entries).await.unwrap(), 0);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
