//! Infraestrutura compartilhada dos testes de integração.
//!
//! Monta o mesmo router do binário sobre o store em memória e um diretório de
//! uploads temporário, e oferece helpers para disparar requisições com
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use sistema_croqui::{
    build_router,
    config::{AppState, Config},
    db::MemoryStore,
    storage::LocalBlobStore,
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Permite ajustar a configuração (ex.: desligar o token de administrador).
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("diretório temporário");
    let mut config = Config::for_tests(upload_dir.path());
    customize(&mut config);

    let store = MemoryStore::new();
    let blob_store = LocalBlobStore::new(upload_dir.path(), "http://localhost:3000/uploads")
        .await
        .expect("blob store local");

    let state = AppState::assemble(config, Arc::new(store.clone()), Arc::new(store), Arc::new(blob_store))
        .await
        .expect("estado da aplicação");

    TestApp {
        router: build_router(state.clone()),
        state,
        upload_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("resposta");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("corpo").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(json_request(Method::GET, uri, None, token)).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, Some(body), token)).await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        self.send(json_request(Method::PUT, uri, Some(body), token)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(json_request(Method::DELETE, uri, None, token)).await
    }

    /// Token de administrador das credenciais de teste (`admin`/`admin123`).
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .post("/api/login/admin", json!({ "usuario": "admin", "senha": "admin123" }), None)
            .await;
        assert_eq!(status, StatusCode::OK, "login admin falhou: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Cadastra um servidor via API e devolve o JSON do registro.
    pub async fn create_servidor(&self, ri: &str, nome: &str, senha: &str) -> Value {
        let token = self.admin_token().await;
        let (status, body) = self
            .post(
                "/api/servidores",
                json!({ "ri": ri, "nome": nome, "senha": senha }),
                Some(&token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "cadastro falhou: {body}");
        body["servidor"].clone()
    }

    /// Cria uma solicitação mínima e devolve o JSON do registro.
    pub async fn create_solicitacao(&self, tipo: &str, nome: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/solicitacoes",
                json!({ "tipo": tipo, "nome": nome, "iptu": "12345-6" }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "criação falhou: {body}");
        body["solicitacao"].clone()
    }
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}
