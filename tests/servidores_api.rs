//! Testes de integração do cadastro de servidores.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn staff_routes_require_admin_token() {
    let app = common::spawn_app().await;

    let (status, body) = app.get("/api/servidores", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/api/servidores", Some("token-falso")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.create_servidor("12345", "Carlos Silva", "senha123").await;
    let (_, login) = app
        .post("/api/login/servidor", json!({ "ri": "12345", "senha": "senha123" }), None)
        .await;
    let staff_token = login["token"].as_str().unwrap();

    let (status, body) = app.get("/api/servidores", Some(staff_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Acesso restrito a administradores.");
}

#[tokio::test]
async fn guard_can_be_disabled_by_configuration() {
    let app = common::spawn_app_with(|config| config.require_admin_token = false).await;

    let (status, body) = app.get("/api/servidores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn create_list_and_fetch_without_password() {
    let app = common::spawn_app().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/servidores",
            json!({ "ri": "200", "nome": "Zélia Prado", "senha": "senha123" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mensagem"], "Servidor cadastrado com sucesso");
    assert!(body["servidor"].get("senha").is_none());
    assert!(body["servidor"].get("senha_hash").is_none());
    app.create_servidor("100", "Ana Lima", "senha123").await;

    let (status, body) = app.get("/api/servidores", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let dados = body["dados"].as_array().unwrap();
    assert_eq!(dados[0]["nome"], "Ana Lima");
    assert_eq!(dados[1]["nome"], "Zélia Prado");
    assert!(dados.iter().all(|s| s.get("senha_hash").is_none() && s.get("senha").is_none()));

    let id = dados[0]["id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/api/servidores/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dados"]["ri"], "100");
    assert_eq!(body["solicitacoes_atribuidas"], 0);

    let unknown = uuid::Uuid::new_v4();
    let (status, _) = app.get(&format!("/api/servidores/{unknown}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_ri_and_short_password_are_rejected() {
    let app = common::spawn_app().await;
    let token = app.admin_token().await;
    app.create_servidor("12345", "Carlos Silva", "senha123").await;

    let (status, body) = app
        .post(
            "/api/servidores",
            json!({ "ri": "12345", "nome": "Outro", "senha": "senha123" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "RI já está cadastrado.");

    let (status, body) = app
        .post(
            "/api/servidores",
            json!({ "ri": "999", "nome": "Curta", "senha": "abc" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("4 caracteres"));

    let (status, _) = app
        .post("/api/servidores", json!({ "nome": "Sem RI", "senha": "senha123" }), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/servidores", Some(&token)).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn blank_ri_and_nome_are_rejected() {
    let app = common::spawn_app().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/servidores",
            json!({ "ri": "   ", "nome": "  ", "senha": "senha123" }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("RI"));

    // Nada foi gravado, então um RI em branco não ocupa a vaga de unicidade
    let (status, _) = app
        .post("/api/servidores", json!({ "ri": " ", "nome": "Ana", "senha": "senha123" }), Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ana = app.create_servidor("1", "Ana", "senha123").await;
    let (status, _) = app
        .put(
            &format!("/api/servidores/{}", ana["id"].as_str().unwrap()),
            json!({ "nome": "   " }),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/servidores", Some(&token)).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["dados"][0]["nome"], "Ana");
}

#[tokio::test]
async fn update_by_path_or_query() {
    let app = common::spawn_app().await;
    let token = app.admin_token().await;
    let ana = app.create_servidor("1", "Ana", "senha123").await;
    app.create_servidor("2", "Bruno", "senha123").await;
    let id = ana["id"].as_str().unwrap();

    let (status, body) = app
        .put(&format!("/api/servidores/{id}"), json!({ "nome": "Ana Lima" }), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servidor"]["nome"], "Ana Lima");
    assert_eq!(body["servidor"]["ri"], "1");
    assert!(body["servidor"]["data_atualizacao"].is_string());

    let (status, body) = app
        .put(&format!("/api/servidores?id={id}"), json!({ "ri": "2" }), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = app.put(&format!("/api/servidores/{id}"), json!({}), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Nenhum dado para atualizar.");

    let (status, _) = app.put("/api/servidores", json!({ "nome": "X" }), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4();
    let (status, _) = app
        .put(&format!("/api/servidores/{unknown}"), json!({ "nome": "X" }), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A nova senha passa a valer no login
    app.put(&format!("/api/servidores/{id}"), json!({ "senha": "nova-senha" }), Some(&token))
        .await;
    let (status, _) = app
        .post("/api/login/servidor", json!({ "ri": "1", "senha": "nova-senha" }), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_is_blocked_while_requests_are_assigned() {
    let app = common::spawn_app().await;
    let token = app.admin_token().await;
    let servidor = app.create_servidor("12345", "Carlos Silva", "senha123").await;
    let servidor_id = servidor["id"].as_str().unwrap();

    let solicitacao = app.create_solicitacao("croqui", "Maria").await;
    let (status, _) = app
        .put(
            &format!("/api/solicitacoes/{}", solicitacao["id"].as_str().unwrap()),
            json!({ "servidorResponsavel": servidor_id }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&format!("/api/servidores/{servidor_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Não é possível excluir servidor com solicitações atribuídas.");

    let (status, body) = app.get(&format!("/api/servidores/{servidor_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["solicitacoes_atribuidas"], 1);

    // Liberando a solicitação, a exclusão passa
    app.put(
        &format!("/api/solicitacoes/{}", solicitacao["id"].as_str().unwrap()),
        json!({ "servidorResponsavel": null }),
        None,
    )
    .await;
    let (status, body) = app.delete(&format!("/api/servidores?id={servidor_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensagem"], "Servidor excluído com sucesso");

    let (status, _) = app.delete(&format!("/api/servidores/{servidor_id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
