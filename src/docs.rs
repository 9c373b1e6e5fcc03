// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Status ---
        handlers::status::get_status,
        handlers::status::api_index,

        // --- Auth ---
        handlers::auth::login_servidor,
        handlers::auth::login_admin,

        // --- Solicitações ---
        handlers::solicitacoes::create_solicitacao,
        handlers::solicitacoes::list_solicitacoes,
        handlers::solicitacoes::get_solicitacao,
        handlers::solicitacoes::update_solicitacao_by_path,
        handlers::solicitacoes::update_solicitacao,

        // --- Servidores ---
        handlers::servidores::list_servidores,
        handlers::servidores::get_servidor,
        handlers::servidores::create_servidor,
        handlers::servidores::update_servidor_by_path,
        handlers::servidores::update_servidor,
        handlers::servidores::delete_servidor_by_path,
        handlers::servidores::delete_servidor,

        // --- Uploads ---
        handlers::uploads::upload_multipart,
        handlers::uploads::upload_base64,
    ),
    components(
        schemas(
            // --- Status ---
            handlers::status::StatusResponse,
            handlers::status::ApiIndexResponse,

            // --- Auth ---
            models::auth::PrincipalKind,
            models::auth::LoginServidorPayload,
            models::auth::LoginAdminPayload,
            models::auth::Usuario,
            models::auth::LoginResponse,

            // --- Solicitações ---
            models::solicitacao::StatusSolicitacao,
            models::solicitacao::Solicitacao,
            models::solicitacao::CreateSolicitacaoPayload,
            models::solicitacao::UpdateSolicitacaoPayload,
            models::solicitacao::SolicitacaoResponse,
            models::solicitacao::ListaSolicitacoesResponse,

            // --- Servidores ---
            models::servidor::Servidor,
            models::servidor::CreateServidorPayload,
            models::servidor::UpdateServidorPayload,
            models::servidor::ListaServidoresResponse,
            models::servidor::ServidorDetalheResponse,
            models::servidor::ServidorResponse,
            models::servidor::MensagemResponse,

            // --- Uploads ---
            models::upload::ArquivoEnviado,
            models::upload::Base64UploadPayload,
            models::upload::UploadForm,
            models::upload::UploadResponse,
        )
    ),
    tags(
        (name = "Status", description = "Saúde e índice da API"),
        (name = "Auth", description = "Login de servidores e administradores"),
        (name = "Solicitações", description = "Pedidos de croqui e seu ciclo de vida"),
        (name = "Servidores", description = "Cadastro de servidores (somente administradores)"),
        (name = "Uploads", description = "Envio de comprovantes em PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
