pub mod auth;
pub mod servidor_service;
pub mod solicitacao_service;
pub mod upload_service;
