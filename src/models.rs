pub mod auth;
pub mod servidor;
pub mod solicitacao;
pub mod upload;
