pub mod auth;
pub mod servidores;
pub mod solicitacoes;
pub mod status;
pub mod uploads;
