// src/models/solicitacao.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{error::AppError, serde_utils::double_option, validation::not_blank as validate_not_blank};

// --- ENUMS ---

// Mapeia o CREATE TYPE status_solicitacao do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_solicitacao", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusSolicitacao {
    Pendente,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl StatusSolicitacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSolicitacao::Pendente => "pendente",
            StatusSolicitacao::EmAndamento => "em_andamento",
            StatusSolicitacao::Concluido => "concluido",
            StatusSolicitacao::Cancelado => "cancelado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusSolicitacao::Concluido | StatusSolicitacao::Cancelado)
    }

    // Estados finais só podem "ir" para eles mesmos.
    pub fn can_transition_to(&self, next: StatusSolicitacao) -> bool {
        !self.is_terminal() || *self == next
    }
}

impl std::str::FromStr for StatusSolicitacao {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pendente" => Ok(StatusSolicitacao::Pendente),
            "em_andamento" => Ok(StatusSolicitacao::EmAndamento),
            "concluido" => Ok(StatusSolicitacao::Concluido),
            "cancelado" => Ok(StatusSolicitacao::Cancelado),
            other => Err(AppError::InvalidInput(format!("Status inválido: {}", other))),
        }
    }
}

// --- ENTIDADE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Solicitacao {
    pub id: Uuid,

    #[schema(example = "SOL-123456")]
    pub numero: String,

    #[schema(example = "croqui")]
    pub tipo: String,

    #[schema(example = "Maria Souza")]
    pub nome: String,

    #[schema(example = "123.456.789-00")]
    pub cpf: Option<String>,

    #[schema(example = "12345-6")]
    pub iptu: String,

    pub endereco: Option<String>,
    pub numero_imovel: Option<String>,
    pub bairro: Option<String>,
    pub quadra: Option<String>,
    pub lote: Option<String>,

    // Referência opaca ao comprovante (caminho ou URL pública)
    pub comprovacao_url: Option<String>,

    pub status: StatusSolicitacao,
    pub servidor_responsavel: Option<Uuid>,
    pub resultado: Option<String>,

    pub data_criacao: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
}

/// Dados validados de uma nova solicitação, antes de receber número e id.
#[derive(Debug, Clone)]
pub struct NovaSolicitacao {
    pub tipo: String,
    pub nome: String,
    pub cpf: Option<String>,
    pub iptu: String,
    pub endereco: Option<String>,
    pub numero_imovel: Option<String>,
    pub bairro: Option<String>,
    pub quadra: Option<String>,
    pub lote: Option<String>,
    pub comprovacao_url: Option<String>,
}

impl Solicitacao {
    pub fn new(dados: NovaSolicitacao, numero: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            numero,
            tipo: dados.tipo,
            nome: dados.nome,
            cpf: dados.cpf,
            iptu: dados.iptu,
            endereco: dados.endereco,
            numero_imovel: dados.numero_imovel,
            bairro: dados.bairro,
            quadra: dados.quadra,
            lote: dados.lote,
            comprovacao_url: dados.comprovacao_url,
            status: StatusSolicitacao::Pendente,
            servidor_responsavel: None,
            resultado: None,
            data_criacao: now,
            data_atualizacao: now,
        }
    }
}

/// Avança `current` para `now`, garantindo que o valor sempre cresça.
pub fn bump_timestamp(current: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > current {
        now
    } else {
        current + Duration::microseconds(1)
    }
}

// --- PAYLOADS ---

// Campos obrigatórios são `Option` para que a ausência vire erro de validação (400)
// e não rejeição de desserialização.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSolicitacaoPayload {
    #[validate(
        required(message = "O tipo é obrigatório."),
        custom(function = "validate_not_blank", message = "O tipo é obrigatório.")
    )]
    #[schema(example = "croqui")]
    pub tipo: Option<String>,

    #[validate(
        required(message = "O nome é obrigatório."),
        custom(function = "validate_not_blank", message = "O nome é obrigatório.")
    )]
    #[schema(example = "Maria Souza")]
    pub nome: Option<String>,

    #[validate(
        required(message = "O IPTU é obrigatório."),
        custom(function = "validate_not_blank", message = "O IPTU é obrigatório.")
    )]
    #[schema(example = "12345-6")]
    pub iptu: Option<String>,

    pub cpf: Option<String>,
    pub endereco: Option<String>,

    #[serde(alias = "numero_imovel")]
    pub numero_imovel: Option<String>,

    pub bairro: Option<String>,
    pub quadra: Option<String>,
    pub lote: Option<String>,

    #[serde(alias = "comprovacao_url", alias = "arquivoAnexo")]
    pub comprovacao_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateSolicitacaoPayload {
    /// Converte o payload já validado.
    pub fn into_nova(self) -> Result<NovaSolicitacao, AppError> {
        let required = |value: Option<String>, campo: &str| {
            non_blank(value).ok_or_else(|| AppError::InvalidInput(format!("O {} é obrigatório.", campo)))
        };

        Ok(NovaSolicitacao {
            tipo: required(self.tipo, "tipo")?,
            nome: required(self.nome, "nome")?,
            iptu: required(self.iptu, "IPTU")?,
            cpf: non_blank(self.cpf),
            endereco: non_blank(self.endereco),
            numero_imovel: non_blank(self.numero_imovel),
            bairro: non_blank(self.bairro),
            quadra: non_blank(self.quadra),
            lote: non_blank(self.lote),
            comprovacao_url: non_blank(self.comprovacao_url),
        })
    }
}

/// Atualização parcial: só os campos presentes no JSON são alterados.
/// `id`, `numero` e `data_criacao` não fazem parte do payload e são ignorados.
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSolicitacaoPayload {
    #[validate(custom(function = "validate_not_blank", message = "O tipo não pode ser vazio."))]
    pub tipo: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "O IPTU não pode ser vazio."))]
    pub iptu: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cpf: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub endereco: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", alias = "numero_imovel")]
    #[schema(value_type = Option<String>)]
    pub numero_imovel: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bairro: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub quadra: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub lote: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", alias = "comprovacao_url")]
    #[schema(value_type = Option<String>)]
    pub comprovacao_url: Option<Option<String>>,

    #[schema(example = "concluido")]
    pub status: Option<StatusSolicitacao>,

    #[serde(default, deserialize_with = "double_option", alias = "servidor_responsavel")]
    #[schema(value_type = Option<Uuid>)]
    pub servidor_responsavel: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub resultado: Option<Option<String>>,
}

impl UpdateSolicitacaoPayload {
    /// Servidor que o payload quer atribuir, se houver.
    pub fn assigned_staff(&self) -> Option<Uuid> {
        self.servidor_responsavel.flatten()
    }

    /// Mescla o payload sobre o registro e atualiza `data_atualizacao`.
    /// Nada é alterado se a transição de status for inválida ou se um campo
    /// obrigatório vier em branco.
    pub fn apply_to(self, target: &mut Solicitacao, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(next) = self.status {
            if !target.status.can_transition_to(next) {
                return Err(AppError::InvalidInput(format!(
                    "Transição de status inválida: {} -> {}",
                    target.status.as_str(),
                    next.as_str()
                )));
            }
        }

        let required = |value: Option<String>, campo: &str| match value {
            Some(v) => non_blank(Some(v))
                .map(Some)
                .ok_or_else(|| AppError::InvalidInput(format!("O {} não pode ser vazio.", campo))),
            None => Ok(None),
        };
        let tipo = required(self.tipo, "tipo")?;
        let nome = required(self.nome, "nome")?;
        let iptu = required(self.iptu, "IPTU")?;

        if let Some(tipo) = tipo {
            target.tipo = tipo;
        }
        if let Some(nome) = nome {
            target.nome = nome;
        }
        if let Some(iptu) = iptu {
            target.iptu = iptu;
        }
        if let Some(cpf) = self.cpf {
            target.cpf = cpf;
        }
        if let Some(endereco) = self.endereco {
            target.endereco = endereco;
        }
        if let Some(numero_imovel) = self.numero_imovel {
            target.numero_imovel = numero_imovel;
        }
        if let Some(bairro) = self.bairro {
            target.bairro = bairro;
        }
        if let Some(quadra) = self.quadra {
            target.quadra = quadra;
        }
        if let Some(lote) = self.lote {
            target.lote = lote;
        }
        if let Some(url) = self.comprovacao_url {
            target.comprovacao_url = url;
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        if let Some(servidor) = self.servidor_responsavel {
            target.servidor_responsavel = servidor;
        }
        if let Some(resultado) = self.resultado {
            target.resultado = resultado;
        }

        target.data_atualizacao = bump_timestamp(target.data_atualizacao, now);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSolicitacoesQuery {
    /// Filtra pelo status (pendente, em_andamento, concluido, cancelado)
    pub status: Option<String>,
    /// Filtra pelo tipo da solicitação
    pub tipo: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct SolicitacaoFilter {
    pub status: Option<StatusSolicitacao>,
    pub tipo: Option<String>,
}

impl SolicitacaoFilter {
    pub fn matches(&self, s: &Solicitacao) -> bool {
        self.status.is_none_or(|status| s.status == status)
            && self.tipo.as_deref().is_none_or(|tipo| s.tipo == tipo)
    }
}

impl TryFrom<ListSolicitacoesQuery> for SolicitacaoFilter {
    type Error = AppError;

    fn try_from(query: ListSolicitacoesQuery) -> Result<Self, Self::Error> {
        let status = match non_blank(query.status) {
            Some(raw) => Some(raw.parse()?),
            None => None,
        };
        Ok(Self {
            status,
            tipo: non_blank(query.tipo),
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Alternativa ao id no path, mantida por compatibilidade
    pub id: Option<String>,
}

// --- RESPOSTAS ---

#[derive(Debug, Serialize, ToSchema)]
pub struct SolicitacaoResponse {
    pub success: bool,
    pub solicitacao: Solicitacao,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListaSolicitacoesResponse {
    pub success: bool,
    pub total: usize,
    pub dados: Vec<Solicitacao>,
}
