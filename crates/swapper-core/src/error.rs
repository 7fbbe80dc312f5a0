use thiserror::Error;

/// Erros comuns da biblioteca Swapper
#[derive(Error, Debug)]
pub enum Error {
    /// Erro de comunicação com o node (inacessível, transporte ou timeout)
    #[error("Erro de RPC: {0}")]
    RpcError(String),

    /// O node respondeu, mas recusou a requisição
    #[error("Requisição rejeitada pelo node: {0}")]
    RpcRejected(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Indica se o erro veio de falha de conectividade com o node
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::RpcError(_) | Error::TimeoutError(_))
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
