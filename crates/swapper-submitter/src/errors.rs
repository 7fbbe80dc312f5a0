use thiserror::Error;

/// Erros que abortam uma operação de swap
#[derive(Debug, Error)]
pub enum SwapError {
    /// Node inacessível, falha de transporte ou timeout em chamada RPC
    #[error("falha de conectividade com o node: {0}")]
    Connectivity(String),

    /// Chave malformada ou falha do assinador
    #[error("falha de assinatura: {0}")]
    Signing(String),

    /// O node recusou a transação (nonce baixo, saldo insuficiente para gas...)
    #[error("transação rejeitada pelo node: {0}")]
    SubmissionRejected(String),

    /// Valor de entrada fora do domínio aceito
    #[error("valor inválido: {0}")]
    InvalidAmount(String),

    /// Configuração ausente ou inválida
    #[error("configuração inválida: {0}")]
    Config(String),

    /// Falha ao codificar ou decodificar dados de contrato
    #[error("erro de codificação: {0}")]
    Encoding(String),

    /// Operação exposta mas sem implementação
    #[error("operação não implementada: {0}")]
    NotImplemented(&'static str),
}

impl SwapError {
    /// Erro do envio da transação assinada: recusa do node vira `SubmissionRejected`
    pub(crate) fn from_broadcast(err: swapper_core::Error) -> Self {
        match err {
            swapper_core::Error::RpcRejected(msg) => SwapError::SubmissionRejected(msg),
            other => other.into(),
        }
    }
}

/// Fora do broadcast nada foi submetido: recusas do node contam como conectividade
impl From<swapper_core::Error> for SwapError {
    fn from(err: swapper_core::Error) -> Self {
        use swapper_core::Error as CoreError;
        match err {
            CoreError::DecodeError(msg) => SwapError::Encoding(msg),
            other => SwapError::Connectivity(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for SwapError {
    fn from(err: config::ConfigError) -> Self {
        SwapError::Config(err.to_string())
    }
}

impl From<ethers::abi::Error> for SwapError {
    fn from(err: ethers::abi::Error) -> Self {
        SwapError::Encoding(err.to_string())
    }
}

/// Resultado padrão da crate
pub type Result<T> = std::result::Result<T, SwapError>;
