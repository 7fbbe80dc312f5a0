use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Tipo de erro retornado pelo logger.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("erro ao enviar log: {0}")]
    Request(#[from] reqwest::Error),
}

/// Nível de severidade aceito pelo coletor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Entrada de log enviada ao coletor.
#[derive(Serialize)]
struct LogEntry<'a> {
    level: LogLevel,
    message: &'a str,
    crate_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_hash: Option<&'a str>,
    timestamp: DateTime<Utc>,
}

/// Cliente simples para envio de logs a um coletor HTTP (ex: Elasticsearch).
pub struct SwapperLogger {
    endpoint: String,
    client: Client,
}

impl SwapperLogger {
    /// Cria uma nova instância apontando para a `endpoint` do coletor.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Envia um log para o coletor.
    pub async fn log(
        &self,
        level: LogLevel,
        message: &str,
        crate_name: &str,
    ) -> Result<(), LogError> {
        self.send(LogEntry {
            level,
            message,
            crate_name,
            tx_hash: None,
            timestamp: Utc::now(),
        })
        .await
    }

    /// Envia um log associado a uma transação.
    pub async fn log_tx(
        &self,
        level: LogLevel,
        message: &str,
        crate_name: &str,
        tx_hash: &str,
    ) -> Result<(), LogError> {
        self.send(LogEntry {
            level,
            message,
            crate_name,
            tx_hash: Some(tx_hash),
            timestamp: Utc::now(),
        })
        .await
    }

    async fn send(&self, entry: LogEntry<'_>) -> Result<(), LogError> {
        self.client
            .post(&self.endpoint)
            .json(&entry)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
