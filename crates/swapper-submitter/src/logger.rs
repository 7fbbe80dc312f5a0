use once_cell::sync::Lazy;
use swapper_core::utils::format_h256;
use swapper_logs::{LogLevel, SwapperLogger};
use tracing::{info, warn};

use crate::outcome::SwapOutcome;

const CRATE_NAME: &str = "swapper-submitter";

// Envio remoto só acontece com SWAPPER_LOGS_ENDPOINT definido
static LOGGER: Lazy<Option<SwapperLogger>> = Lazy::new(|| {
    std::env::var("SWAPPER_LOGS_ENDPOINT")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .map(SwapperLogger::new)
});

/// Envia em segundo plano; um coletor lento nunca atrasa o fluxo do swap
fn ship(level: LogLevel, message: String, tx_hash: Option<String>) {
    let Some(logger) = LOGGER.as_ref() else {
        return;
    };
    tokio::spawn(async move {
        let sent = match tx_hash {
            Some(hash) => logger.log_tx(level, &message, CRATE_NAME, &hash).await,
            None => logger.log(level, &message, CRATE_NAME).await,
        };
        if let Err(e) = sent {
            tracing::debug!("log remoto descartado: {}", e);
        }
    });
}

pub fn log_error(message: &str) {
    ship(LogLevel::Error, message.to_string(), None);
}

pub fn log_warn(message: &str) {
    ship(LogLevel::Warn, message.to_string(), None);
}

/// Publica o estado final do swap no console e, se configurado, no coletor
pub fn report_outcome(outcome: &SwapOutcome) {
    let level = match outcome {
        SwapOutcome::Confirmed { .. } => {
            info!("{}", outcome);
            LogLevel::Info
        }
        _ => {
            warn!("{}", outcome);
            LogLevel::Warn
        }
    };
    ship(level, outcome.to_string(), Some(format_h256(&outcome.tx_hash())));
}
