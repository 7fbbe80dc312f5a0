use ethereum_types::U256;
use serde::Serialize;
use swapper_core::{types::TransactionHash, utils::{format_h256, format_token_amount}, NATIVE_DECIMALS};
use std::fmt;

/// Estado terminal de um swap que chegou a ser transmitido.
///
/// `ConfirmationTimeout` e `Cancelled` significam que a transação foi aceita
/// pelo node mas o recibo não foi observado: ela ainda pode ser minerada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SwapOutcome {
    Confirmed {
        tx_hash: TransactionHash,
        amount_in: U256,
        block_number: Option<u64>,
        gas_used: Option<U256>,
    },
    Reverted {
        tx_hash: TransactionHash,
        block_number: Option<u64>,
        gas_used: Option<U256>,
    },
    ConfirmationTimeout {
        tx_hash: TransactionHash,
    },
    Cancelled {
        tx_hash: TransactionHash,
    },
}

impl SwapOutcome {
    pub fn tx_hash(&self) -> TransactionHash {
        match self {
            SwapOutcome::Confirmed { tx_hash, .. }
            | SwapOutcome::Reverted { tx_hash, .. }
            | SwapOutcome::ConfirmationTimeout { tx_hash }
            | SwapOutcome::Cancelled { tx_hash } => *tx_hash,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SwapOutcome::Confirmed { .. })
    }

    /// Transmitida, mas sem confirmação conhecida
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, SwapOutcome::ConfirmationTimeout { .. } | SwapOutcome::Cancelled { .. })
    }
}

fn write_gas(f: &mut fmt::Formatter<'_>, gas_used: &Option<U256>) -> fmt::Result {
    match gas_used {
        Some(gas) => write!(f, ", gas usado {}", gas),
        None => Ok(()),
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapOutcome::Confirmed { tx_hash, amount_in, gas_used, .. } => {
                write!(
                    f,
                    "swap confirmado: {} gastos (tx {})",
                    format_token_amount(amount_in, NATIVE_DECIMALS),
                    format_h256(tx_hash)
                )?;
                write_gas(f, gas_used)
            }
            SwapOutcome::Reverted { tx_hash, gas_used, .. } => {
                write!(f, "swap revertido on-chain (tx {})", format_h256(tx_hash))?;
                write_gas(f, gas_used)
            }
            SwapOutcome::ConfirmationTimeout { tx_hash } => write!(
                f,
                "swap transmitido sem recibo dentro do prazo, estado desconhecido (tx {})",
                format_h256(tx_hash)
            ),
            SwapOutcome::Cancelled { tx_hash } => write!(
                f,
                "espera por recibo cancelada, estado desconhecido (tx {})",
                format_h256(tx_hash)
            ),
        }
    }
}
