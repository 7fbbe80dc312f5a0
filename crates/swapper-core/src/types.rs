/*!
 * Swapper Types
 *
 * Tipos comuns usados em toda a workspace Swapper
 */

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias para hash de transação
pub type TransactionHash = ethereum_types::H256;

/// Casas decimais da moeda nativa (wei)
pub const NATIVE_DECIMALS: u8 = 18;

/// Status de transação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    Failure,
    Pending,
}

impl TransactionStatus {
    /// Converte o campo `status` do recibo (EIP-658)
    pub fn from_code(code: Option<u64>) -> Self {
        match code {
            Some(1) => TransactionStatus::Success,
            Some(_) => TransactionStatus::Failure,
            None => TransactionStatus::Pending,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Failure => write!(f, "failure"),
            TransactionStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Recibo de transação reduzido ao que o fluxo de submissão precisa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub transaction_hash: TransactionHash,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    pub status: TransactionStatus,
}

impl ReceiptInfo {
    /// Monta um recibo a partir do código de status bruto
    pub fn from_status_code(
        transaction_hash: TransactionHash,
        block_number: Option<u64>,
        gas_used: Option<U256>,
        status: Option<u64>,
    ) -> Self {
        Self {
            transaction_hash,
            block_number,
            gas_used,
            status: TransactionStatus::from_code(status),
        }
    }
}
