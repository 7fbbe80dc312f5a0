/*!
 * Swapper Traits
 *
 * Traits comuns usados em toda a workspace Swapper
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{ReceiptInfo, TransactionHash};
use ethereum_types::{Address, U256};

/// Trait para provedores RPC
#[async_trait]
pub trait RpcProvider: Send + Sync {
    /// Obtém a contagem de transações (nonce) de uma conta, incluindo pendentes
    async fn get_transaction_count(&self, address: Address) -> Result<U256>;

    /// Envia uma transação assinada e retorna o hash
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TransactionHash>;

    /// Obtém o recibo de uma transação; `None` enquanto não minerada
    async fn get_transaction_receipt(&self, tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>>;

    /// Chama um método de contrato (eth_call)
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;

    /// Obtém o chain id da rede
    async fn get_chain_id(&self) -> Result<u64>;

    /// Obtém o número do bloco atual
    async fn get_block_number(&self) -> Result<u64>;
}

#[async_trait]
impl<P: RpcProvider + ?Sized> RpcProvider for std::sync::Arc<P> {
    async fn get_transaction_count(&self, address: Address) -> Result<U256> {
        (**self).get_transaction_count(address).await
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TransactionHash> {
        (**self).send_raw_transaction(raw).await
    }

    async fn get_transaction_receipt(&self, tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>> {
        (**self).get_transaction_receipt(tx_hash).await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        (**self).call(to, data).await
    }

    async fn get_chain_id(&self) -> Result<u64> {
        (**self).get_chain_id().await
    }

    async fn get_block_number(&self) -> Result<u64> {
        (**self).get_block_number().await
    }
}
