/*!
 * Swapper RPC
 *
 * Cliente RPC para interação com nodes EVM
 */

use swapper_core::{Error, error::Result, types::*};
use ethereum_types::{Address, U256};
use web3::{
    Web3,
    transports::{Http, WebSocket},
    types::{Bytes, BlockNumber, H256 as Web3H256, H160},
};
use std::future::Future;
use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Enum para diferentes tipos de transporte
pub enum TransportType {
    Http(Web3<Http>),
    WebSocket(Web3<WebSocket>),
}

/// Cliente RPC para nodes EVM
pub struct SwapperRpcClient {
    transport: TransportType,
    config: RpcConfig,
}

/// Separa falhas de transporte de rejeições explícitas do node
fn map_web3_error(context: &str, err: web3::Error) -> Error {
    match err {
        web3::Error::Rpc(rpc) => Error::RpcRejected(format!("{}: {}", context, rpc.message)),
        web3::Error::Decoder(msg) | web3::Error::InvalidResponse(msg) => {
            Error::DecodeError(format!("{}: {}", context, msg))
        }
        other => Error::RpcError(format!("{}: {}", context, other)),
    }
}

impl SwapperRpcClient {
    /// Cria um novo cliente RPC HTTP
    pub async fn new_http(config: RpcConfig) -> Result<Self> {
        let transport = Http::new(&config.endpoint)
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?;

        let client = Self {
            transport: TransportType::Http(Web3::new(transport)),
            config,
        };

        // Verifica a conexão
        client.get_block_number().await?;
        Ok(client)
    }

    /// Cria um novo cliente RPC WebSocket
    pub async fn new_websocket(config: RpcConfig) -> Result<Self> {
        let transport = WebSocket::new(&config.endpoint)
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via WebSocket: {}", e)))?;

        let client = Self {
            transport: TransportType::WebSocket(Web3::new(transport)),
            config,
        };

        // Verifica a conexão
        client.get_block_number().await?;
        Ok(client)
    }

    /// Cria um novo cliente baseado na URL
    pub async fn new(config: RpcConfig) -> Result<Self> {
        if config.endpoint.starts_with("ws") {
            Self::new_websocket(config).await
        } else {
            Self::new_http(config).await
        }
    }

    /// Executa uma chamada respeitando o timeout configurado
    async fn bounded<T, F>(&self, context: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, web3::Error>>,
    {
        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result.map_err(|e| map_web3_error(context, e)),
            Err(_) => Err(Error::TimeoutError(format!(
                "{}: sem resposta em {:?}",
                context, self.config.timeout
            ))),
        }
    }

    /// Obtém o nonce pendente de uma conta
    pub async fn get_transaction_count(&self, address: Address) -> Result<U256> {
        let address = H160::from_slice(address.as_bytes());
        let context = "Falha ao obter nonce da conta";
        match &self.transport {
            TransportType::Http(web3) => {
                self.bounded(context, web3.eth().transaction_count(address, Some(BlockNumber::Pending))).await
            }
            TransportType::WebSocket(web3) => {
                self.bounded(context, web3.eth().transaction_count(address, Some(BlockNumber::Pending))).await
            }
        }
    }

    /// Envia uma transação já assinada
    pub async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TransactionHash> {
        let context = "Falha ao enviar transação";
        let hash = match &self.transport {
            TransportType::Http(web3) => {
                self.bounded(context, web3.eth().send_raw_transaction(Bytes(raw))).await?
            }
            TransportType::WebSocket(web3) => {
                self.bounded(context, web3.eth().send_raw_transaction(Bytes(raw))).await?
            }
        };
        debug!("transação aceita pelo node: {:?}", hash);
        Ok(TransactionHash::from_slice(hash.as_bytes()))
    }

    /// Obtém o recibo de uma transação
    pub async fn get_transaction_receipt(&self, tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>> {
        let web3_hash = Web3H256::from_slice(tx_hash.as_bytes());
        let context = "Falha ao obter recibo da transação";

        let receipt = match &self.transport {
            TransportType::Http(web3) => {
                self.bounded(context, web3.eth().transaction_receipt(web3_hash)).await?
            }
            TransportType::WebSocket(web3) => {
                self.bounded(context, web3.eth().transaction_receipt(web3_hash)).await?
            }
        };

        Ok(receipt.map(|r| {
            ReceiptInfo::from_status_code(
                TransactionHash::from_slice(r.transaction_hash.as_bytes()),
                r.block_number.map(|n| n.as_u64()),
                r.gas_used,
                r.status.map(|s| s.as_u64()),
            )
        }))
    }

    /// Chama um método de contrato
    pub async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let call_request = web3::types::CallRequest {
            from: None,
            to: Some(H160::from_slice(to.as_bytes())),
            gas: None,
            gas_price: None,
            value: None,
            data: Some(Bytes(data)),
            transaction_type: None,
            access_list: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        };

        let context = "Falha na chamada RPC";
        let result = match &self.transport {
            TransportType::Http(web3) => {
                self.bounded(context, web3.eth().call(call_request, None)).await?
            }
            TransportType::WebSocket(web3) => {
                self.bounded(context, web3.eth().call(call_request, None)).await?
            }
        };

        Ok(result.0)
    }

    /// Obtém o chain id da rede
    pub async fn get_chain_id(&self) -> Result<u64> {
        let context = "Falha ao obter chain id";
        let chain_id = match &self.transport {
            TransportType::Http(web3) => self.bounded(context, web3.eth().chain_id()).await?,
            TransportType::WebSocket(web3) => self.bounded(context, web3.eth().chain_id()).await?,
        };
        Ok(chain_id.low_u64())
    }

    /// Obtém o número do bloco atual
    pub async fn get_block_number(&self) -> Result<u64> {
        let context = "Falha ao obter número do bloco";
        let block_number = match &self.transport {
            TransportType::Http(web3) => self.bounded(context, web3.eth().block_number()).await?,
            TransportType::WebSocket(web3) => self.bounded(context, web3.eth().block_number()).await?,
        };

        Ok(block_number.as_u64())
    }
}

/// Implementação da trait RpcProvider do swapper-core
#[async_trait]
impl swapper_core::traits::RpcProvider for SwapperRpcClient {
    async fn get_transaction_count(&self, address: Address) -> Result<U256> {
        self.get_transaction_count(address).await
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TransactionHash> {
        self.send_raw_transaction(raw).await
    }

    async fn get_transaction_receipt(&self, tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>> {
        self.get_transaction_receipt(tx_hash).await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        self.call(to, data).await
    }

    async fn get_chain_id(&self) -> Result<u64> {
        self.get_chain_id().await
    }

    async fn get_block_number(&self) -> Result<u64> {
        self.get_block_number().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_connectivity() {
        let mapped = map_web3_error("envio", web3::Error::Unreachable);
        assert!(mapped.is_connectivity());
    }
}
