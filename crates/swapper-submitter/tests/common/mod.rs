#![allow(dead_code)]

use async_trait::async_trait;
use ethereum_types::{Address, U256};
use ethers::types::Transaction;
use ethers::utils::keccak256;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swapper_core::{
    error::{Error, Result},
    traits::RpcProvider,
    types::{ReceiptInfo, TransactionHash},
};
use swapper_submitter::{Account, NonceSequencer, SecretKey, SwapSettings, SwapSubmitter};

// conta #0 do anvil
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// Comportamento do node ao ser consultado pelo recibo
#[derive(Debug, Clone, Copy)]
pub enum ReceiptMode {
    /// recibo imediato com o status dado
    Status(u64),
    /// nunca minerada
    Never,
    /// recibo sem campo status
    NoStatus,
    /// `None` nas primeiras `n` consultas
    AfterPolls(usize, u64),
    /// erro de transporte nas primeiras `n` consultas
    FailThen(usize, u64),
}

/// Node em memória que registra as chamadas recebidas
pub struct MockNode {
    pending: AtomicU64,
    advance_on_send: bool,
    count_delay: Duration,
    fail_count: bool,
    reject_count: bool,
    reject: Mutex<Option<String>>,
    receipt: ReceiptMode,
    chain_id: u64,
    amounts_out: Vec<U256>,
    pub sent: Mutex<Vec<Vec<u8>>>,
    pub calls: AtomicUsize,
    pub receipt_polls: AtomicUsize,
    pub chain_id_calls: AtomicUsize,
}

impl MockNode {
    pub fn new(pending: u64) -> Self {
        Self {
            pending: AtomicU64::new(pending),
            advance_on_send: false,
            count_delay: Duration::ZERO,
            fail_count: false,
            reject_count: false,
            reject: Mutex::new(None),
            receipt: ReceiptMode::Status(1),
            chain_id: 56,
            amounts_out: Vec::new(),
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            receipt_polls: AtomicUsize::new(0),
            chain_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn receipt(mut self, mode: ReceiptMode) -> Self {
        self.receipt = mode;
        self
    }

    /// Contagem pendente acompanha os envios aceitos
    pub fn advancing(mut self) -> Self {
        self.advance_on_send = true;
        self
    }

    pub fn slow_nonce(mut self, delay: Duration) -> Self {
        self.count_delay = delay;
        self
    }

    pub fn unreachable_nonce(mut self) -> Self {
        self.fail_count = true;
        self
    }

    /// Node responde a `eth_getTransactionCount` com erro JSON-RPC
    pub fn rejecting_nonce(mut self) -> Self {
        self.reject_count = true;
        self
    }

    pub fn chain_id(mut self, id: u64) -> Self {
        self.chain_id = id;
        self
    }

    pub fn amounts_out(mut self, amounts: Vec<U256>) -> Self {
        self.amounts_out = amounts;
        self
    }

    pub fn set_reject(&self, reason: Option<&str>) {
        *self.reject.lock() = reason.map(String::from);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transações transmitidas, na ordem de chegada
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent.lock().iter().map(|raw| decode_raw(raw)).collect()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn decode_raw(raw: &[u8]) -> Transaction {
    rlp::decode::<Transaction>(raw).expect("transação RLP válida")
}

#[async_trait]
impl RpcProvider for MockNode {
    async fn get_transaction_count(&self, _address: Address) -> Result<U256> {
        self.touch();
        if !self.count_delay.is_zero() {
            tokio::time::sleep(self.count_delay).await;
        }
        if self.fail_count {
            return Err(Error::RpcError("connection refused".into()));
        }
        if self.reject_count {
            return Err(Error::RpcRejected("method not available".into()));
        }
        Ok(U256::from(self.pending.load(Ordering::SeqCst)))
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<TransactionHash> {
        self.touch();
        let hash = TransactionHash::from(keccak256(&raw));
        self.sent.lock().push(raw);
        if let Some(reason) = self.reject.lock().clone() {
            return Err(Error::RpcRejected(reason));
        }
        if self.advance_on_send {
            self.pending.fetch_add(1, Ordering::SeqCst);
        }
        Ok(hash)
    }

    async fn get_transaction_receipt(&self, tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>> {
        self.touch();
        let poll = self.receipt_polls.fetch_add(1, Ordering::SeqCst);
        let mined = |status: Option<u64>| {
            Some(ReceiptInfo::from_status_code(tx_hash, Some(42), Some(U256::from(120_000u64)), status))
        };
        match self.receipt {
            ReceiptMode::Status(code) => Ok(mined(Some(code))),
            ReceiptMode::Never => Ok(None),
            ReceiptMode::NoStatus => Ok(mined(None)),
            ReceiptMode::AfterPolls(n, code) if poll >= n => Ok(mined(Some(code))),
            ReceiptMode::AfterPolls(..) => Ok(None),
            ReceiptMode::FailThen(n, code) if poll >= n => Ok(mined(Some(code))),
            ReceiptMode::FailThen(..) => Err(Error::TimeoutError("eth_getTransactionReceipt".into())),
        }
    }

    async fn call(&self, _to: Address, _data: Vec<u8>) -> Result<Vec<u8>> {
        self.touch();
        let tokens = self.amounts_out.iter().map(|a| ethers::abi::Token::Uint(*a)).collect();
        Ok(ethers::abi::encode(&[ethers::abi::Token::Array(tokens)]))
    }

    async fn get_chain_id(&self) -> Result<u64> {
        self.touch();
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain_id)
    }

    async fn get_block_number(&self) -> Result<u64> {
        self.touch();
        Ok(42)
    }
}

pub fn router() -> Address {
    Address::repeat_byte(0x05)
}

pub fn wrapped_native() -> Address {
    Address::repeat_byte(0xbb)
}

pub fn target_token() -> Address {
    Address::repeat_byte(0xcd)
}

pub fn settings() -> SwapSettings {
    SwapSettings {
        router: router(),
        wrapped_native: wrapped_native(),
        target_token: target_token(),
        chain_id: Some(56),
        gas_limit: 2_000_000,
        gas_price_gwei: 5,
        deadline_secs: 600,
        receipt_timeout: Duration::from_millis(300),
        receipt_poll_interval: Duration::from_millis(10),
    }
}

pub fn submitter_with(
    node: Arc<MockNode>,
    settings: SwapSettings,
    sequencer: Arc<NonceSequencer>,
) -> SwapSubmitter<Arc<MockNode>> {
    let account = Account::from_secret(&SecretKey::new(TEST_KEY)).unwrap();
    SwapSubmitter::with_account(node, account, settings, sequencer)
}

pub fn submitter(node: Arc<MockNode>) -> SwapSubmitter<Arc<MockNode>> {
    submitter_with(node, settings(), Arc::new(NonceSequencer::new()))
}
