use dashmap::DashMap;
use ethereum_types::{Address, U256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swapper_core::{error::Result, traits::RpcProvider};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Tempo máximo em que o último nonce transmitido localmente prevalece sobre o node
pub const DEFAULT_FLOOR_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct AccountSlot {
    last_broadcast: Option<(U256, Instant)>,
}

/// Serializa a alocação de nonces por conta.
///
/// Uma conta só tem um envio em andamento por vez, da leitura do nonce até o
/// broadcast. O nonce do node é relido a cada reserva; o último nonce
/// transmitido localmente só é usado quando o node ainda não o reflete, e
/// apenas até `floor_ttl` após o broadcast ou até ser liberado com
/// [`release`](Self::release).
#[derive(Debug)]
pub struct NonceSequencer {
    slots: DashMap<Address, Arc<Mutex<AccountSlot>>>,
    floor_ttl: Duration,
}

/// Nonce reservado. Mantém a conta bloqueada até ser consumido ou descartado.
pub struct NonceGuard {
    slot: OwnedMutexGuard<AccountSlot>,
    account: Address,
    nonce: U256,
}

impl Default for NonceSequencer {
    fn default() -> Self {
        Self::with_floor_ttl(DEFAULT_FLOOR_TTL)
    }
}

impl NonceSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floor_ttl(floor_ttl: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            floor_ttl,
        }
    }

    fn slot(&self, account: Address) -> Arc<Mutex<AccountSlot>> {
        self.slots.entry(account).or_default().clone()
    }

    /// Bloqueia a conta e calcula o próximo nonce
    pub async fn reserve<P>(&self, provider: &P, account: Address) -> Result<NonceGuard>
    where
        P: RpcProvider + ?Sized,
    {
        let mut slot = self.slot(account).lock_owned().await;
        let from_node = provider.get_transaction_count(account).await?;
        let last_broadcast = slot.last_broadcast;
        let nonce = match last_broadcast {
            Some((last, _)) if last < from_node => {
                // node já refletiu o envio local
                slot.last_broadcast = None;
                from_node
            }
            Some((last, at)) if at.elapsed() < self.floor_ttl => {
                debug!("node atrasado para {:?}: node={} local={}", account, from_node, last + 1);
                last + 1
            }
            Some((last, _)) => {
                debug!("nonce local {} expirado para {:?}, usando o do node ({})", last, account, from_node);
                slot.last_broadcast = None;
                from_node
            }
            None => from_node,
        };
        Ok(NonceGuard { slot, account, nonce })
    }

    /// Descarta o nonce local de `account` se ele ainda for `nonce`.
    ///
    /// Usado quando a transação não teve recibo dentro do prazo: ela pode ter
    /// saído do mempool, e o próximo envio volta a seguir o node.
    pub async fn release(&self, account: Address, nonce: U256) {
        let slot = match self.slots.get(&account) {
            Some(entry) => entry.value().clone(),
            None => return,
        };
        let mut slot = slot.lock().await;
        if matches!(slot.last_broadcast, Some((last, _)) if last == nonce) {
            debug!("liberando nonce local {} de {:?}", nonce, account);
            slot.last_broadcast = None;
        }
    }
}

impl NonceGuard {
    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Registra que a transação com este nonce foi aceita pelo node
    pub fn commit(mut self) {
        self.slot.last_broadcast = Some((self.nonce, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use swapper_core::error::Error;
    use swapper_core::types::{ReceiptInfo, TransactionHash};

    /// Node que nunca enxerga transações pendentes
    struct LaggingNode {
        count: AtomicU64,
    }

    #[async_trait]
    impl RpcProvider for LaggingNode {
        async fn get_transaction_count(&self, _address: Address) -> Result<U256> {
            Ok(U256::from(self.count.load(Ordering::SeqCst)))
        }
        async fn send_raw_transaction(&self, _raw: Vec<u8>) -> Result<TransactionHash> {
            Err(Error::Other("unused".into()))
        }
        async fn get_transaction_receipt(&self, _tx_hash: TransactionHash) -> Result<Option<ReceiptInfo>> { Ok(None) }
        async fn call(&self, _to: Address, _data: Vec<u8>) -> Result<Vec<u8>> { Ok(vec![]) }
        async fn get_chain_id(&self) -> Result<u64> { Ok(1) }
        async fn get_block_number(&self) -> Result<u64> { Ok(0) }
    }

    #[tokio::test]
    async fn uses_node_nonce_first() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::new();
        let guard = seq.reserve(&node, Address::zero()).await.unwrap();
        assert_eq!(guard.nonce(), U256::from(5u64));
    }

    #[tokio::test]
    async fn committed_nonce_advances_past_lagging_node() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::new();
        seq.reserve(&node, Address::zero()).await.unwrap().commit();
        let second = seq.reserve(&node, Address::zero()).await.unwrap();
        assert_eq!(second.nonce(), U256::from(6u64));
    }

    #[tokio::test]
    async fn dropped_guard_does_not_advance() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::new();
        drop(seq.reserve(&node, Address::zero()).await.unwrap());
        let again = seq.reserve(&node, Address::zero()).await.unwrap();
        assert_eq!(again.nonce(), U256::from(5u64));
    }

    #[tokio::test]
    async fn node_ahead_wins() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::new();
        seq.reserve(&node, Address::zero()).await.unwrap().commit();
        node.count.store(9, Ordering::SeqCst);
        assert_eq!(seq.reserve(&node, Address::zero()).await.unwrap().nonce(), U256::from(9u64));
    }

    #[tokio::test]
    async fn released_nonce_follows_node_again() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::new();
        let guard = seq.reserve(&node, Address::zero()).await.unwrap();
        let nonce = guard.nonce();
        guard.commit();

        // outro nonce não libera
        seq.release(Address::zero(), U256::from(4u64)).await;
        assert_eq!(seq.reserve(&node, Address::zero()).await.unwrap().nonce(), U256::from(6u64));

        seq.release(Address::zero(), nonce).await;
        assert_eq!(seq.reserve(&node, Address::zero()).await.unwrap().nonce(), U256::from(5u64));
    }

    #[tokio::test]
    async fn local_floor_expires() {
        let node = LaggingNode { count: AtomicU64::new(5) };
        let seq = NonceSequencer::with_floor_ttl(Duration::ZERO);
        seq.reserve(&node, Address::zero()).await.unwrap().commit();
        seq.reserve(&node, Address::zero()).await.unwrap().commit();
        assert_eq!(seq.reserve(&node, Address::zero()).await.unwrap().nonce(), U256::from(5u64));
    }

    #[tokio::test]
    async fn accounts_are_independent() {
        let node = LaggingNode { count: AtomicU64::new(0) };
        let seq = NonceSequencer::new();
        let a = seq.reserve(&node, Address::repeat_byte(1)).await.unwrap();
        // outra conta não espera pelo guard de `a`
        let b = seq.reserve(&node, Address::repeat_byte(2)).await.unwrap();
        assert_eq!(a.account(), Address::repeat_byte(1));
        assert_eq!(b.nonce(), U256::zero());
    }
}
