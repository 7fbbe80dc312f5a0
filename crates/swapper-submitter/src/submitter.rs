use chrono::Utc;
use ethereum_types::{Address, U256};
use ethers::types::{transaction::eip2718::TypedTransaction, TransactionRequest};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use swapper_core::{
    traits::RpcProvider,
    types::{TransactionHash, TransactionStatus},
    utils::{format_address, format_h256},
};
use tracing::{debug, info, warn};

use crate::{
    account::Account,
    config::SwapperConfig,
    errors::{Result, SwapError},
    logger::{log_error, log_warn, report_outcome},
    nonce::NonceSequencer,
    outcome::SwapOutcome,
    request::{native_to_wei, SwapRequest},
    router::RouterContract,
};

/// Parâmetros fixos do fluxo de submissão.
///
/// Gas limit e gas price são fixos: não há estimativa dinâmica de taxa.
#[derive(Debug, Clone)]
pub struct SwapSettings {
    pub router: Address,
    pub wrapped_native: Address,
    pub target_token: Address,
    /// `None` consulta o node a cada submissão
    pub chain_id: Option<u64>,
    pub gas_limit: u64,
    pub gas_price_gwei: u64,
    pub deadline_secs: u64,
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl SwapSettings {
    pub fn gas_price(&self) -> U256 {
        U256::from(self.gas_price_gwei) * U256::exp10(9)
    }

    pub fn path(&self) -> Vec<Address> {
        vec![self.wrapped_native, self.target_token]
    }
}

/// Submete swaps de moeda nativa por um token via router V2
pub struct SwapSubmitter<P> {
    provider: P,
    account: Account,
    router: RouterContract,
    settings: SwapSettings,
    sequencer: Arc<NonceSequencer>,
}

impl<P: RpcProvider> SwapSubmitter<P> {
    /// Cria o submitter. A chave é validada aqui, antes de qualquer chamada de rede.
    pub fn new(provider: P, config: &SwapperConfig, sequencer: Arc<NonceSequencer>) -> Result<Self> {
        Ok(Self::with_account(provider, config.account()?, config.settings(), sequencer))
    }

    pub fn with_account(
        provider: P,
        account: Account,
        settings: SwapSettings,
        sequencer: Arc<NonceSequencer>,
    ) -> Self {
        Self {
            router: RouterContract::new(settings.router),
            provider,
            account,
            settings,
            sequencer,
        }
    }

    pub fn address(&self) -> Address {
        self.account.address()
    }

    pub fn settings(&self) -> &SwapSettings {
        &self.settings
    }

    /// Monta o pedido com prazo relativo ao instante atual
    pub fn request(&self, amount: Decimal) -> Result<SwapRequest> {
        let now = Utc::now().timestamp().max(0) as u64;
        SwapRequest::new(
            amount,
            self.address(),
            self.settings.wrapped_native,
            self.settings.target_token,
            now,
            self.settings.deadline_secs,
        )
    }

    /// Transação legacy não assinada para o pedido
    pub fn build_transaction(&self, request: &SwapRequest, nonce: U256, chain_id: u64) -> Result<TypedTransaction> {
        let data = self.router.encode_swap_exact_eth_for_tokens(&request.to_call())?;
        let tx = TransactionRequest::new()
            .from(self.address())
            .to(self.router.address)
            .value(request.amount_in)
            .data(data)
            .gas(self.settings.gas_limit)
            .gas_price(self.settings.gas_price())
            .nonce(nonce)
            .chain_id(chain_id);
        Ok(tx.into())
    }

    async fn chain_id(&self) -> Result<u64> {
        match self.settings.chain_id {
            Some(id) => Ok(id),
            None => Ok(self.provider.get_chain_id().await?),
        }
    }

    /// Saída esperada no router para `amount` (informativo, não altera o mínimo de saída)
    pub async fn quote(&self, amount: Decimal) -> Result<U256> {
        let amount_in = native_to_wei(amount)?;
        let amounts = self
            .router
            .get_amounts_out(&self.provider, amount_in, &self.settings.path())
            .await?;
        amounts
            .last()
            .copied()
            .ok_or_else(|| SwapError::Encoding("getAmountsOut sem valores".into()))
    }

    /// Compra o token alvo gastando `amount` de moeda nativa
    pub async fn submit_swap(&self, amount: Decimal) -> Result<SwapOutcome> {
        self.submit_swap_with_cancel(amount, std::future::pending::<()>()).await
    }

    /// Igual a [`submit_swap`](Self::submit_swap), mas a espera pelo recibo
    /// termina em `Cancelled` quando `cancel` completa
    pub async fn submit_swap_with_cancel<C>(&self, amount: Decimal, cancel: C) -> Result<SwapOutcome>
    where
        C: Future<Output = ()>,
    {
        let request = self.request(amount)?;
        let chain_id = self.chain_id().await?;

        let (tx_hash, nonce) = match self.broadcast(&request, chain_id).await {
            Ok(sent) => sent,
            Err(e) => {
                log_error(&format!("swap não transmitido: {}", e));
                return Err(e);
            }
        };

        let outcome = self.wait_for_receipt(tx_hash, request.amount_in, cancel).await?;
        if let SwapOutcome::ConfirmationTimeout { .. } = outcome {
            // a transação pode ter saído do mempool; o próximo envio volta a seguir o node
            self.sequencer.release(self.address(), nonce).await;
        }
        report_outcome(&outcome);
        Ok(outcome)
    }

    /// Reserva o nonce, assina e transmite. A conta fica bloqueada só até o broadcast.
    async fn broadcast(&self, request: &SwapRequest, chain_id: u64) -> Result<(TransactionHash, U256)> {
        let reservation = self.sequencer.reserve(&self.provider, self.address()).await?;
        let nonce = reservation.nonce();

        let tx = self.build_transaction(request, nonce, chain_id)?;
        let (raw, local_hash) = self.account.sign(&tx)?;

        let tx_hash = self
            .provider
            .send_raw_transaction(raw.to_vec())
            .await
            .map_err(SwapError::from_broadcast)?;
        reservation.commit();

        if tx_hash != local_hash {
            warn!(
                "hash retornado pelo node difere do calculado: {} != {}",
                format_h256(&tx_hash),
                format_h256(&local_hash)
            );
        }
        info!(
            "transação enviada: {} (nonce {}, remetente {})",
            format_h256(&tx_hash),
            nonce,
            format_address(&self.address())
        );
        Ok((tx_hash, nonce))
    }

    /// Consulta o recibo até obter status, estourar o prazo ou `cancel` completar
    pub async fn wait_for_receipt<C>(&self, tx_hash: TransactionHash, amount_in: U256, cancel: C) -> Result<SwapOutcome>
    where
        C: Future<Output = ()>,
    {
        let deadline = tokio::time::sleep(self.settings.receipt_timeout);
        tokio::pin!(deadline);
        tokio::pin!(cancel);

        loop {
            let polled = tokio::select! {
                biased;
                _ = &mut cancel => return Ok(SwapOutcome::Cancelled { tx_hash }),
                _ = &mut deadline => return Ok(SwapOutcome::ConfirmationTimeout { tx_hash }),
                r = self.provider.get_transaction_receipt(tx_hash) => r,
            };

            match polled {
                Ok(Some(receipt)) => match receipt.status {
                    TransactionStatus::Success => {
                        return Ok(SwapOutcome::Confirmed {
                            tx_hash,
                            amount_in,
                            block_number: receipt.block_number,
                            gas_used: receipt.gas_used,
                        })
                    }
                    TransactionStatus::Failure => {
                        return Ok(SwapOutcome::Reverted {
                            tx_hash,
                            block_number: receipt.block_number,
                            gas_used: receipt.gas_used,
                        })
                    }
                    // recibo sem campo status: continua até o prazo
                    TransactionStatus::Pending => debug!("recibo sem status para {}", format_h256(&tx_hash)),
                },
                Ok(None) => debug!("recibo ainda indisponível para {}", format_h256(&tx_hash)),
                Err(e) => {
                    // a transação já foi transmitida; falhas aqui não a desfazem
                    warn!("falha ao consultar recibo de {}: {}", format_h256(&tx_hash), e);
                    log_warn(&format!("falha ao consultar recibo: {}", e));
                }
            }

            tokio::select! {
                biased;
                _ = &mut cancel => return Ok(SwapOutcome::Cancelled { tx_hash }),
                _ = &mut deadline => return Ok(SwapOutcome::ConfirmationTimeout { tx_hash }),
                _ = tokio::time::sleep(self.settings.receipt_poll_interval) => {}
            }
        }
    }

    /// Adição de liquidez ao par. Sem implementação: sempre falha.
    pub async fn add_liquidity(&self, amount_native: Decimal, amount_token: Decimal) -> Result<SwapOutcome> {
        warn!(
            "add_liquidity chamado ({} nativo, {} token) mas não está implementado",
            amount_native, amount_token
        );
        Err(SwapError::NotImplemented("add_liquidity"))
    }
}
