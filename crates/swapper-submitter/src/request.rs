use ethereum_types::{Address, U256};
use rust_decimal::Decimal;
use swapper_core::{utils::parse_token_amount, NATIVE_DECIMALS};

use crate::errors::{Result, SwapError};
use crate::router::SwapCall;

/// Pedido de swap de moeda nativa por um token alvo.
///
/// `amount_out_min` é sempre zero: qualquer saída é aceita (sem proteção
/// contra slippage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub amount_in: U256,
    pub amount_out_min: U256,
    pub path: Vec<Address>,
    pub recipient: Address,
    pub deadline: u64,
}

impl SwapRequest {
    /// Monta o pedido. `now` é o timestamp unix da submissão, em segundos.
    pub fn new(
        amount: Decimal,
        sender: Address,
        wrapped_native: Address,
        target_token: Address,
        now: u64,
        deadline_secs: u64,
    ) -> Result<Self> {
        let deadline = now.checked_add(deadline_secs).ok_or_else(|| {
            SwapError::Config(format!("deadline_secs fora do intervalo: {}", deadline_secs))
        })?;
        Ok(Self {
            amount_in: native_to_wei(amount)?,
            amount_out_min: U256::zero(),
            path: vec![wrapped_native, target_token],
            recipient: sender,
            deadline,
        })
    }

    pub fn to_call(&self) -> SwapCall {
        SwapCall {
            amount_out_min: self.amount_out_min,
            path: self.path.clone(),
            recipient: self.recipient,
            deadline: U256::from(self.deadline),
        }
    }
}

/// Converte um valor decimal de moeda nativa para wei, sem arredondamento
pub fn native_to_wei(amount: Decimal) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SwapError::InvalidAmount(format!("valor negativo: {}", amount)));
    }
    let normalized = amount.normalize();
    if normalized.scale() > NATIVE_DECIMALS as u32 {
        return Err(SwapError::InvalidAmount(format!(
            "{} tem mais de {} casas decimais",
            amount, NATIVE_DECIMALS
        )));
    }
    parse_token_amount(&normalized.abs().to_string(), NATIVE_DECIMALS)
        .ok_or_else(|| SwapError::InvalidAmount(format!("valor não representável: {}", amount)))
}
