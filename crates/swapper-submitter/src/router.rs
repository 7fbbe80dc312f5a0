use ethereum_types::{Address, U256};
use ethers::abi::{AbiParser, Function, Token};
use serde::{Deserialize, Serialize};
use swapper_core::traits::RpcProvider;

use crate::errors::{Result, SwapError};

const SWAP_EXACT_ETH_FOR_TOKENS: &str = "swapExactETHForTokens(uint256,address[],address,uint256)";
const GET_AMOUNTS_OUT: &str = "getAmountsOut(uint256,address[]) view returns (uint256[])";

/// Argumentos de `swapExactETHForTokens`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCall {
    pub amount_out_min: U256,
    pub path: Vec<Address>,
    pub recipient: Address,
    pub deadline: U256,
}

fn parse(signature: &str) -> Result<Function> {
    AbiParser::default()
        .parse_function(signature)
        .map_err(|e| SwapError::Encoding(format!("abi inválida `{}`: {}", signature, e)))
}

/// Router compatível com Uniswap V2 (PancakeSwap, SushiSwap...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterContract {
    pub address: Address,
}

impl RouterContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Seletor de 4 bytes de `swapExactETHForTokens`
    pub fn swap_selector() -> Result<[u8; 4]> {
        Ok(parse(SWAP_EXACT_ETH_FOR_TOKENS)?.short_signature())
    }

    /// Codifica a chamada de swap com valor nativo
    pub fn encode_swap_exact_eth_for_tokens(&self, call: &SwapCall) -> Result<Vec<u8>> {
        let function = parse(SWAP_EXACT_ETH_FOR_TOKENS)?;
        let path = call.path.iter().copied().map(Token::Address).collect();
        Ok(function.encode_input(&[
            Token::Uint(call.amount_out_min),
            Token::Array(path),
            Token::Address(call.recipient),
            Token::Uint(call.deadline),
        ])?)
    }

    /// Decodifica a chamada de swap; `None` se o seletor ou os dados não conferem
    pub fn decode_swap_exact_eth_for_tokens(data: &[u8]) -> Option<SwapCall> {
        let function = parse(SWAP_EXACT_ETH_FOR_TOKENS).ok()?;
        if data.len() < 4 || data[..4] != function.short_signature() {
            return None;
        }
        let tokens = function.decode_input(&data[4..]).ok()?;
        let mut tokens = tokens.into_iter();
        let amount_out_min = tokens.next()?.into_uint()?;
        let path = tokens
            .next()?
            .into_array()?
            .into_iter()
            .map(Token::into_address)
            .collect::<Option<Vec<_>>>()?;
        let recipient = tokens.next()?.into_address()?;
        let deadline = tokens.next()?.into_uint()?;
        Some(SwapCall {
            amount_out_min,
            path,
            recipient,
            deadline,
        })
    }

    /// Consulta `getAmountsOut` via eth_call (somente leitura)
    pub async fn get_amounts_out<P>(&self, provider: &P, amount_in: U256, path: &[Address]) -> Result<Vec<U256>>
    where
        P: RpcProvider + ?Sized,
    {
        let function = parse(GET_AMOUNTS_OUT)?;
        let data = function.encode_input(&[
            Token::Uint(amount_in),
            Token::Array(path.iter().copied().map(Token::Address).collect()),
        ])?;
        let out = provider.call(self.address, data).await?;
        let tokens = function.decode_output(&out)?;
        tokens
            .into_iter()
            .next()
            .and_then(Token::into_array)
            .map(|values| values.into_iter().filter_map(Token::into_uint).collect())
            .ok_or_else(|| SwapError::Encoding("resposta inesperada de getAmountsOut".into()))
    }
}
