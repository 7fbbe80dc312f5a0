use config::{Config, Environment, File, FileFormat};
use ethereum_types::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use swapper_core::utils::hex_to_address;
use swapper_rpc::RpcConfig;

use crate::account::{Account, SecretKey};
use crate::errors::{Result, SwapError};
use crate::submitter::SwapSettings;

/// Prefixo das variáveis de ambiente
pub const ENV_PREFIX: &str = "SWAPPER";

/// Redes com valores padrão conhecidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Bsc,
    BscTestnet,
    Localhost,
}

/// Valores padrão de uma rede
#[derive(Debug, Clone, Copy)]
pub struct NetworkPreset {
    /// `None` quando o chain id deve ser consultado no node
    pub chain_id: Option<u64>,
    pub rpc_url: &'static str,
    pub router: Option<&'static str>,
    pub wrapped_native: Option<&'static str>,
    pub native_symbol: &'static str,
}

impl Network {
    pub fn preset(&self) -> NetworkPreset {
        match self {
            Network::Bsc => NetworkPreset {
                chain_id: Some(56),
                rpc_url: "https://bsc-dataseed.binance.org",
                // PancakeSwap V2
                router: Some("0x10ED43C718714eb63d5aA57B78B54704E256024E"),
                wrapped_native: Some("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
                native_symbol: "BNB",
            },
            Network::BscTestnet => NetworkPreset {
                chain_id: Some(97),
                rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545",
                router: Some("0xD99D1c33F9fC3444f8101754aBC46c52416550D1"),
                wrapped_native: Some("0xae13d989daC2f0dEbFf460aC112a837C89BAa7cd"),
                native_symbol: "tBNB",
            },
            Network::Localhost => NetworkPreset {
                chain_id: None,
                rpc_url: "http://localhost:8545",
                router: None,
                wrapped_native: None,
                native_symbol: "ETH",
            },
        }
    }
}

impl FromStr for Network {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bsc" | "bsc-mainnet" => Ok(Network::Bsc),
            "bsc-testnet" | "bsc_testnet" => Ok(Network::BscTestnet),
            "localhost" | "local" => Ok(Network::Localhost),
            other => Err(SwapError::Config(format!("rede desconhecida: {}", other))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    network: String,
    rpc_url: Option<String>,
    private_key: Option<SecretKey>,
    private_key_file: Option<String>,
    sender: Option<String>,
    chain_id: Option<u64>,
    router: Option<String>,
    wrapped_native: Option<String>,
    target_token: Option<String>,
    gas_limit: u64,
    gas_price_gwei: u64,
    deadline_secs: u64,
    receipt_timeout_secs: u64,
    receipt_poll_interval_ms: u64,
    rpc_timeout_secs: u64,
}

/// Configuração completa do submitter.
///
/// Fontes, da menor para a maior precedência: padrões da rede, arquivo
/// `swapper.toml` (opcional) e variáveis `SWAPPER_*`.
#[derive(Debug, Clone)]
pub struct SwapperConfig {
    pub network: Network,
    pub rpc_url: String,
    pub private_key: SecretKey,
    pub sender: Option<Address>,
    pub chain_id: Option<u64>,
    pub router: Address,
    pub wrapped_native: Address,
    pub target_token: Address,
    pub gas_limit: u64,
    pub gas_price_gwei: u64,
    pub deadline_secs: u64,
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
    pub rpc_timeout: Duration,
}

fn parse_address(field: &str, value: Option<String>) -> Result<Option<Address>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => hex_to_address(v.trim())
            .map(Some)
            .ok_or_else(|| SwapError::Config(format!("{} não é um endereço válido: {}", field, v))),
    }
}

fn required(field: &str, value: Option<Address>) -> Result<Address> {
    value.ok_or_else(|| SwapError::Config(format!("{} não configurado", field)))
}

impl SwapperConfig {
    /// Carrega `.env`, `swapper.toml` e o ambiente do processo
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_sources(Some(Path::new("swapper.toml")), None)
    }

    /// Carrega a partir de um arquivo opcional e, se informado, de um mapa no
    /// lugar das variáveis de ambiente do processo
    pub fn from_sources(file: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("network", "bsc")?
            .set_default("gas_limit", 2_000_000i64)?
            .set_default("gas_price_gwei", 5i64)?
            .set_default("deadline_secs", 600i64)?
            .set_default("receipt_timeout_secs", 120i64)?
            .set_default("receipt_poll_interval_ms", 2_000i64)?
            .set_default("rpc_timeout_secs", 30i64)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let mut environment = Environment::with_prefix(ENV_PREFIX);
        if let Some(vars) = env {
            environment = environment.source(Some(vars.into_iter().collect()));
        }

        let raw: RawConfig = builder.add_source(environment).build()?.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let network = Network::from_str(&raw.network)?;
        let preset = network.preset();

        let private_key = match (raw.private_key, raw.private_key_file) {
            (Some(key), _) => key,
            (None, Some(path)) => {
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    SwapError::Config(format!("falha ao ler arquivo da chave {}: {}", path, e))
                })?;
                SecretKey::new(contents)
            }
            (None, None) => {
                return Err(SwapError::Config(
                    "private_key ou private_key_file não configurado".into(),
                ))
            }
        };

        let router = parse_address("router", raw.router.or(preset.router.map(String::from)))?;
        let wrapped_native = parse_address(
            "wrapped_native",
            raw.wrapped_native.or(preset.wrapped_native.map(String::from)),
        )?;

        if raw.receipt_poll_interval_ms == 0 {
            return Err(SwapError::Config("receipt_poll_interval_ms deve ser maior que zero".into()));
        }

        Ok(Self {
            network,
            rpc_url: raw.rpc_url.unwrap_or_else(|| preset.rpc_url.to_string()),
            private_key,
            sender: parse_address("sender", raw.sender)?,
            chain_id: raw.chain_id.or(preset.chain_id),
            router: required("router", router)?,
            wrapped_native: required("wrapped_native", wrapped_native)?,
            target_token: required("target_token", parse_address("target_token", raw.target_token)?)?,
            gas_limit: raw.gas_limit,
            gas_price_gwei: raw.gas_price_gwei,
            deadline_secs: raw.deadline_secs,
            receipt_timeout: Duration::from_secs(raw.receipt_timeout_secs),
            receipt_poll_interval: Duration::from_millis(raw.receipt_poll_interval_ms),
            rpc_timeout: Duration::from_secs(raw.rpc_timeout_secs),
        })
    }

    /// Conta assinante, validada contra `sender` sem acessar a rede
    pub fn account(&self) -> Result<Account> {
        let account = Account::from_secret(&self.private_key)?;
        account.ensure_address(self.sender)?;
        Ok(account)
    }

    /// Parâmetros do fluxo de submissão
    pub fn settings(&self) -> SwapSettings {
        SwapSettings {
            router: self.router,
            wrapped_native: self.wrapped_native,
            target_token: self.target_token,
            chain_id: self.chain_id,
            gas_limit: self.gas_limit,
            gas_price_gwei: self.gas_price_gwei,
            deadline_secs: self.deadline_secs,
            receipt_timeout: self.receipt_timeout,
            receipt_poll_interval: self.receipt_poll_interval,
        }
    }

    /// Configuração do cliente RPC
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            endpoint: self.rpc_url.clone(),
            timeout: self.rpc_timeout,
        }
    }
}
