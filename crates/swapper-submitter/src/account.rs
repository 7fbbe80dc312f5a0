use ethereum_types::Address;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{transaction::eip2718::TypedTransaction, Bytes, H256};
use serde::Deserialize;
use std::fmt;

use crate::errors::{Result, SwapError};

/// Chave privada em memória. Nunca aparece em `Debug`, `Display` ou logs.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Conta assinante derivada de uma chave secp256k1
#[derive(Clone)]
pub struct Account {
    wallet: LocalWallet,
}

impl Account {
    /// Interpreta a chave (32 bytes em hex, com ou sem `0x`)
    pub fn from_secret(secret: &SecretKey) -> Result<Self> {
        let wallet = secret
            .expose()
            .parse::<LocalWallet>()
            // a mensagem do parser não inclui a chave
            .map_err(|e| SwapError::Signing(format!("chave privada inválida: {}", e)))?;
        Ok(Self { wallet })
    }

    /// Garante que a chave corresponde ao remetente configurado
    pub fn ensure_address(&self, expected: Option<Address>) -> Result<()> {
        match expected {
            Some(addr) if addr != self.address() => Err(SwapError::Signing(format!(
                "chave não corresponde ao remetente configurado {:?}",
                addr
            ))),
            _ => Ok(()),
        }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Assina a transação e retorna os bytes RLP prontos para broadcast e o hash esperado
    pub fn sign(&self, tx: &TypedTransaction) -> Result<(Bytes, H256)> {
        let signature = self
            .wallet
            .sign_transaction_sync(tx)
            .map_err(|e| SwapError::Signing(e.to_string()))?;
        Ok((tx.rlp_signed(&signature), tx.hash(&signature)))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account").field("address", &self.address()).finish()
    }
}
