/*!
 * Swapper Utils
 *
 * Utilitários comuns usados em toda a workspace Swapper
 */

use ethereum_types::{Address, H256, U256};
use std::str::FromStr;

/// Converte uma string hexadecimal para Address
pub fn hex_to_address(hex: &str) -> Option<Address> {
    let hex_str = hex.strip_prefix("0x").unwrap_or(hex);
    Address::from_str(hex_str).ok()
}

/// Formata um Address para exibição
pub fn format_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

/// Formata um H256 para exibição
pub fn format_h256(hash: &H256) -> String {
    format!("0x{:x}", hash)
}

/// Formata um valor com decimais para exibição
pub fn format_token_amount(amount: &U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let integer_part = amount / divisor;
    let fractional_part = amount % divisor;

    // Parte fracionária com zeros à esquerda
    let fractional_str = fractional_part.to_string();
    let padding = decimals as usize - fractional_str.len();
    let mut padded_fractional = "0".repeat(padding);
    padded_fractional.push_str(&fractional_str);

    let trimmed = padded_fractional.trim_end_matches('0');
    if trimmed.is_empty() {
        integer_part.to_string()
    } else {
        format!("{}.{}", integer_part, trimmed)
    }
}

/// Converte um valor decimal (ex: "0.1") para a menor unidade, sem perda.
///
/// Retorna `None` para valores negativos, texto inválido, overflow ou mais
/// casas fracionárias do que `decimals` permite.
pub fn parse_token_amount(decimal: &str, decimals: u8) -> Option<U256> {
    let decimal = decimal.trim();
    let (integer, fraction) = match decimal.split_once('.') {
        Some((i, f)) => (i, f),
        None => (decimal, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    // Zeros à direita não alteram o valor
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return None;
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(if integer.is_empty() { "0" } else { integer });
    digits.push_str(fraction);
    digits.push_str(&"0".repeat(decimals as usize - fraction.len()));

    U256::from_dec_str(&digits).ok()
}
