/*!
 * Swapper Submitter
 *
 * Compra de tokens com moeda nativa em routers compatíveis com Uniswap V2:
 * montagem da chamada `swapExactETHForTokens`, sequenciamento de nonce por
 * conta, assinatura local, broadcast e espera limitada pelo recibo
 */

pub mod account;
pub mod config;
pub mod errors;
mod logger;
pub mod nonce;
pub mod outcome;
pub mod request;
pub mod router;
pub mod submitter;

// Re-exportações públicas
pub use account::{Account, SecretKey};
pub use config::{Network, NetworkPreset, SwapperConfig};
pub use errors::{Result, SwapError};
pub use nonce::{NonceGuard, NonceSequencer};
pub use outcome::SwapOutcome;
pub use request::{native_to_wei, SwapRequest};
pub use router::{RouterContract, SwapCall};
pub use submitter::{SwapSettings, SwapSubmitter};
