use std::env;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use swapper_core::{utils::{format_address, format_token_amount}, NATIVE_DECIMALS};
use swapper_rpc::SwapperRpcClient;
use swapper_submitter::{NonceSequencer, SwapSubmitter, SwapperConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(raw_amount) = args.first() else {
        eprintln!("Uso: swap_native <VALOR_NATIVO> [--add-liquidity]");
        std::process::exit(2);
    };
    let amount = Decimal::from_str(raw_amount).context("valor inválido")?;

    let config = SwapperConfig::load().context("falha ao carregar configuração")?;
    let preset = config.network.preset();
    info!("rede {:?} via {}", config.network, config.rpc_url);

    // chave validada antes de qualquer chamada ao node
    let account = config.account()?;

    let client = SwapperRpcClient::new(config.rpc_config()).await?;
    let submitter = SwapSubmitter::with_account(client, account, config.settings(), Arc::new(NonceSequencer::new()));
    info!("remetente {}", format_address(&submitter.address()));

    if args.iter().any(|a| a == "--add-liquidity") {
        submitter.add_liquidity(amount, Decimal::ZERO).await?;
        return Ok(());
    }

    match submitter.quote(amount).await {
        Ok(out) => info!(
            "cotação: {} {} -> {} unidades do token",
            amount, preset.native_symbol, out
        ),
        Err(e) => warn!("cotação indisponível: {}", e),
    }

    let outcome = submitter.submit_swap(amount).await?;
    println!("{}", outcome);
    if let swapper_submitter::SwapOutcome::Confirmed { amount_in, .. } = &outcome {
        println!("gasto: {} {}", format_token_amount(amount_in, NATIVE_DECIMALS), preset.native_symbol);
    }
    Ok(())
}
