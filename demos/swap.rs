//! Swap demo: submits an exact-input ETH -> token swap through the pipeline.
//!
//! Run with: cargo run --example swap
//!
//! Requires PROVIDER_URL, PRIVATE_KEY, CHAIN_ID, ROUTER_ADDRESS and
//! WETH_ADDRESS in the environment (or a .env file). TOKEN_OUT selects the
//! token to buy; AMOUNT_IN_ETH (default 0.01) is the ether amount to spend
//! and AMOUNT_OUT_MIN_WEI (default 0) the minimum acceptable output.

use ammswap_sdk::{constants, LocalSigner, NetworkConfig, SwapClient, SwapRequest, SwapStatus};
use alloy::primitives::{Address, U256};
use futures::{pin_mut, StreamExt};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = NetworkConfig::from_env()?;
    let signer = LocalSigner::from_env()?;
    let client = SwapClient::new(signer, config)?;

    let weth = client
        .config()
        .weth
        .ok_or_else(|| eyre::eyre!("WETH_ADDRESS must be set for the ETH-in demo"))?;
    let token_out: Address = std::env::var("TOKEN_OUT")
        .map_err(|_| eyre::eyre!("TOKEN_OUT must be set"))?
        .parse()?;
    let amount_in_eth: f64 = std::env::var("AMOUNT_IN_ETH")
        .unwrap_or_else(|_| "0.01".into())
        .parse()?;
    let amount_out_min: U256 = std::env::var("AMOUNT_OUT_MIN_WEI")
        .ok()
        .map(|v| v.parse())
        .transpose()?
        .unwrap_or(U256::ZERO);

    println!("Sender:  {}", client.address());
    println!("Router:  {}", client.config().router);
    println!("Swapping {amount_in_eth} ETH for {token_out}");

    let request = SwapRequest::eth_for_tokens(
        constants::scale_eth(amount_in_eth),
        vec![weth, token_out],
        client.address(),
    )
    .with_amount_out_min(amount_out_min);

    let events = client.swap_with_events(request).await?;
    pin_mut!(events);

    while let Some(status) = events.next().await {
        match status {
            SwapStatus::Pending(hash) => println!("Transaction hash: {hash}"),
            SwapStatus::Confirmed(receipt) => {
                println!(
                    "Transaction receipt:\n{}",
                    serde_json::to_string_pretty(&receipt)?
                );
            }
            SwapStatus::Failed(err) => {
                eprintln!("Transaction failed: {err}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
