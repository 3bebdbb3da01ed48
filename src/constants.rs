//! Constants and unit helpers for the swap pipeline
//!
//! Amounts cross the API as raw wei; the helpers here make every conversion
//! explicit at the call site.

use alloy::primitives::U256;
use std::time::Duration;

/// Native token uses 18 decimals
pub const ETH_DECIMALS: u8 = 18;

/// One gwei in wei
pub const GWEI: u128 = 1_000_000_000;

/// Default swap deadline horizon (20 minutes)
pub const DEFAULT_DEADLINE_SECS: u64 = 20 * 60;

/// Buffer added to the node's gas limit estimate
pub const GAS_LIMIT_BUFFER_PERCENT: u64 = 20;

/// Buffer added to the fetched gas price
pub const GAS_PRICE_BUFFER_PERCENT: u64 = 10;

/// A gas quote older than this must be re-fetched before building
pub const DEFAULT_QUOTE_MAX_AGE: Duration = Duration::from_secs(30);

/// Receipt polling cadence
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default bound on waiting for a confirmation
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(120);

/// Scale a floating point value to U256 with specified decimals
pub fn scale_to_decimals(value: f64, decimals: u8) -> U256 {
    let multiplier = 10u64.pow(decimals as u32);
    let scaled = (value * multiplier as f64) as u128;
    U256::from(scaled)
}

/// Scale an ether amount to wei (18 decimals)
pub fn scale_eth(amount: f64) -> U256 {
    scale_to_decimals(amount, ETH_DECIMALS)
}

/// Convert a gwei amount to wei
pub fn gwei(amount: u64) -> u128 {
    amount as u128 * GWEI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_eth() {
        // 1 ETH = 10^18 wei
        assert_eq!(scale_eth(1.0), U256::from(10u64).pow(U256::from(18u64)));
        // 0.5 ETH = 5 * 10^17 wei
        assert_eq!(scale_eth(0.5), U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn test_gwei() {
        // the classic 20 gwei gas price
        assert_eq!(gwei(20), 20_000_000_000u128);
        assert_eq!(gwei(1), GWEI);
    }
}
