//! Constants and unit conversion for ERC-20 amounts

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{address, Address, U256};
use eyre::{ensure, Context, Result};

/// Fractional digits used when converting human-readable transfer amounts
pub const TOKEN_DECIMALS: u8 = 18;

/// Account credited by `mint` unless the configuration says otherwise
pub const DEFAULT_MINT_RECIPIENT: Address = address!("7535f6Eceaa4E8B40dD450f7eB1B91bd5Ca01c98");

/// Shown in place of values that have not been loaded yet
pub const PLACEHOLDER: &str = "-";

/// Default interval between `Transfer` log polls (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// Scale a human-readable decimal string (e.g. "1.5") to base units
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    ensure!(!amount.is_empty(), "Amount must not be empty");
    ensure!(!amount.starts_with('-'), "Amount must not be negative: {}", amount);

    let parsed = parse_units(amount, decimals)
        .with_context(|| format!("Invalid token amount: {}", amount))?;
    Ok(parsed.get_absolute())
}

/// Parse a raw base-unit integer, decimal or `0x`-prefixed hex
pub fn parse_raw_amount(value: &str) -> Result<U256> {
    let value = value.trim();
    ensure!(!value.is_empty(), "Amount must not be empty");

    value
        .parse::<U256>()
        .with_context(|| format!("Invalid raw amount: {}", value))
}

/// Unscale base units back to a decimal string
pub fn format_token_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}
