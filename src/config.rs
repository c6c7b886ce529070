//! Session configuration for the ERC-20 session

use crate::constants::{DEFAULT_MINT_RECIPIENT, DEFAULT_POLL_INTERVAL_MS, TOKEN_DECIMALS};
use alloy::primitives::Address;
use eyre::{Context, Result};
use std::time::Duration;

/// Configuration for a token session: the RPC endpoint plus the knobs the actions use
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// RPC endpoint URL (node or wallet-served)
    pub rpc_url: String,
    /// Fractional digits applied to human-readable transfer amounts
    pub token_decimals: u8,
    /// Account credited by `mint`
    pub mint_recipient: Address,
    /// Interval between `Transfer` log polls
    pub poll_interval: Duration,
    /// Token to load on startup (optional)
    pub token: Option<Address>,
}

impl SessionConfig {
    /// Create a configuration for the given RPC endpoint with default settings
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            token_decimals: TOKEN_DECIMALS,
            mint_recipient: DEFAULT_MINT_RECIPIENT,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            token: None,
        }
    }

    /// Build configuration from environment variables
    ///
    /// * `TOKEN_RPC_URL` - RPC endpoint (required)
    /// * `TOKEN_MINT_RECIPIENT` - mint recipient override
    /// * `TOKEN_POLL_INTERVAL_MS` - transfer poll interval override
    /// * `TOKEN_ADDRESS` - token to load on startup
    pub fn from_env() -> Result<Self> {
        let rpc_url = std::env::var("TOKEN_RPC_URL")
            .context("TOKEN_RPC_URL environment variable must be set")?;
        let mut config = Self::new(rpc_url);

        if let Ok(recipient) = std::env::var("TOKEN_MINT_RECIPIENT") {
            let recipient = recipient
                .parse()
                .with_context(|| format!("Invalid TOKEN_MINT_RECIPIENT: {}", recipient))?;
            config = config.with_mint_recipient(recipient);
        }

        if let Ok(interval) = std::env::var("TOKEN_POLL_INTERVAL_MS") {
            let millis: u64 = interval
                .parse()
                .with_context(|| format!("Invalid TOKEN_POLL_INTERVAL_MS: {}", interval))?;
            config = config.with_poll_interval(Duration::from_millis(millis));
        }

        if let Ok(token) = std::env::var("TOKEN_ADDRESS") {
            let token = token
                .parse()
                .with_context(|| format!("Invalid TOKEN_ADDRESS: {}", token))?;
            config = config.with_token(token);
        }

        Ok(config)
    }

    /// Set the RPC endpoint
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Set the mint recipient
    pub fn with_mint_recipient(mut self, recipient: Address) -> Self {
        self.mint_recipient = recipient;
        self
    }

    /// Set the transfer poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the token loaded on startup
    pub fn with_token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }
}
