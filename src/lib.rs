//! ERC-20 session for Rust
//!
//! Drives an ERC-20 token contract through a wallet: load token metadata,
//! query the caller's balance, transfer, mint, burn, pause/unpause and follow
//! `Transfer` events live. Contract logic, signing and consensus all happen
//! elsewhere; the session only sequences the calls and keeps their results.
//!
//! # Example
//!
//! ```rust,ignore
//! use erc20_session::{LocalWallet, SessionConfig, TokenSession};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let config = SessionConfig::from_env()?;
//!     let wallet = LocalWallet::from_private_key("0x...", &config.rpc_url)?;
//!     let session = TokenSession::connect(wallet, config)?;
//!
//!     let token = session.load_contract("0x...").await?;
//!     println!("{} ({})", token.token_name, token.token_symbol);
//!
//!     // 1.5 tokens, scaled to 18 decimals
//!     let tx_hash = session.transfer("0x...", "1.5").await?;
//!     println!("submitted {}", tx_hash);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod reader;
pub mod session;
pub mod state;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main types for convenience
pub use config::SessionConfig;
pub use constants::{format_token_amount, parse_raw_amount, parse_token_amount};
pub use error::{eyre, Context, Report, Result};
pub use reader::{RpcTokenReader, TokenReader, TransferStream};
pub use session::TokenSession;
pub use state::{
    BalanceInfo, ContractInfo, ErrorState, SessionAction, SessionState, Submission,
    TransferEvent, Transition,
};
pub use wallet::{LocalWallet, RpcWallet, TxRequest, WalletProvider};
