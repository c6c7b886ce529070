//! Wallet provider abstraction for the ERC-20 session
//!
//! A wallet grants account access, reports the active account and signs and
//! submits transactions. Two implementations are provided:
//! - `LocalWallet`: signs locally with a private key
//! - `RpcWallet`: delegates accounts and signing to a JSON-RPC endpoint that
//!   manages them (`eth_requestAccounts` / `eth_sendTransaction`), the way an
//!   injected browser wallet does

mod local;
mod rpc;

pub use local::LocalWallet;
pub use rpc::RpcWallet;

use alloy::primitives::{Address, Bytes, TxHash};
use eyre::Result;
use std::future::Future;

/// Transaction request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    /// Target contract address
    pub to: Address,
    /// Encoded calldata
    pub data: Bytes,
}

impl TxRequest {
    /// Create a new transaction request
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }
}

/// Trait for the wallet side of the session
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet for account access, returning the granted accounts
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>>> + Send;

    /// Returns the address of the active account
    fn address(&self) -> impl Future<Output = Result<Address>> + Send;

    /// Signs and sends a transaction from the active account, returning the hash
    fn sign_and_send(&self, tx: TxRequest) -> impl Future<Output = Result<TxHash>> + Send;
}
