//! Local private key wallet implementation

use super::{TxRequest, WalletProvider};
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use eyre::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Wallet holding a private key
///
/// Account access is implicit: the key's account is always the active one.
pub struct LocalWallet {
    /// Provider with wallet filler - handles nonce, gas, chain_id, and signing
    provider: Arc<dyn Provider<Ethereum>>,
    address: Address,
}

impl LocalWallet {
    /// Create a new LocalWallet from a private key hex string
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex-encoded private key (with or without 0x prefix)
    /// * `rpc_url` - RPC endpoint URL
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let wallet = LocalWallet::from_private_key("0x...", "http://localhost:8545")?;
    /// ```
    pub fn from_private_key(private_key: impl AsRef<str>, rpc_url: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key.parse().context("Failed to parse private key")?;

        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let url: Url = rpc_url.as_ref().parse().context("Invalid RPC URL")?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        Ok(Self {
            provider: Arc::new(provider),
            address,
        })
    }
}

impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn address(&self) -> Result<Address> {
        Ok(self.address)
    }

    async fn sign_and_send(&self, tx: TxRequest) -> Result<TxHash> {
        let tx_request = alloy::rpc::types::TransactionRequest::default()
            .with_from(self.address)
            .with_to(tx.to)
            .with_input(tx.data);

        // Provider fills nonce, gas, chain_id and signs
        let pending_tx = self
            .provider
            .send_transaction(tx_request)
            .await
            .context("Failed to send transaction")?;

        debug!("Submitted transaction {}", pending_tx.tx_hash());
        Ok(*pending_tx.tx_hash())
    }
}
