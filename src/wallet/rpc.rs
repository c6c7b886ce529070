//! Wallet backed by an account-managing JSON-RPC endpoint

use super::{TxRequest, WalletProvider};
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::transports::http::reqwest::Url;
use eyre::{eyre, Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Wallet whose accounts and keys live behind the endpoint
///
/// Speaks the same protocol as an injected browser wallet: account access is
/// requested with `eth_requestAccounts` and transactions are handed over
/// unsigned via `eth_sendTransaction`.
pub struct RpcWallet {
    /// Provider without fillers - the endpoint fills and signs
    provider: Arc<RootProvider<Ethereum>>,
}

impl RpcWallet {
    /// Create a wallet for the given endpoint
    pub fn new(rpc_url: impl AsRef<str>) -> Result<Self> {
        let url: Url = rpc_url.as_ref().parse().context("Invalid RPC URL")?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self {
            provider: Arc::new(provider),
        })
    }
}

impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .context("Account access was not granted")?;

        debug!("Wallet granted {} account(s)", accounts.len());
        Ok(accounts)
    }

    async fn address(&self) -> Result<Address> {
        let accounts = self
            .provider
            .get_accounts()
            .await
            .context("Failed to get wallet accounts")?;

        accounts
            .first()
            .copied()
            .ok_or_else(|| eyre!("Wallet has no connected account"))
    }

    async fn sign_and_send(&self, tx: TxRequest) -> Result<TxHash> {
        let from = self.address().await?;
        let tx_request = alloy::rpc::types::TransactionRequest::default()
            .with_from(from)
            .with_to(tx.to)
            .with_input(tx.data);

        let pending_tx = self
            .provider
            .send_transaction(tx_request)
            .await
            .context("Failed to send transaction")?;

        debug!("Submitted transaction {} from {}", pending_tx.tx_hash(), from);
        Ok(*pending_tx.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_url() {
        assert!(RpcWallet::new("not a url").is_err());
        assert!(RpcWallet::new("http://localhost:8545").is_ok());
    }
}
