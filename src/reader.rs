//! Read side of the token contract: metadata, balances and the `Transfer` stream

use crate::contracts::IERC20;
use crate::state::TransferEvent;
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::sol_types::SolCall;
use alloy::transports::http::reqwest::Url;
use eyre::{Context, Result};
use futures::stream::{BoxStream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Live stream of transfer notifications for one token
pub type TransferStream = BoxStream<'static, Result<TransferEvent>>;

/// Trait for querying a token contract
///
/// [`RpcTokenReader`] talks to a node; tests substitute an in-memory reader.
pub trait TokenReader: Send + Sync {
    /// Returns the token name
    fn name(&self, token: Address) -> impl Future<Output = Result<String>> + Send;

    /// Returns the token symbol
    fn symbol(&self, token: Address) -> impl Future<Output = Result<String>> + Send;

    /// Returns the total supply in base units
    fn total_supply(&self, token: Address) -> impl Future<Output = Result<U256>> + Send;

    /// Returns the balance of `account` in base units
    fn balance_of(
        &self,
        token: Address,
        account: Address,
    ) -> impl Future<Output = Result<U256>> + Send;

    /// Opens a live stream of `Transfer` events emitted by `token`
    fn transfers(&self, token: Address) -> impl Future<Output = Result<TransferStream>> + Send;
}

/// Type alias for read-only provider
type ReadProvider = Arc<RootProvider<Ethereum>>;

/// Token reader backed by a JSON-RPC endpoint
#[derive(Clone)]
pub struct RpcTokenReader {
    provider: ReadProvider,
    poll_interval: Duration,
}

impl RpcTokenReader {
    /// Create a reader for the given RPC endpoint
    pub fn new(rpc_url: impl AsRef<str>, poll_interval: Duration) -> Result<Self> {
        let url: Url = rpc_url.as_ref().parse().context("Invalid RPC URL")?;
        // Read-only provider without fillers (we only do eth_call and log polling)
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self {
            provider: Arc::new(provider),
            poll_interval,
        })
    }

    /// `eth_call` a view function on `token` and decode its return value
    async fn call<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return> {
        debug!("eth_call {} on {}", C::SIGNATURE, token);

        let result: Bytes = self
            .provider
            .call(
                alloy::rpc::types::TransactionRequest::default()
                    .with_to(token)
                    .with_input(call.abi_encode()),
            )
            .await
            .with_context(|| format!("Failed to call {}", C::SIGNATURE))?;

        C::abi_decode_returns(&result)
            .with_context(|| format!("Failed to decode {} result", C::SIGNATURE))
    }
}

impl TokenReader for RpcTokenReader {
    async fn name(&self, token: Address) -> Result<String> {
        self.call(token, IERC20::nameCall {}).await
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        self.call(token, IERC20::symbolCall {}).await
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.call(token, IERC20::totalSupplyCall {}).await
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        self.call(token, IERC20::balanceOfCall { account }).await
    }

    async fn transfers(&self, token: Address) -> Result<TransferStream> {
        let contract = IERC20::new(token, self.provider.clone());
        let mut poller = contract
            .Transfer_filter()
            .watch()
            .await
            .context("Failed to install Transfer filter")?;
        poller.poller = poller.poller.with_poll_interval(self.poll_interval);

        let stream = poller.into_stream().map(|item| -> Result<TransferEvent> {
            let (transfer, log) = item.context("Failed to decode Transfer log")?;
            Ok(TransferEvent {
                tx_hash: log.transaction_hash,
                from: transfer.from,
                to: transfer.to,
                amount: transfer.value,
            })
        });

        Ok(stream.boxed())
    }
}
