//! TokenSession - main entry point for the crate
//!
//! Every action follows the same shape: talk to the wallet and/or the token
//! contract, then fold the outcome into [`SessionState`] through one
//! [`Transition`]. Failures are recorded as the session error for that action
//! and also returned to the caller; they never touch unrelated state.

use crate::config::SessionConfig;
use crate::constants::{parse_raw_amount, parse_token_amount};
use crate::contracts::IERC20;
use crate::error::describe;
use crate::reader::{RpcTokenReader, TokenReader, TransferStream};
use crate::state::{
    BalanceInfo, ContractInfo, SessionAction, SessionState, Submission, Transition,
};
use crate::wallet::{TxRequest, WalletProvider};
use alloy::primitives::{Address, TxHash};
use alloy::sol_types::SolCall;
use eyre::{ensure, eyre, Context, Result};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Live `Transfer` subscription bound to one token
///
/// The polling task is aborted when the handle is dropped.
struct Subscription {
    address: Address,
    task: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Session controller for one ERC-20 token at a time
///
/// All actions take `&self`; wrap the session in an `Arc` to run several of
/// them concurrently. Must be used from within a tokio runtime.
pub struct TokenSession<R: TokenReader, W: WalletProvider> {
    reader: R,
    wallet: W,
    config: SessionConfig,
    state: Arc<Mutex<SessionState>>,
    subscription: Mutex<Option<Subscription>>,
}

impl<W: WalletProvider> TokenSession<RpcTokenReader, W> {
    /// Create a session reading from the configured RPC endpoint
    pub fn connect(wallet: W, config: SessionConfig) -> Result<Self> {
        let reader = RpcTokenReader::new(&config.rpc_url, config.poll_interval)?;
        Ok(Self::new(reader, wallet, config))
    }
}

impl<R: TokenReader, W: WalletProvider> TokenSession<R, W> {
    /// Create a new session with no contract loaded
    pub fn new(reader: R, wallet: W, config: SessionConfig) -> Self {
        Self {
            reader,
            wallet,
            config,
            state: Arc::new(Mutex::new(SessionState::new())),
            subscription: Mutex::new(None),
        }
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the wallet
    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    async fn apply(&self, transition: Transition) -> bool {
        self.state.lock().await.apply(transition)
    }

    /// Record a failed action in the state, passing the result through
    async fn record<T>(&self, action: SessionAction, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            let message = describe(err);
            warn!("{} failed: {}", action, message);
            self.apply(Transition::Failed { action, message }).await;
        }
        result
    }

    // ========== Contract ==========

    /// Load token metadata for `address` and make it the session's contract
    ///
    /// On success the contract replaces any previous one, the session error is
    /// cleared and the transfer subscription follows the new address. On
    /// failure the previous contract stays loaded.
    pub async fn load_contract(&self, address: &str) -> Result<ContractInfo> {
        let result = self.fetch_contract(address).await;
        let contract = self.record(SessionAction::LoadContract, result).await?;

        self.apply(Transition::ContractLoaded(contract.clone())).await;
        info!(
            "Loaded {} ({}) at {}, total supply {}",
            contract.token_name, contract.token_symbol, contract.address, contract.total_supply
        );

        // A failed subscription is recorded on its own; the contract stays loaded
        let _ = self.sync_subscription().await;

        Ok(contract)
    }

    async fn fetch_contract(&self, address: &str) -> Result<ContractInfo> {
        let token: Address = address
            .trim()
            .parse()
            .with_context(|| format!("Invalid contract address: {}", address))?;

        let (token_name, token_symbol, total_supply) = tokio::try_join!(
            self.reader.name(token),
            self.reader.symbol(token),
            self.reader.total_supply(token),
        )?;

        Ok(ContractInfo {
            address: token,
            token_name,
            token_symbol,
            total_supply,
        })
    }

    /// Address of the loaded contract, or an error when none is loaded
    async fn loaded_contract(&self) -> Result<Address> {
        self.state
            .lock()
            .await
            .contract_address()
            .ok_or_else(|| eyre!("No contract loaded"))
    }

    // ========== Transfer subscription ==========

    /// Bind the transfer subscription to the loaded contract
    ///
    /// Does nothing when no contract is loaded or a live subscription is
    /// already bound to it. Otherwise the active subscription (possibly one
    /// whose stream has ended) is released before the new one is opened.
    pub async fn sync_subscription(&self) -> Result<()> {
        let mut active = self.subscription.lock().await;

        let (target, listening) = {
            let state = self.state.lock().await;
            (state.contract_address(), state.listening())
        };
        let Some(target) = target else {
            return Ok(());
        };
        // A listener whose stream ended no longer counts as bound
        let bound = matches!(&*active, Some(s) if s.address == target && !s.task.is_finished());
        if bound && listening == Some(target) {
            return Ok(());
        }

        if let Some(previous) = active.take() {
            info!("Releasing transfer subscription on {}", previous.address);
            drop(previous);
            self.apply(Transition::Released).await;
        }

        let result = self.reader.transfers(target).await;
        let stream = self.record(SessionAction::Subscribe, result).await?;
        *active = Some(self.spawn_listener(target, stream).await);

        Ok(())
    }

    async fn spawn_listener(&self, token: Address, mut stream: TransferStream) -> Subscription {
        let generation = {
            let mut state = self.state.lock().await;
            state.apply(Transition::Listening(token));
            state.generation()
        };

        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                match item {
                    Ok(event) => {
                        debug!(
                            "Transfer on {}: {} -> {} amount {} (tx {:?})",
                            token, event.from, event.to, event.amount, event.tx_hash
                        );
                        state
                            .lock()
                            .await
                            .apply(Transition::TransferObserved { generation, event });
                    }
                    Err(err) => warn!("Skipping transfer on {}: {:#}", token, err),
                }
            }
            warn!("Transfer stream for {} ended", token);
            state
                .lock()
                .await
                .apply(Transition::StreamEnded { generation });
        });

        info!("Listening for transfers on {}", token);
        Subscription {
            address: token,
            task,
        }
    }

    // ========== Balance ==========

    /// Query the token balance of the wallet's active account
    pub async fn get_my_balance(&self) -> Result<BalanceInfo> {
        let result = self.fetch_balance().await;
        let balance = self.record(SessionAction::GetBalance, result).await?;

        self.apply(Transition::BalanceLoaded(balance.clone())).await;
        info!("Balance of {}: {}", balance.address, balance.balance);

        Ok(balance)
    }

    async fn fetch_balance(&self) -> Result<BalanceInfo> {
        self.connect_account().await?;
        let token = self.loaded_contract().await?;
        let address = self.wallet.address().await?;
        let balance = self
            .reader
            .balance_of(token, address)
            .await
            .context("Failed to get balance")?;

        Ok(BalanceInfo { address, balance })
    }

    // ========== Transactions ==========

    /// Transfer `amount` (decimal string, token units) to `recipient`
    ///
    /// Returns the transaction hash once the wallet accepted it; confirmation
    /// is not awaited.
    pub async fn transfer(&self, recipient: &str, amount: &str) -> Result<TxHash> {
        let decimals = self.config.token_decimals;
        self.submit(SessionAction::Transfer, || {
            let to: Address = recipient
                .trim()
                .parse()
                .with_context(|| format!("Invalid recipient address: {}", recipient))?;
            let amount = parse_token_amount(amount, decimals)?;
            Ok(IERC20::transferCall { to, amount }.abi_encode())
        })
        .await
    }

    /// Mint `value` raw base units to the configured recipient
    pub async fn mint(&self, value: &str) -> Result<TxHash> {
        let to = self.config.mint_recipient;
        self.submit(SessionAction::Mint, || {
            let amount = parse_raw_amount(value)?;
            Ok(IERC20::mintCall { to, amount }.abi_encode())
        })
        .await
    }

    /// Burn `value` raw base units from the caller
    pub async fn burn(&self, value: &str) -> Result<TxHash> {
        self.submit(SessionAction::Burn, || {
            let amount = parse_raw_amount(value)?;
            Ok(IERC20::burnCall { amount }.abi_encode())
        })
        .await
    }

    /// Pause the token
    pub async fn pause(&self) -> Result<TxHash> {
        self.submit(SessionAction::Pause, || Ok(IERC20::pauseCall {}.abi_encode()))
            .await
    }

    /// Unpause the token
    pub async fn unpause(&self) -> Result<TxHash> {
        self.submit(SessionAction::Unpause, || {
            Ok(IERC20::unpauseCall {}.abi_encode())
        })
        .await
    }

    async fn submit<F>(&self, action: SessionAction, encode: F) -> Result<TxHash>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let result = self.send(action, encode).await;
        let tx_hash = self.record(action, result).await?;

        self.apply(Transition::Submitted(Submission { action, tx_hash }))
            .await;
        info!("Submitted {}: {}", action, tx_hash);

        Ok(tx_hash)
    }

    async fn send<F>(&self, action: SessionAction, encode: F) -> Result<TxHash>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        self.connect_account().await?;
        let token = self.loaded_contract().await?;
        let data = encode()?;

        self.wallet
            .sign_and_send(TxRequest::new(token, data))
            .await
            .with_context(|| format!("Failed to {}", action))
    }

    /// Ask the wallet for account access
    async fn connect_account(&self) -> Result<()> {
        let accounts = self
            .wallet
            .request_accounts()
            .await
            .context("Wallet access denied")?;
        ensure!(!accounts.is_empty(), "Wallet granted no accounts");
        Ok(())
    }
}
