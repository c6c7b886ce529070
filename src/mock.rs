//! In-memory reader and wallet used by the session tests

use crate::reader::{TokenReader, TransferStream};
use crate::state::TransferEvent;
use crate::wallet::{TxRequest, WalletProvider};
use alloy::primitives::{keccak256, Address, TxHash, U256};
use eyre::{bail, eyre, Result};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

#[derive(Clone)]
struct Token {
    name: String,
    symbol: String,
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

#[derive(Default)]
struct Feeds {
    live: HashMap<Address, Vec<UnboundedSender<TransferEvent>>>,
    opened: HashMap<Address, usize>,
}

/// Token reader serving fixed metadata and hand-fed transfer streams
#[derive(Clone, Default)]
pub(crate) struct MockReader {
    tokens: HashMap<Address, Token>,
    feeds: Arc<Mutex<Feeds>>,
    fail_subscriptions: bool,
}

impl MockReader {
    pub fn with_token(mut self, address: Address, name: &str, symbol: &str, supply: U256) -> Self {
        self.tokens.insert(
            address,
            Token {
                name: name.into(),
                symbol: symbol.into(),
                total_supply: supply,
                balances: HashMap::new(),
            },
        );
        self
    }

    pub fn with_balance(mut self, token: Address, account: Address, amount: U256) -> Self {
        if let Some(token) = self.tokens.get_mut(&token) {
            token.balances.insert(account, amount);
        }
        self
    }

    pub fn failing_subscriptions(mut self) -> Self {
        self.fail_subscriptions = true;
        self
    }

    /// Deliver an event to every open stream of `token`; false if none is listening
    pub fn emit(&self, token: Address, event: TransferEvent) -> bool {
        let feeds = self.feeds.lock().unwrap();
        let mut delivered = false;
        for tx in feeds.live.get(&token).into_iter().flatten() {
            delivered |= tx.send(event.clone()).is_ok();
        }
        delivered
    }

    /// Close every open stream of `token` from the node side
    pub fn end_feeds(&self, token: Address) {
        self.feeds.lock().unwrap().live.remove(&token);
    }

    /// Streams of `token` whose receiving side is still alive
    pub fn live_feeds(&self, token: Address) -> usize {
        let feeds = self.feeds.lock().unwrap();
        feeds
            .live
            .get(&token)
            .map_or(0, |txs| txs.iter().filter(|tx| !tx.is_closed()).count())
    }

    /// Streams ever opened for `token`
    pub fn opened(&self, token: Address) -> usize {
        self.feeds.lock().unwrap().opened.get(&token).copied().unwrap_or(0)
    }

    fn token(&self, address: Address) -> Result<&Token> {
        self.tokens
            .get(&address)
            .ok_or_else(|| eyre!("execution reverted: no token at {}", address))
    }
}

impl TokenReader for MockReader {
    async fn name(&self, token: Address) -> Result<String> {
        Ok(self.token(token)?.name.clone())
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        Ok(self.token(token)?.symbol.clone())
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        Ok(self.token(token)?.total_supply)
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        Ok(self
            .token(token)?
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn transfers(&self, token: Address) -> Result<TransferStream> {
        if self.fail_subscriptions {
            bail!("filter not supported");
        }

        let (tx, rx) = unbounded_channel();
        let mut feeds = self.feeds.lock().unwrap();
        feeds.live.entry(token).or_default().push(tx);
        *feeds.opened.entry(token).or_default() += 1;

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (Ok::<_, eyre::Report>(event), rx))
        });
        Ok(stream.boxed())
    }
}

/// Wallet with one account that can be told to refuse access
pub(crate) struct MockWallet {
    account: Address,
    denied: AtomicBool,
    access_requests: AtomicUsize,
    sent: Mutex<Vec<TxRequest>>,
}

impl MockWallet {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            denied: AtomicBool::new(false),
            access_requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn deny(&self) {
        self.denied.store(true, Ordering::SeqCst);
    }

    pub fn allow(&self) {
        self.denied.store(false, Ordering::SeqCst);
    }

    pub fn access_requests(&self) -> usize {
        self.access_requests.load(Ordering::SeqCst)
    }

    /// Transactions submitted so far
    pub fn sent(&self) -> Vec<TxRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.access_requests.fetch_add(1, Ordering::SeqCst);
        if self.denied.load(Ordering::SeqCst) {
            bail!("User rejected the request");
        }
        Ok(vec![self.account])
    }

    async fn address(&self) -> Result<Address> {
        if self.denied.load(Ordering::SeqCst) {
            bail!("Wallet is not connected");
        }
        Ok(self.account)
    }

    async fn sign_and_send(&self, tx: TxRequest) -> Result<TxHash> {
        let mut sent = self.sent.lock().unwrap();
        let mut preimage = tx.data.to_vec();
        preimage.push(sent.len() as u8);
        let hash = keccak256(&preimage);
        sent.push(tx);
        Ok(hash)
    }
}
