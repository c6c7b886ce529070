//! Session state and the transitions that update it
//!
//! Every action on [`crate::TokenSession`] ends in exactly one [`Transition`]
//! applied to [`SessionState`]. Keeping the updates in one reducer makes the
//! session testable without any front end attached.

use crate::constants::PLACEHOLDER;
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use std::fmt;

/// Metadata of the loaded token contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    pub address: Address,
    pub token_name: String,
    pub token_symbol: String,
    /// Total supply in base units
    pub total_supply: U256,
}

/// Result of the last balance query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceInfo {
    /// Queried account
    pub address: Address,
    /// Balance in base units
    pub balance: U256,
}

/// A `Transfer` notification received from the live subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEvent {
    /// Hash of the emitting transaction (missing for pending logs)
    pub tx_hash: Option<TxHash>,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

/// User-facing actions, used to tie errors and submissions to their origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionAction {
    LoadContract,
    Subscribe,
    GetBalance,
    Transfer,
    Mint,
    Burn,
    Pause,
    Unpause,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadContract => "load contract",
            Self::Subscribe => "subscribe to transfers",
            Self::GetBalance => "get balance",
            Self::Transfer => "transfer",
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        };
        f.write_str(name)
    }
}

/// Last failed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub action: SessionAction,
    pub message: String,
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.action, self.message)
    }
}

/// A transaction handed to the wallet (not waited on)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub action: SessionAction,
    pub tx_hash: TxHash,
}

/// Named state updates, one per outcome of a session action
#[derive(Debug, Clone)]
pub enum Transition {
    /// Token metadata fetched; replaces the contract and clears any error
    ContractLoaded(ContractInfo),
    /// A new transfer subscription is bound to `address`
    Listening(Address),
    /// The active transfer subscription was torn down
    Released,
    /// The stream of the given generation ran dry
    StreamEnded { generation: u64 },
    /// Balance fetched for the active account
    BalanceLoaded(BalanceInfo),
    /// Event delivered by the subscription of the given generation
    TransferObserved { generation: u64, event: TransferEvent },
    /// Transaction accepted by the wallet
    Submitted(Submission),
    /// Action failed; nothing else is touched
    Failed { action: SessionAction, message: String },
}

/// In-memory session state
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    contract: Option<ContractInfo>,
    balance: Option<BalanceInfo>,
    transfers: Vec<TransferEvent>,
    last_submission: Option<Submission>,
    error: Option<ErrorState>,
    listening: Option<Address>,
    #[serde(skip)]
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a transition
    ///
    /// Returns `false` when the transition was discarded (it came from a
    /// released subscription).
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::ContractLoaded(info) => {
                // Events still in flight for the previous address are stale from here on
                if self.contract_address() != Some(info.address) {
                    self.generation += 1;
                    self.listening = None;
                }
                self.contract = Some(info);
                self.error = None;
            }
            Transition::Listening(address) => {
                self.generation += 1;
                self.listening = Some(address);
            }
            Transition::Released => {
                self.generation += 1;
                self.listening = None;
            }
            Transition::StreamEnded { generation } => {
                if generation != self.generation {
                    return false;
                }
                self.listening = None;
            }
            Transition::BalanceLoaded(info) => {
                self.balance = Some(info);
                self.clear_error_of(SessionAction::GetBalance);
            }
            Transition::TransferObserved { generation, event } => {
                if generation != self.generation {
                    return false;
                }
                self.transfers.push(event);
            }
            Transition::Submitted(submission) => {
                self.clear_error_of(submission.action);
                self.last_submission = Some(submission);
            }
            Transition::Failed { action, message } => {
                self.error = Some(ErrorState { action, message });
            }
        }
        true
    }

    fn clear_error_of(&mut self, action: SessionAction) {
        if self.error.as_ref().is_some_and(|e| e.action == action) {
            self.error = None;
        }
    }

    /// Loaded contract, if any
    pub fn contract(&self) -> Option<&ContractInfo> {
        self.contract.as_ref()
    }

    /// Address of the loaded contract, if any
    pub fn contract_address(&self) -> Option<Address> {
        self.contract.as_ref().map(|c| c.address)
    }

    pub fn balance(&self) -> Option<&BalanceInfo> {
        self.balance.as_ref()
    }

    /// Received transfer events in arrival order
    pub fn transfers(&self) -> &[TransferEvent] {
        &self.transfers
    }

    pub fn last_submission(&self) -> Option<&Submission> {
        self.last_submission.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    /// Address the active subscription is bound to
    pub fn listening(&self) -> Option<Address> {
        self.listening
    }

    /// Generation of the active subscription; bumped on re-subscription and address change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Contract fields for display, placeholders when nothing is loaded
    pub fn contract_row(&self) -> [String; 4] {
        match &self.contract {
            Some(c) => [
                c.address.to_string(),
                c.token_name.clone(),
                c.token_symbol.clone(),
                c.total_supply.to_string(),
            ],
            None => std::array::from_fn(|_| PLACEHOLDER.to_string()),
        }
    }

    /// Balance fields for display, placeholders when nothing is loaded
    pub fn balance_row(&self) -> [String; 2] {
        match &self.balance {
            Some(b) => [b.address.to_string(), b.balance.to_string()],
            None => std::array::from_fn(|_| PLACEHOLDER.to_string()),
        }
    }
}
