//! Airdrop claims
//!
//! One claim row per wallet. Wallet addresses are hex strings, so they are
//! compared case-insensitively. A claim is only sent once every social task
//! on the checklist is done.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::ClaimSubmitter;

/// A claim row: `{ walletAddress }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropClaim {
    pub wallet_address: String,
}

impl AirdropClaim {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// No address supplied
    MissingWallet,
    /// This wallet already has a claim
    AlreadyClaimed(String),
    /// Some checklist tasks are still open
    TasksIncomplete,
    /// The claim endpoint answered with an unexpected status
    Rejected(u16),
}

impl ClaimError {
    /// Map a claim endpoint status: 2xx accepts, 400 means a duplicate
    pub fn from_status(status: u16, wallet_address: &str) -> Result<(), ClaimError> {
        match status {
            200..=299 => Ok(()),
            400 => Err(ClaimError::AlreadyClaimed(wallet_address.to_string())),
            other => Err(ClaimError::Rejected(other)),
        }
    }
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimError::MissingWallet => write!(f, "wallet address is required"),
            ClaimError::AlreadyClaimed(wallet) => write!(f, "airdrop already claimed by {}", wallet),
            ClaimError::TasksIncomplete => {
                write!(f, "please complete all tasks before claiming the airdrop")
            }
            ClaimError::Rejected(status) => write!(f, "claim rejected with status {}", status),
        }
    }
}

impl std::error::Error for ClaimError {}

/// Set of wallets that have claimed
#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    claimed: BTreeSet<String>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(wallet_address: &str) -> String {
        wallet_address.trim().to_ascii_lowercase()
    }

    pub fn has_claimed(&self, wallet_address: &str) -> bool {
        self.claimed.contains(&Self::normalize(wallet_address))
    }

    /// Record a claim, rejecting duplicates
    pub fn claim(&mut self, claim: &AirdropClaim) -> Result<(), ClaimError> {
        let key = Self::normalize(&claim.wallet_address);
        if key.is_empty() {
            return Err(ClaimError::MissingWallet);
        }
        if !self.claimed.insert(key) {
            log::debug!("Duplicate airdrop claim from {}", claim.wallet_address);
            return Err(ClaimError::AlreadyClaimed(claim.wallet_address.clone()));
        }
        log::info!("Airdrop claimed by {}", claim.wallet_address);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Social tasks a wallet must finish before claiming
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    Follow,
    Retweet,
    Like,
    Discord,
    Telegram,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::Follow,
        Task::Retweet,
        Task::Like,
        Task::Discord,
        Task::Telegram,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Task::Follow => "follow",
            Task::Retweet => "retweet",
            Task::Like => "like",
            Task::Discord => "discord",
            Task::Telegram => "telegram",
        }
    }

    pub fn from_name(name: &str) -> Option<Task> {
        Task::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Which tasks the visitor has ticked off
#[derive(Debug, Clone, Default)]
pub struct TaskChecklist {
    done: BTreeSet<Task>,
}

impl TaskChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&mut self, task: Task) {
        if self.done.insert(task) {
            log::debug!("Task {} completed", task.name());
        }
    }

    pub fn all_complete(&self) -> bool {
        Task::ALL.iter().all(|t| self.done.contains(t))
    }

    pub fn remaining(&self) -> Vec<Task> {
        Task::ALL
            .into_iter()
            .filter(|t| !self.done.contains(t))
            .collect()
    }

    /// Build the claim for `wallet_address` if the checklist allows it
    pub fn claim_for(&self, wallet_address: &str) -> Result<AirdropClaim, ClaimError> {
        let wallet = wallet_address.trim();
        if wallet.is_empty() {
            return Err(ClaimError::MissingWallet);
        }
        if !self.all_complete() {
            log::debug!("Claim blocked, open tasks: {:?}", self.remaining());
            return Err(ClaimError::TasksIncomplete);
        }
        Ok(AirdropClaim::new(wallet))
    }
}

/// Checklist plus the channel that sends finished claims
pub struct AirdropDesk {
    checklist: TaskChecklist,
    submitter: Box<dyn ClaimSubmitter>,
}

impl AirdropDesk {
    pub fn new(submitter: Box<dyn ClaimSubmitter>) -> Self {
        Self {
            checklist: TaskChecklist::new(),
            submitter,
        }
    }

    pub fn checklist(&self) -> &TaskChecklist {
        &self.checklist
    }

    /// Tick a task off by its page name. Unknown names are ignored.
    pub fn complete_task(&mut self, name: &str) -> bool {
        match Task::from_name(name) {
            Some(task) => {
                self.checklist.complete(task);
                true
            }
            None => {
                log::warn!("Unknown airdrop task: {}", name);
                false
            }
        }
    }

    /// Gate the claim on the checklist, then hand it off. The endpoint's
    /// answer is only logged.
    pub fn claim(&self, wallet_address: &str) -> Result<(), ClaimError> {
        let claim = self.checklist.claim_for(wallet_address)?;
        self.submitter.submit_claim(claim);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use super::AirdropDesk;
    use crate::platform::HttpClaimSubmitter;

    /// Airdrop page bindings for the site's task buttons
    #[wasm_bindgen]
    pub struct AirdropPage {
        desk: AirdropDesk,
    }

    #[wasm_bindgen]
    impl AirdropPage {
        #[wasm_bindgen(constructor)]
        pub fn new() -> AirdropPage {
            AirdropPage {
                desk: AirdropDesk::new(Box::new(HttpClaimSubmitter::new(
                    HttpClaimSubmitter::DEFAULT_ENDPOINT,
                ))),
            }
        }

        #[wasm_bindgen(js_name = completeTask)]
        pub fn complete_task(&mut self, name: &str) -> bool {
            self.desk.complete_task(name)
        }

        #[wasm_bindgen(js_name = allTasksComplete)]
        pub fn all_tasks_complete(&self) -> bool {
            self.desk.checklist().all_complete()
        }

        /// Empty string when the claim was sent, otherwise the reason it was not
        pub fn claim(&self, wallet_address: &str) -> String {
            match self.desk.claim(wallet_address) {
                Ok(()) => String::new(),
                Err(e) => e.to_string(),
            }
        }
    }

    impl Default for AirdropPage {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AirdropPage;
