//! High scores
//!
//! Two views of the same numbers:
//! - `BestScore`: this browser's personal best, a single integer in LocalStorage
//! - `Leaderboard`: the shared table built from submitted `HighScoreRecord`s

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Maximum number of rows shown on the leaderboard
pub const MAX_LEADERBOARD: usize = 10;

/// Personal best, persisted across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    pub value: u64,
}

impl BestScore {
    /// Storage key (decimal integer value)
    pub const STORAGE_KEY: &'static str = "highScore";

    /// Read the stored best. Missing or unparsable values count as zero.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let value = store
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        log::info!("Loaded high score: {}", value);
        Self { value }
    }

    /// Raise the best if `score` beats it. Returns true when it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> anyhow::Result<()> {
        store
            .set(Self::STORAGE_KEY, &self.value.to_string())
            .context("failed to persist high score")?;
        log::info!("High score saved: {}", self.value);
        Ok(())
    }
}

/// One submitted score row: `{ walletAddress, score }`
///
/// Rows are append-only; the same wallet may appear any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreRecord {
    pub wallet_address: String,
    pub score: u64,
}

impl HighScoreRecord {
    pub fn new(wallet_address: impl Into<String>, score: u64) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            score,
        }
    }

    /// The endpoint refuses rows without an address
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.wallet_address.trim().is_empty(),
            "wallet address is required"
        );
        Ok(())
    }
}

/// Shared leaderboard: the highest submitted rows, best first
///
/// Built from the table the high score endpoint returns. Only the top
/// `MAX_LEADERBOARD` rows are kept, so `best_for` answers for wallets on the
/// board only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreRecord>,
}

impl Leaderboard {
    /// Rows may arrive in any order; equal scores keep their arrival order
    pub fn from_records(mut records: Vec<HighScoreRecord>) -> Self {
        records.sort_by_key(|r| std::cmp::Reverse(r.score));
        records.truncate(MAX_LEADERBOARD);
        Self { entries: records }
    }

    /// Parse the JSON array served by the endpoint
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let records: Vec<HighScoreRecord> =
            serde_json::from_str(json).context("malformed leaderboard payload")?;
        Ok(Self::from_records(records))
    }

    /// Highest score on the board for one wallet (addresses compare case-insensitively)
    pub fn best_for(&self, wallet_address: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.wallet_address.eq_ignore_ascii_case(wallet_address))
            .map(|e| e.score)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
