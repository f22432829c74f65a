//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Score and airdrop submission (HTTP on web, logging elsewhere)
//! - Fetching the shared leaderboard (web only)

pub mod storage;
pub mod submit;

pub use storage::{KeyValueStore, MemoryStore};
pub use submit::{ClaimSubmitter, LogClaimSubmitter, LogSubmitter, ScoreSubmitter};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use submit::{HttpClaimSubmitter, HttpSubmitter, fetch_leaderboard};
