//! Configuration for the ledger store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::BlockHeight;

/// Storage key of the transaction collection
pub const TRANSACTIONS_KEY: &str = "blockchain_transactions";
/// Storage key of the project collection
pub const PROJECTS_KEY: &str = "blockchain_projects";
/// Storage key of the current-user record
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Offset added to the collection length when numbering blocks
pub const DEFAULT_BLOCK_HEIGHT_BASE: BlockHeight = 12_000;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Directory used by file-backed storage
    pub data_dir: PathBuf,

    /// New block height = base + transaction count + 1
    pub block_height_base: BlockHeight,

    pub transactions_key: String,
    pub projects_key: String,
    pub current_user_key: String,

    /// Seed demonstration data when nothing is persisted
    pub seed_on_first_run: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let data_dir = std::env::var("FUNDTRACKER_DATA_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".fundtracker"));

        let block_height_base = std::env::var("FUNDTRACKER_BLOCK_HEIGHT_BASE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BLOCK_HEIGHT_BASE);

        Self {
            data_dir,
            block_height_base,
            transactions_key: TRANSACTIONS_KEY.to_string(),
            projects_key: PROJECTS_KEY.to_string(),
            current_user_key: CURRENT_USER_KEY.to_string(),
            seed_on_first_run: true,
        }
    }
}

impl LedgerConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Start from an empty ledger instead of the demonstration records
    pub fn without_seed(mut self) -> Self {
        self.seed_on_first_run = false;
        self
    }
}
