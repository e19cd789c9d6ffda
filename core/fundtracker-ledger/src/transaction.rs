//! Fund transaction records

use serde::{Deserialize, Serialize};

use crate::{Amount, BlockHeight, Timestamp};

/// Transaction identifier
pub type TxId = String;

/// Kind of fund movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Treasury funds assigned to an authority
    Allocation,
    /// Movement between two parties
    Transfer,
    /// Payment for delivered work
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Allocation => "allocation",
            TransactionType::Transfer => "transfer",
            TransactionType::Payment => "payment",
        }
    }
}

/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Completed => "completed",
        }
    }
}

/// Transaction in the ledger
///
/// Records are immutable once appended. `hash` is a random display string
/// and `block_height` a display counter; neither is verifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TxId,

    /// Cosmetic display hash, never derived from content
    pub hash: String,

    /// Sender display name
    pub from: String,

    /// Recipient display name
    pub to: String,

    pub amount: Amount,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub description: String,

    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: Timestamp,

    pub status: TransactionStatus,

    pub block_height: BlockHeight,
}

impl Transaction {
    /// Completed allocations are the only records counted as funds
    pub fn is_completed_allocation(&self) -> bool {
        self.status == TransactionStatus::Completed && self.kind == TransactionType::Allocation
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Whether `name` is the sender or the recipient
    pub fn involves(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// Caller-supplied fields of a new transaction
///
/// The store fills in id, display hash, timestamp and block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub from: String,
    pub to: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub description: String,
    pub status: TransactionStatus,
}

impl NewTransaction {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Amount,
        kind: TransactionType,
        status: TransactionStatus,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            kind,
            project_id: None,
            description: String::new(),
            status,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach store-generated fields
    pub(crate) fn into_transaction(
        self,
        id: TxId,
        hash: String,
        timestamp: Timestamp,
        block_height: BlockHeight,
    ) -> Transaction {
        Transaction {
            id,
            hash,
            from: self.from,
            to: self.to,
            amount: self.amount,
            kind: self.kind,
            project_id: self.project_id,
            description: self.description,
            timestamp,
            status: self.status,
            block_height,
        }
    }
}
