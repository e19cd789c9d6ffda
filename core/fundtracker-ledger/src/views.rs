//! Role-scoped read views over the ledger
//!
//! Visibility here is a display filter over data the caller already holds.
//! It is not access control: every record stays readable through the store
//! and through storage.

use serde::Serialize;

use crate::project::{Project, ProjectStatus};
use crate::store::Ledger;
use crate::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::user::{User, UserRole};
use crate::Amount;

/// Entries shown in the dashboard activity feed
pub const RECENT_ACTIVITY_LEN: usize = 5;

/// Public and government viewers see everything; others see transactions
/// they sent or received.
pub fn can_see_transaction(user: &User, tx: &Transaction) -> bool {
    match user.role {
        UserRole::Public | UserRole::Government => true,
        UserRole::LocalAuthority | UserRole::Contractor => tx.involves(&user.name),
    }
}

/// Contractors see only projects assigned to them; every other role sees all
pub fn can_see_project(user: &User, project: &Project) -> bool {
    match user.role {
        UserRole::Public | UserRole::Government | UserRole::LocalAuthority => true,
        UserRole::Contractor => project.is_assigned_to(&user.name),
    }
}

pub fn visible_transactions<'a>(user: &User, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| can_see_transaction(user, t)).collect()
}

pub fn visible_projects<'a>(user: &User, projects: &'a [Project]) -> Vec<&'a Project> {
    projects.iter().filter(|p| can_see_project(user, p)).collect()
}

/// Transaction history filter
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring of description, sender, recipient or hash
    pub search: String,
    pub status: Option<TransactionStatus>,
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || [&tx.description, &tx.from, &tx.to, &tx.hash]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        matches_search
            && self.status.map_or(true, |s| tx.status == s)
            && self.kind.map_or(true, |k| tx.kind == k)
    }
}

/// Filtered history as `user` would see it, in ledger order
pub fn transaction_history<'a>(
    user: &User,
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| filter.matches(t) && can_see_transaction(user, t))
        .collect()
}

/// Summary cards and activity feed for one viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub viewer: String,
    pub role: &'static str,
    /// Ledger-wide, not role-scoped
    pub total_funds: Amount,
    pub active_projects: usize,
    pub completed_projects: usize,
    /// Ledger-wide, not role-scoped
    pub pending_approvals: usize,
    pub recent_activity: Vec<Transaction>,
}

impl DashboardSummary {
    pub fn build(ledger: &Ledger, user: &User) -> Self {
        let projects = visible_projects(user, ledger.projects());
        let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

        Self {
            viewer: user.name.clone(),
            role: user.role.display_name(),
            total_funds: ledger.total_funds(),
            active_projects: count(ProjectStatus::InProgress),
            completed_projects: count(ProjectStatus::Completed),
            pending_approvals: ledger.pending_count(),
            recent_activity: visible_transactions(user, ledger.transactions())
                .into_iter()
                .take(RECENT_ACTIVITY_LEN)
                .cloned()
                .collect(),
        }
    }
}
