//! Ledger store for FundTracker public-fund tracking
//!
//! Transactions and projects (with their milestones) are held in memory and
//! mirrored, whole collection at a time, into an injected key-value
//! storage. The "blockchain" is simulated: display hashes are random and
//! block heights are a counter. Nothing here is signed, replicated or
//! verifiable.

pub mod clock;
pub mod config;
pub mod errors;
pub mod ids;
pub mod project;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod transaction;
pub mod user;
pub mod views;
pub mod workflow;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use errors::{LedgerError, LedgerResult};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use project::{Milestone, MilestoneStatus, NewProject, Project, ProjectStatus, ProjectUpdate};
pub use session::Session;
pub use storage::{FileStorage, LedgerStorage, MemoryStorage};
pub use store::Ledger;
pub use transaction::{NewTransaction, Transaction, TransactionStatus, TransactionType};
pub use user::{User, UserRole};
pub use views::{DashboardSummary, TransactionFilter};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::{
        Ledger, LedgerConfig, LedgerError, LedgerResult, LedgerStorage,
        Milestone, MilestoneStatus, NewProject, NewTransaction,
        Project, ProjectStatus, ProjectUpdate, Session,
        Transaction, TransactionStatus, TransactionType,
        User, UserRole,
    };
}

/// Whole-unit fund amount; sign is not validated
pub type Amount = i64;
/// Milliseconds since the Unix epoch
pub type Timestamp = i64;
/// Display block counter
pub type BlockHeight = u64;
