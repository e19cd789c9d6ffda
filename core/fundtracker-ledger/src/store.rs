//! The ledger store: transactions and projects mirrored to storage
//!
//! Every mutation rewrites the whole affected collection under its key.
//! Two `Ledger` values opened over the same storage keep independent
//! in-memory copies and the last one to write wins; the other's changes are
//! silently discarded. Call [`Ledger::reload`] to pick up another writer's
//! state. No locking is attempted.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::errors::{LedgerError, LedgerResult};
use crate::ids::{IdGenerator, RandomIds};
use crate::project::{NewProject, Project, ProjectUpdate};
use crate::seed::{seed_projects, seed_transactions};
use crate::storage::{load_json, save_json, LedgerStorage};
use crate::transaction::{NewTransaction, Transaction};
use crate::{Amount, BlockHeight, Timestamp};

/// Regenerations tried before giving up on a colliding id
const MAX_ID_ATTEMPTS: usize = 8;

fn fresh_id(
    kind: &'static str,
    mut generate: impl FnMut() -> String,
    taken: impl Fn(&str) -> bool,
) -> LedgerResult<String> {
    let mut id = generate();
    for _ in 1..MAX_ID_ATTEMPTS {
        if !taken(&id) {
            return Ok(id);
        }
        debug!("{} id {} already in use, regenerating", kind, id);
        id = generate();
    }
    if taken(&id) {
        return Err(LedgerError::DuplicateId { kind, id, attempts: MAX_ID_ATTEMPTS });
    }
    Ok(id)
}

/// Session-scoped ledger store
pub struct Ledger {
    config: LedgerConfig,
    storage: Arc<dyn LedgerStorage>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    transactions: Vec<Transaction>,
    projects: Vec<Project>,
}

impl Ledger {
    /// Open with random ids and the wall clock
    pub fn open(config: LedgerConfig, storage: Arc<dyn LedgerStorage>) -> LedgerResult<Self> {
        Self::open_with(config, storage, Arc::new(RandomIds), Arc::new(SystemClock))
    }

    /// Open with explicit id generator and clock, then load or seed
    pub fn open_with(
        config: LedgerConfig,
        storage: Arc<dyn LedgerStorage>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> LedgerResult<Self> {
        let mut ledger = Self {
            config,
            storage,
            ids,
            clock,
            transactions: Vec::new(),
            projects: Vec::new(),
        };
        ledger.initialize()?;
        Ok(ledger)
    }

    /// Load both collections; a missing key is a first run and gets seeded
    fn initialize(&mut self) -> LedgerResult<()> {
        let now = self.clock.now_millis();
        let seed = self.config.seed_on_first_run;

        self.transactions = match load_json(self.storage.as_ref(), &self.config.transactions_key)? {
            Some(transactions) => transactions,
            None => {
                let initial = if seed { seed_transactions(now) } else { Vec::new() };
                info!("no persisted transactions, seeding {} records", initial.len());
                save_json(self.storage.as_ref(), &self.config.transactions_key, &initial)?;
                initial
            }
        };

        self.projects = match load_json(self.storage.as_ref(), &self.config.projects_key)? {
            Some(projects) => projects,
            None => {
                let initial = if seed { seed_projects(now) } else { Vec::new() };
                info!("no persisted projects, seeding {} records", initial.len());
                save_json(self.storage.as_ref(), &self.config.projects_key, &initial)?;
                initial
            }
        };

        debug!(
            "ledger loaded: {} transactions, {} projects",
            self.transactions.len(),
            self.projects.len()
        );
        Ok(())
    }

    /// Replace the in-memory copy with what storage holds now
    pub fn reload(&mut self) -> LedgerResult<()> {
        self.initialize()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn LedgerStorage> {
        &self.storage
    }

    pub fn ids(&self) -> &Arc<dyn IdGenerator> {
        &self.ids
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now_millis()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn transaction(&self, tx_id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == tx_id)
    }

    /// Height the next appended transaction will get
    pub fn next_block_height(&self) -> BlockHeight {
        self.config.block_height_base + self.transactions.len() as BlockHeight + 1
    }

    /// Append a transaction and persist the whole collection.
    ///
    /// Amount sign, project reference and parties are taken as given.
    pub fn add_transaction(&mut self, new: NewTransaction) -> LedgerResult<Transaction> {
        let existing = &self.transactions;
        let id = fresh_id(
            "transaction",
            || self.ids.transaction_id(),
            |id| existing.iter().any(|t| t.id == id),
        )?;
        let tx = new.into_transaction(
            id,
            self.ids.display_hash(),
            self.clock.now_millis(),
            self.next_block_height(),
        );

        self.transactions.push(tx.clone());
        if let Err(e) = save_json(self.storage.as_ref(), &self.config.transactions_key, &self.transactions) {
            self.transactions.pop();
            return Err(e);
        }

        info!(
            "transaction {} recorded: {} {} -> {} ({}), block {}",
            tx.id,
            tx.amount,
            tx.from,
            tx.to,
            tx.kind.as_str(),
            tx.block_height
        );
        Ok(tx)
    }

    /// Append a project (milestones as given) and persist the collection
    pub fn add_project(&mut self, new: NewProject) -> LedgerResult<Project> {
        let existing = &self.projects;
        let id = fresh_id(
            "project",
            || self.ids.project_id(),
            |id| existing.iter().any(|p| p.id == id),
        )?;
        let project = new.into_project(id, self.clock.now_millis());

        self.projects.push(project.clone());
        if let Err(e) = save_json(self.storage.as_ref(), &self.config.projects_key, &self.projects) {
            self.projects.pop();
            return Err(e);
        }

        info!(
            "project {} created: {} ({} milestones)",
            project.id,
            project.name,
            project.milestones.len()
        );
        Ok(project)
    }

    /// Merge `update` over the project and persist the collection.
    ///
    /// An unknown id leaves the collection untouched, writes nothing and
    /// returns [`LedgerError::ProjectNotFound`].
    pub fn update_project(&mut self, project_id: &str, update: ProjectUpdate) -> LedgerResult<Project> {
        let Some(index) = self.projects.iter().position(|p| p.id == project_id) else {
            warn!("update on unknown project {}", project_id);
            return Err(LedgerError::ProjectNotFound(project_id.to_string()));
        };

        let mut merged = self.projects[index].clone();
        update.apply_to(&mut merged);
        let previous = std::mem::replace(&mut self.projects[index], merged);

        if let Err(e) = save_json(self.storage.as_ref(), &self.config.projects_key, &self.projects) {
            self.projects[index] = previous;
            return Err(e);
        }

        info!("project {} updated", project_id);
        Ok(self.projects[index].clone())
    }

    /// Sum of completed allocations
    pub fn total_funds(&self) -> Amount {
        self.transactions
            .iter()
            .filter(|t| t.is_completed_allocation())
            .fold(0, |sum: Amount, t| sum.saturating_add(t.amount))
    }

    /// Number of pending transactions
    pub fn pending_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.is_pending()).count()
    }
}
