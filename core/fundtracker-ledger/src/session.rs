//! Login stub and the persisted current-user record
//!
//! No credential is checked: a login manufactures the role's demo identity.

use std::sync::Arc;
use tracing::info;

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, LedgerResult};
use crate::ids::IdGenerator;
use crate::storage::{load_json, save_json, LedgerStorage};
use crate::store::Ledger;
use crate::user::{User, UserRole};

/// Build the identity a login for `role` produces.
///
/// A non-empty `email` replaces the demo address; name and organization
/// always come from the role directory.
pub fn fabricate_user(role: UserRole, email: Option<&str>, ids: &dyn IdGenerator) -> User {
    let directory = role.directory();
    let demo = directory.primary();
    let email = email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(demo.email);

    User {
        id: ids.user_id(),
        name: demo.name.to_string(),
        email: email.to_string(),
        role,
        organization: directory.organization.to_string(),
    }
}

/// Current-user persistence
pub struct Session {
    storage: Arc<dyn LedgerStorage>,
    ids: Arc<dyn IdGenerator>,
    key: String,
}

impl Session {
    pub fn new(config: &LedgerConfig, storage: Arc<dyn LedgerStorage>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            storage,
            ids,
            key: config.current_user_key.clone(),
        }
    }

    /// Session sharing the ledger's storage and id generator
    pub fn for_ledger(ledger: &Ledger) -> Self {
        Self::new(ledger.config(), ledger.storage().clone(), ledger.ids().clone())
    }

    /// Log in as the role's demo user and persist the record
    pub fn login(&self, role: UserRole, email: Option<&str>) -> LedgerResult<User> {
        let user = fabricate_user(role, email, self.ids.as_ref());
        save_json(self.storage.as_ref(), &self.key, &user)?;
        info!("logged in as {} ({})", user.name, role.display_name());
        Ok(user)
    }

    pub fn current_user(&self) -> LedgerResult<Option<User>> {
        load_json(self.storage.as_ref(), &self.key)
    }

    pub fn require_user(&self) -> LedgerResult<User> {
        self.current_user()?.ok_or(LedgerError::NotLoggedIn)
    }

    pub fn logout(&self) -> LedgerResult<()> {
        self.storage.remove(&self.key)?;
        info!("logged out");
        Ok(())
    }
}
