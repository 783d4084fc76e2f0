//! Per-session state.
//!
//! A [`SessionState`] owns the store client, the shell configuration and
//! the lazily built [`Admin`] handle. The admin handle is created on first
//! use and then reused for the rest of the session; if connecting fails
//! nothing is cached and the next command tries again.
//!
//! Tables are opened fresh for every command so schema changes made by
//! one command are visible to the next.

use std::sync::Arc;

use tracing::debug;

use colshell_core::{Result, ShellConfig, StoreClient};

use crate::admin::Admin;
use crate::table::Table;

/// State shared by every command of one shell session.
pub struct SessionState {
    client: Arc<dyn StoreClient>,
    config: ShellConfig,
    admin: Option<Admin>,
}

impl SessionState {
    /// New session over `client`.
    pub fn new(client: Arc<dyn StoreClient>, config: ShellConfig) -> Self {
        Self {
            client,
            config,
            admin: None,
        }
    }

    /// Shell configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Store client.
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// Admin handle, connecting on first use.
    pub fn admin(&mut self) -> Result<&Admin> {
        let admin = match self.admin.take() {
            Some(admin) => admin,
            None => {
                debug!(target: "colshell::admin", "Creating admin handle");
                Admin::connect(Arc::clone(&self.client))?
            }
        };
        Ok(self.admin.insert(admin))
    }

    /// Whether the admin handle has been built.
    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// Open a table.
    pub fn table(&self, name: &str) -> Result<Table> {
        Table::open(Arc::clone(&self.client), name)
    }
}
