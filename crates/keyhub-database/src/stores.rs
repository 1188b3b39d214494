//! Backend selection: one implementation of every store trait.

use std::sync::Arc;

use tracing::info;

use keyhub_core::config::DatabaseConfig;
use keyhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    GroupRepository, InvitationRepository, ShareRepository, UserRepository,
};
use crate::store::{GroupStore, InvitationStore, ShareStore, UserStore};

/// The set of stores the services operate on.
#[derive(Clone)]
pub struct Stores {
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Group store.
    pub groups: Arc<dyn GroupStore>,
    /// Share store.
    pub shares: Arc<dyn ShareStore>,
    /// Invitation store.
    pub invitations: Arc<dyn InvitationStore>,
    pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("backend", &self.backend())
            .finish()
    }
}

impl Stores {
    /// Connect the backend selected by `config.url`.
    ///
    /// `memory://` yields a fresh in-process store; anything else is treated
    /// as a PostgreSQL URL, and migrations run when `run_migrations` is set.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory store; data will not survive a restart");
            return Ok(Self::memory());
        }

        let pool = DatabasePool::connect(config).await?;
        if config.run_migrations {
            run_migrations(pool.pool()).await?;
        }
        Ok(Self::postgres(pool))
    }

    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            groups: Arc::new(GroupRepository::new(pg.clone())),
            shares: Arc::new(ShareRepository::new(pg.clone())),
            invitations: Arc::new(InvitationRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Stores backed by a fresh [`MemoryStore`].
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Stores sharing an existing [`MemoryStore`].
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: Arc::clone(&store) as Arc<dyn UserStore>,
            groups: Arc::clone(&store) as Arc<dyn GroupStore>,
            shares: Arc::clone(&store) as Arc<dyn ShareStore>,
            invitations: store as Arc<dyn InvitationStore>,
            pool: None,
        }
    }

    /// Backend name for logs and health output.
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() { "postgres" } else { "memory" }
    }

    /// The PostgreSQL pool, when that backend is active.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Check backend connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
