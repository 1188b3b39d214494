//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use keyhub_auth::JwtDecoder;
use keyhub_core::config::AppConfig;
use keyhub_core::traits::Mailer;
use keyhub_database::Stores;
use keyhub_service::{AccessService, GroupService, InvitationService, ShareService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Store backend (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Outbound mail provider
    pub mailer: Arc<dyn Mailer>,

    // ── Auth ─────────────────────────────────────────────────
    /// Session token decoder
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// User synchronization
    pub user_service: Arc<UserService>,
    /// Groups and items
    pub group_service: Arc<GroupService>,
    /// Share lifecycle
    pub share_service: Arc<ShareService>,
    /// Invitation lifecycle
    pub invitation_service: Arc<InvitationService>,
    /// Share content access
    pub access_service: Arc<AccessService>,
}
