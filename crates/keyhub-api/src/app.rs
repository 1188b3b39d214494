//! Application builder: wires stores, codecs and services into `AppState`.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;

use keyhub_auth::{InvitationTokenCodec, JwtDecoder};
use keyhub_core::config::AppConfig;
use keyhub_core::traits::Mailer;
use keyhub_database::Stores;
use keyhub_service::{
    AccessService, GroupService, InvitationService, LinkService, ShareService, UserService,
};

use crate::router::build_router;
use crate::state::AppState;

/// Constructs every service on top of `stores` and `mailer`.
pub fn build_state(config: AppConfig, stores: Stores, mailer: Arc<dyn Mailer>) -> AppState {
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let codec = Arc::new(InvitationTokenCodec::from_config(&config.auth));
    let links = Arc::new(LinkService::new(&config.server.public_base_url));

    tracing::info!(
        backend = stores.backend(),
        token_format = ?codec.format(),
        mail_provider = mailer.provider_type(),
        "Initializing services"
    );

    let user_service = Arc::new(UserService::new(Arc::clone(&stores.users)));
    let group_service = Arc::new(GroupService::new(
        Arc::clone(&stores.groups),
        Arc::clone(&stores.users),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        Arc::clone(&stores.shares),
        Arc::clone(&stores.invitations),
        Arc::clone(&stores.groups),
        Arc::clone(&codec),
        Arc::clone(&links),
        Arc::clone(&mailer),
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&stores.shares),
        Arc::clone(&stores.groups),
        Arc::clone(&stores.invitations),
        Arc::clone(&invitation_service),
        Arc::clone(&links),
    ));
    let access_service = Arc::new(AccessService::new(
        Arc::clone(&stores.shares),
        Arc::clone(&stores.invitations),
        Arc::clone(&group_service),
        Arc::clone(&codec),
    ));

    AppState {
        config: Arc::new(config),
        started_at: Instant::now(),
        stores,
        mailer,
        jwt_decoder,
        user_service,
        group_service,
        share_service,
        invitation_service,
        access_service,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}
