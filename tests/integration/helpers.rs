//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use keyhub_api::AppState;
use keyhub_auth::{InvitationTokenCodec, JwtEncoder};
use keyhub_core::config::AppConfig;
use keyhub_core::types::{GroupId, ShareId, UserId};
use keyhub_database::{MemoryStore, Stores};
use keyhub_entity::CreateItem;
use keyhub_mail::MemoryMailer;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Services behind the router, for fixtures the HTTP surface does not cover
    pub state: AppState,
    /// The shared in-memory store
    pub store: Arc<MemoryStore>,
    /// Captured invitation emails
    pub mailer: Arc<MemoryMailer>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

/// A synced user with a session token
#[derive(Debug, Clone)]
pub struct TestUser {
    /// User ID
    pub id: Uuid,
    /// Normalized email
    pub email: String,
    /// Bearer token
    pub token: String,
}

impl TestApp {
    /// Create a new test application on a fresh in-memory store
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.server.public_base_url = "http://keyhub.test".to_string();

        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MemoryMailer::new());
        let state = keyhub_api::build_state(
            config.clone(),
            Stores::from_memory(Arc::clone(&store)),
            Arc::clone(&mailer) as Arc<dyn keyhub_core::traits::Mailer>,
        );
        let router = keyhub_api::build_app(state.clone());
        let encoder = JwtEncoder::new(&config.auth);

        Self {
            router,
            state,
            store,
            mailer,
            config,
            encoder,
        }
    }

    /// Mint a session token for an arbitrary identity
    pub fn session_token(&self, id: Uuid, email: &str) -> String {
        self.encoder
            .issue_session(id, email, None)
            .expect("Failed to issue session")
            .0
    }

    /// Sign in a new user and sync their record
    pub async fn user(&self, email: &str) -> TestUser {
        let id = Uuid::now_v7();
        let token = self.session_token(id, email);
        let response = self.request("POST", "/api/auth/sync", None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::OK, "sync failed: {}", response.body);

        TestUser {
            id,
            email: response.body["data"]["email"]
                .as_str()
                .expect("email")
                .to_string(),
            token,
        }
    }

    /// Create a group with one item for `owner`
    pub async fn group(&self, owner: &TestUser, name: &str) -> GroupId {
        let owner_id = UserId::from_uuid(owner.id);
        let group = self
            .state
            .group_service
            .create_group(owner_id, name, Some(format!("{name} settings")))
            .await
            .expect("Failed to create group");
        self.state
            .group_service
            .add_item(
                owner_id,
                group.id,
                CreateItem {
                    key: "DATABASE_URL".to_string(),
                    value: "postgres://db.internal/app".to_string(),
                    description: Some("primary database".to_string()),
                    tags: vec!["db".to_string()],
                },
            )
            .await
            .expect("Failed to add item");
        group.id
    }

    /// Share a group and return the response data
    pub async fn share(
        &self,
        owner: &TestUser,
        group: GroupId,
        share_type: &str,
        emails: &[&str],
    ) -> Value {
        let response = self
            .request(
                "POST",
                "/api/shares",
                Some(serde_json::json!({
                    "groupId": group.to_string(),
                    "type": share_type,
                    "emails": emails,
                })),
                Some(&owner.token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "share failed: {}",
            response.body
        );
        response.body["data"].clone()
    }

    /// Issue an invitation token the way the server does
    pub fn invitation_token(&self, email: &str, share_id: &str) -> String {
        InvitationTokenCodec::from_config(&self.config.auth)
            .issue(email, &ShareId::from(share_id))
            .expect("Failed to issue invitation token")
    }

    /// Token carried by the accept link mailed to `to`
    pub async fn mailed_token(&self, to: &str) -> String {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        let mail = loop {
            if let Some(mail) = self.mailer.sent_to(to).pop() {
                break mail;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "no invitation email for {to}"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        };
        mail.email
            .accept_url
            .split_once("token=")
            .map(|(_, token)| token.to_string())
            .expect("accept link carries a token")
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
