//! Integration tests for viewing shared group content.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_public_share_is_visible_anonymously() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app.share(&alice, group, "PUBLIC", &[]).await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request("GET", &format!("/api/shares/{id}/content"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["canView"], true);
    assert_eq!(response.body["needsLogin"], false);

    let content = &response.body["share"];
    assert_eq!(content["type"], "PUBLIC");
    assert_eq!(content["group"]["name"], "production");
    assert_eq!(content["owner"]["email"], "alice@example.com");
    assert_eq!(content["items"][0]["key"], "DATABASE_URL");
    assert_eq!(content["items"][0]["tags"][0], "db");
}

#[tokio::test]
async fn test_owner_sees_private_share_without_invitation() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request("GET", &format!("/api/shares/{id}/content"), None, Some(&alice.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["canView"], true);
}

#[tokio::test]
async fn test_unknown_share_is_not_found() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request("GET", "/api/shares/AAAAAAAAAAAAAAAAAAAAA/content", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["canView"], false);
    assert_eq!(response.body["reason"], "share not found");
    assert_eq!(response.body["hint"], "NONE");
}

#[tokio::test]
async fn test_anonymous_private_view_needs_login_and_names_invitee() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let token = app.mailed_token("bob@example.com").await;

    let bare = app
        .request("GET", &format!("/api/shares/{id}/content"), None, None)
        .await;
    assert_eq!(bare.status, StatusCode::FORBIDDEN);
    assert_eq!(bare.body["reason"], "login required");
    assert_eq!(bare.body["hint"], "NEEDS_LOGIN");
    assert_eq!(bare.body["needsLogin"], true);
    assert!(bare.body.get("invitedEmail").is_none());
    assert!(bare.body.get("share").is_none());

    let with_token = app
        .request("GET", &format!("/api/shares/{id}/content?token={token}"), None, None)
        .await;
    assert_eq!(with_token.status, StatusCode::FORBIDDEN);
    assert_eq!(with_token.body["invitedEmail"], "bob@example.com");
}

#[tokio::test]
async fn test_uninvited_user_is_denied() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let mallory = app.user("mallory@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request("GET", &format!("/api/shares/{id}/content"), None, Some(&mallory.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["reason"], "not invited");
    assert_eq!(response.body["hint"], "NONE");
    assert_eq!(response.body["needsLogin"], false);
    assert_eq!(response.body["needsAcceptance"], false);
}

#[tokio::test]
async fn test_invitee_must_accept_before_viewing() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("Bob@Example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let path = format!("/api/shares/{id}/content");

    let pending = app.request("GET", &path, None, Some(&bob.token)).await;
    assert_eq!(pending.status, StatusCode::FORBIDDEN);
    assert_eq!(pending.body["reason"], "please accept the invitation first");
    assert_eq!(pending.body["hint"], "NEEDS_ACCEPTANCE");
    assert_eq!(pending.body["needsAcceptance"], true);

    let accepted = app
        .request("POST", &format!("/api/shares/{id}/accept"), None, Some(&bob.token))
        .await;
    assert_eq!(accepted.status, StatusCode::OK, "{}", accepted.body);

    let allowed = app.request("GET", &path, None, Some(&bob.token)).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["canView"], true);
    assert_eq!(allowed.body["share"]["items"][0]["value"], "postgres://db.internal/app");
}

#[tokio::test]
async fn test_rejected_invitee_stays_denied() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let token = app.mailed_token("bob@example.com").await;

    let rejected = app
        .request("POST", &format!("/api/shares/{id}/reject?token={token}"), None, None)
        .await;
    assert_eq!(rejected.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/shares/{id}/content"), None, Some(&bob.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["reason"], "you rejected this invitation");
    assert_eq!(response.body["hint"], "NONE");
}

#[tokio::test]
async fn test_revoked_public_share_disappears() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app.share(&alice, group, "PUBLIC", &[]).await;
    let id = share["id"].as_str().expect("id");

    app.request("DELETE", &format!("/api/shares/{id}"), None, Some(&alice.token))
        .await;

    let response = app
        .request("GET", &format!("/api/shares/{id}/content"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request("GET", "/api/health", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.body["data"]["backend"], "memory");
    assert_eq!(detailed.body["data"]["mailProvider"], "memory");
}
