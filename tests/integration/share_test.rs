//! Integration tests for share management.

mod helpers;

use http::StatusCode;

use keyhub_core::types::{ShareId, UserId};
use keyhub_database::InvitationStore;

#[tokio::test]
async fn test_create_private_share_dedupes_invitees() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;

    let share = app
        .share(
            &alice,
            group,
            "PRIVATE",
            &["bob@example.com", " BOB@example.com ", "carol@example.com"],
        )
        .await;

    let id = share["id"].as_str().expect("id");
    assert_eq!(id.len(), 21);
    assert_eq!(share["type"], "PRIVATE");
    assert_eq!(share["shareUrl"], format!("http://keyhub.test/share/{id}"));
    assert_eq!(share["group"]["name"], "production");

    let invitations = share["invitations"].as_array().expect("invitations");
    let emails: Vec<&str> = invitations
        .iter()
        .map(|i| i["email"].as_str().expect("email"))
        .collect();
    assert_eq!(emails, ["bob@example.com", "carol@example.com"]);
    assert!(invitations.iter().all(|i| i["status"] == "PENDING"));
}

#[tokio::test]
async fn test_public_share_has_no_invitations() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "staging").await;

    let share = app
        .share(&alice, group, "public", &["bob@example.com"])
        .await;
    assert_eq!(share["type"], "PUBLIC");
    assert!(share["invitations"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_private_share_without_emails_is_rejected() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "staging").await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({
                "groupId": group.to_string(),
                "type": "PRIVATE",
                "emails": [],
            })),
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_share_requires_session() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({ "groupId": uuid::Uuid::nil().to_string(), "type": "PUBLIC" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/api/shares", None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_one_share_per_group_until_revoked() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;

    let first = app.share(&alice, group, "PUBLIC", &[]).await;
    let first_id = first["id"].as_str().expect("id");

    let body = serde_json::json!({ "groupId": group.to_string(), "type": "PUBLIC" });
    let second = app
        .request("POST", "/api/shares", Some(body.clone()), Some(&alice.token))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let revoked = app
        .request(
            "DELETE",
            &format!("/api/shares/{first_id}"),
            None,
            Some(&alice.token),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::NO_CONTENT);

    let third = app
        .request("POST", "/api/shares", Some(body), Some(&alice.token))
        .await;
    assert_eq!(third.status, StatusCode::CREATED);
    assert_ne!(third.body["data"]["id"], first["id"]);
}

#[tokio::test]
async fn test_revoke_cascades_invitations() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request("DELETE", &format!("/api/shares/{id}"), None, Some(&alice.token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let remaining = app
        .store
        .list_by_share(&ShareId::from(id))
        .await
        .expect("list");
    assert!(remaining.is_empty());

    let content = app
        .request("GET", &format!("/api/shares/{id}/content"), None, None)
        .await;
    assert_eq!(content.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_deletion_cascades_to_share() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    app.state
        .group_service
        .delete_group(UserId::from_uuid(alice.id), group)
        .await
        .expect("delete group");

    assert!(
        app.store
            .list_by_share(&ShareId::from(id))
            .await
            .expect("list")
            .is_empty()
    );
    let listed = app.request("GET", "/api/shares", None, Some(&alice.token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed.body["data"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_other_users_cannot_see_or_revoke_share() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let mallory = app.user("mallory@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app.share(&alice, group, "PUBLIC", &[]).await;
    let id = share["id"].as_str().expect("id");

    let get = app
        .request("GET", &format!("/api/shares/{id}"), None, Some(&mallory.token))
        .await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let delete = app
        .request("DELETE", &format!("/api/shares/{id}"), None, Some(&mallory.token))
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let create = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({ "groupId": group.to_string(), "type": "PUBLIC" })),
            Some(&mallory.token),
        )
        .await;
    assert_eq!(create.status, StatusCode::NOT_FOUND);

    let own = app.request("GET", "/api/shares", None, Some(&mallory.token)).await;
    assert!(own.body["data"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_mail_failure_does_not_fail_share_creation() {
    let app = helpers::TestApp::new().await;
    app.mailer.set_failing(true);
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;

    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    assert_eq!(share["invitations"].as_array().expect("array").len(), 1);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_invitation_email_links_back_to_share() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let token = app.mailed_token("bob@example.com").await;
    let mail = app
        .mailer
        .sent_to("bob@example.com")
        .pop()
        .expect("mail");
    assert_eq!(mail.email.group_name, "production");
    assert_eq!(mail.email.inviter_email, "alice@example.com");
    assert_eq!(
        mail.email.accept_url,
        format!("http://keyhub.test/share/{id}/accept?token={token}")
    );
    assert!(mail.email.reject_url.contains(&format!("/share/{id}/reject?token=")));
}
