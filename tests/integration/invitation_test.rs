//! Integration tests for accepting, rejecting and resending invitations.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_accept_with_mailed_token_and_session() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let token = app.mailed_token("bob@example.com").await;

    let response = app
        .request(
            "POST",
            &format!("/api/shares/{id}/accept?token={token}"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["status"], "ACCEPTED");
    assert!(response.body["data"]["respondedAt"].is_string());

    // Accepting twice is a no-op.
    let again = app
        .request("POST", &format!("/api/shares/{id}/accept"), None, Some(&bob.token))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["respondedAt"], response.body["data"]["respondedAt"]);
}

#[tokio::test]
async fn test_accept_with_token_for_other_email_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let carol = app.user("carol@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com", "carol@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let bobs_token = app.mailed_token("bob@example.com").await;

    let response = app
        .request(
            "POST",
            &format!("/api/shares/{id}/accept?token={bobs_token}"),
            None,
            Some(&carol.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_accept_by_uninvited_user_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let mallory = app.user("mallory@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request("POST", &format!("/api/shares/{id}/accept"), None, Some(&mallory.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reject_without_session_then_accept_fails() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let token = app.mailed_token("bob@example.com").await;

    let rejected = app
        .request("POST", &format!("/api/shares/{id}/reject?token={token}"), None, None)
        .await;
    assert_eq!(rejected.status, StatusCode::OK, "{}", rejected.body);
    assert_eq!(rejected.body["data"]["status"], "REJECTED");

    let accepted = app
        .request("POST", &format!("/api/shares/{id}/accept?token={token}"), None, None)
        .await;
    assert_eq!(accepted.status, StatusCode::BAD_REQUEST);
    assert_eq!(accepted.body["error"], "INVALID_STATE");
}

#[tokio::test]
async fn test_reject_requires_valid_token() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let missing = app
        .request("POST", &format!("/api/shares/{id}/reject"), None, None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let token = app.mailed_token("bob@example.com").await;
    let truncated = &token[..token.len() / 2];
    let garbled = app
        .request(
            "POST",
            &format!("/api/shares/{id}/reject?token={truncated}"),
            None,
            None,
        )
        .await;
    assert_eq!(garbled.status, StatusCode::BAD_REQUEST);
    assert_eq!(garbled.body["error"], "INVALID_INPUT");

    let other_share = app.invitation_token("bob@example.com", "AAAAAAAAAAAAAAAAAAAAA");
    let mismatched = app
        .request(
            "POST",
            &format!("/api/shares/{id}/reject?token={other_share}"),
            None,
            None,
        )
        .await;
    assert_eq!(mismatched.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resend_keeps_invitation_and_sends_again() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    let original = share["invitations"][0].clone();
    app.mailed_token("bob@example.com").await;

    let response = app
        .request(
            "POST",
            &format!("/api/shares/{id}/invitations/BOB@example.com/resend"),
            None,
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["data"]["id"], original["id"]);
    assert_eq!(response.body["data"]["invitedAt"], original["invitedAt"]);
    assert_eq!(app.mailer.sent_to("bob@example.com").len(), 2);

    let details = app
        .request("GET", &format!("/api/shares/{id}"), None, Some(&alice.token))
        .await;
    assert_eq!(
        details.body["data"]["invitations"]
            .as_array()
            .expect("array")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_resend_reports_delivery_failure() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");
    app.mailed_token("bob@example.com").await;
    app.mailer.set_failing(true);

    let response = app
        .request(
            "POST",
            &format!("/api/shares/{id}/invitations/bob@example.com/resend"),
            None,
            Some(&alice.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "EXTERNAL_SERVICE");
}

#[tokio::test]
async fn test_only_owner_can_resend() {
    let app = helpers::TestApp::new().await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let group = app.group(&alice, "production").await;
    let share = app
        .share(&alice, group, "PRIVATE", &["bob@example.com"])
        .await;
    let id = share["id"].as_str().expect("id");

    let response = app
        .request(
            "POST",
            &format!("/api/shares/{id}/invitations/bob@example.com/resend"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
