//! GitHub provider integration tests using wiremock
//!
//! Organization logins from `GET /user/orgs` act as group paths.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use authgate::error::GateError;
use authgate::identity::{AllowedGroups, Decision, ExternalIdentity};
use authgate::providers::{GithubProvider, IdentityProvider};

use common::{client, mount_page, mount_profile};

fn provider(server: &MockServer) -> GithubProvider {
    GithubProvider::new(&server.uri(), 100).expect("valid api url")
}

#[tokio::test]
async fn test_resolve_profile_uses_login_and_private_email() {
    let server = MockServer::start().await;
    mount_profile(
        &server,
        json!({"id": 583231, "login": "octocat", "email": null, "name": "The Octocat"}),
    )
    .await;

    let identity = provider(&server).resolve_profile(&client()).await.unwrap();
    assert_eq!(identity, ExternalIdentity::new("octocat", ""));
}

#[tokio::test]
async fn test_authorize_organization_on_later_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/user/orgs",
        json!([{"login": "github"}, {"login": "rust-lang"}]),
        Some(format!("{base}/user/orgs/cursor/2")),
    )
    .await;
    mount_page(&server, "/user/orgs/cursor/2", json!([{"login": "acme"}]), None).await;

    let decision = provider(&server)
        .authorize(&client(), &AllowedGroups::new(["acme"]))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Authorized);
}

#[tokio::test]
async fn test_authorize_not_a_member() {
    let server = MockServer::start().await;
    mount_page(&server, "/user/orgs", json!([]), None).await;

    let decision = provider(&server)
        .authorize(&client(), &AllowedGroups::new(["acme"]))
        .await
        .unwrap();
    assert_eq!(decision, Decision::Forbidden);
}

#[tokio::test]
async fn test_org_listing_forbidden_scope_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/orgs"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Resource not accessible"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server)
        .authorize(&client(), &AllowedGroups::new(["acme"]))
        .await;
    assert!(matches!(
        result,
        Err(GateError::GroupFetchFailed { page: 1, .. })
    ));
}
