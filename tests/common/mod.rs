use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;

use reqwest::Client;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use authgate::config::HttpConfig;
use authgate::http::authenticated_client;

#[allow(dead_code)]
pub const TOKEN: &str = "test-token";

/// Client carrying `Authorization: Bearer test-token`.
#[allow(dead_code)]
pub fn client() -> Client {
    authenticated_client(TOKEN, &HttpConfig::default()).expect("failed to build client")
}

/// `Link` header value announcing `url` as the next page.
#[allow(dead_code)]
pub fn next_link(url: &str) -> String {
    format!(r#"<{url}>; rel="next""#)
}

/// Base URL of a local port with nothing listening on it.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Mounts a `GET /user` mock that requires the test bearer token.
#[allow(dead_code)]
pub async fn mount_profile(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts one page of a listing at `route`, optionally linking to `next`.
#[allow(dead_code)]
pub async fn mount_page(
    server: &MockServer,
    route: &str,
    body: serde_json::Value,
    next: Option<String>,
) {
    let mut response = ResponseTemplate::new(200).set_body_json(body);
    if let Some(next) = next {
        response = response.insert_header("link", next_link(&next).as_str());
    }

    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("authgate.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
