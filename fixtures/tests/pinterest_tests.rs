use serde_json::Value;
use std::process::{Child, Command};
use std::time::Duration;
use tokio::time::sleep;

fn start_pinterest_server(port: u16) -> Child {
    Command::new("cargo")
        .args([
            "run",
            "-p",
            "fixtures",
            "--bin",
            "pinterest",
            "--",
            "--port",
            &port.to_string(),
        ])
        .spawn()
        .expect("Failed to start Pinterest fixture server")
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    for _ in 0..60 {
        if client
            .get(format!("http://localhost:{port}/v5/boards"))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        sleep(Duration::from_millis(500)).await;
    }
    panic!("Server failed to start on port {port}");
}

#[tokio::test]
async fn test_code_exchange_requires_basic_auth() {
    let port = 9301;
    let mut server = start_pinterest_server(port);
    wait_for_server(port).await;

    let client = reqwest::Client::new();

    // Without Basic auth the exchange is refused
    let response = client
        .post(format!("http://localhost:{port}/v5/oauth/token"))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", "fixture_auth_code"),
            ("redirect_uri", "http://localhost:3000/token"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // With it, tokens come back
    let response = client
        .post(format!("http://localhost:{port}/v5/oauth/token"))
        .basic_auth("app-id", Some("app-secret"))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", "fixture_auth_code"),
            ("redirect_uri", "http://localhost:3000/token"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert!(json["access_token"].as_str().unwrap().starts_with("pina_"));
    assert_eq!(json["refresh_token"], "fixture-refresh-token");
    assert_eq!(json["expires_in"], 3600);

    // Cleanup
    server.kill().expect("Failed to kill server");
    server.wait().expect("Failed to wait for server");
}

#[tokio::test]
async fn test_refresh_grant_takes_credentials_in_the_body() {
    let port = 9302;
    let mut server = start_pinterest_server(port);
    wait_for_server(port).await;

    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://localhost:{port}/v5/oauth/token"))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", "fixture-refresh-token"),
            ("client_id", "app-id"),
            ("client_secret", "app-secret"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert!(json["access_token"].as_str().unwrap().starts_with("pina_"));
    // This grant does not rotate the refresh token
    assert!(json.get("refresh_token").is_none());

    // Cleanup
    server.kill().expect("Failed to kill server");
    server.wait().expect("Failed to wait for server");
}

#[tokio::test]
async fn test_resource_endpoints_require_a_bearer_token() {
    let port = 9303;
    let mut server = start_pinterest_server(port);
    wait_for_server(port).await;

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://localhost:{port}/v5/boards"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["message"], "Authentication failed");

    let response = client
        .get(format!("http://localhost:{port}/v5/boards"))
        .bearer_auth("any-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Recipes");

    // Cleanup
    server.kill().expect("Failed to kill server");
    server.wait().expect("Failed to wait for server");
}

#[tokio::test]
async fn test_authorize_redirects_back_with_code_and_state() {
    let port = 9304;
    let mut server = start_pinterest_server(port);
    wait_for_server(port).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .get(format!(
            "http://localhost:{port}/oauth/?client_id=app&redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Ftoken&response_type=code&state=abc123"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("http://localhost:3000/token?"));
    assert!(location.contains("code=fixture_auth_code"));
    assert!(location.contains("state=abc123"));

    // Cleanup
    server.kill().expect("Failed to kill server");
    server.wait().expect("Failed to wait for server");
}
