//! Integration tests for `HttpDispatcher` against a local stub server.
//!
//! Each test binds a throwaway `TcpListener`, answers a single request with
//! a canned HTTP response, and hands back the raw request text so the
//! headers the dispatcher sent can be checked.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fleetctl::config::ApiConfig;
use fleetctl::{DispatchError, Dispatcher, HttpAction, HttpDispatcher, Payload, UserProfileRequester};

/// Serve one connection with `status` and `body`, returning the request seen.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (base_url, handle)
}

/// Read request head plus any `Content-Length` body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn api_config(base_url: &str, token: Option<&str>) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        token: token.map(str::to_string),
        timeout_secs: 5,
    }
}

/// Case-insensitive header lookup in a raw request.
fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
    request.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[tokio::test]
async fn get_myself_fetches_profile_over_http() {
    let (base_url, server) = serve_once("200 OK", r#"{"id": 1, "name": "Alice"}"#).await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, Some("abc123"))).unwrap();
    let requester = UserProfileRequester::new(dispatcher);

    let profile = requester.get_myself().await.unwrap();
    assert_eq!(profile, json!({ "id": 1, "name": "Alice" }));

    let request = server.await.unwrap();
    assert!(
        request.starts_with("GET /api/users/me HTTP/1.1\r\n"),
        "got: {request}"
    );
    assert_eq!(header(&request, "authorization"), Some("Token abc123"));
    assert_eq!(header(&request, "accept"), Some("application/json"));
    assert!(header(&request, "user-agent").unwrap().starts_with("fleetctl/"));
    let request_id = header(&request, "x-request-id").unwrap();
    assert_eq!(request_id.len(), 36, "expected a UUID, got {request_id}");
}

#[tokio::test]
async fn request_without_token_has_no_authorization_header() {
    let (base_url, server) = serve_once("200 OK", "{}").await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, None)).unwrap();

    dispatcher
        .dispatch(HttpAction::Get, Payload::url("users/me"))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert_eq!(header(&request, "authorization"), None);
}

#[tokio::test]
async fn unauthorized_maps_to_unauthenticated() {
    let (base_url, server) = serve_once(
        "401 Unauthorized",
        r#"{"detail": "Invalid token."}"#,
    )
    .await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, Some("stale"))).unwrap();
    let requester = UserProfileRequester::new(dispatcher);

    let err = requester.get_myself().await.unwrap_err();
    server.await.unwrap();

    assert!(err.is_unauthenticated(), "got: {err:?}");
    assert_eq!(err.to_string(), "not authenticated (HTTP 401): Invalid token.");
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"detail": "Not found."}"#).await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, None)).unwrap();

    let err = dispatcher
        .dispatch(HttpAction::Get, Payload::url("users/me"))
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        DispatchError::NotFound { url } => assert!(url.ends_with("/api/users/me"), "got: {url}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let (base_url, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, None)).unwrap();

    let err = dispatcher
        .dispatch(HttpAction::Get, Payload::url("users/me"))
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        DispatchError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn write_actions_send_json_body() {
    let (base_url, server) = serve_once("201 Created", r#"{"id": 5}"#).await;
    let dispatcher = HttpDispatcher::new(&api_config(&base_url, Some("tok"))).unwrap();

    let created = dispatcher
        .dispatch(
            HttpAction::Post,
            Payload::with_body("drives", json!({ "car": 3, "distance": 120 })),
        )
        .await
        .unwrap();
    assert_eq!(created, json!({ "id": 5 }));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/drives HTTP/1.1\r\n"), "got: {request}");
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    let sent: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(sent, json!({ "car": 3, "distance": 120 }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody is listening on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher =
        HttpDispatcher::new(&api_config(&format!("http://{addr}/api/"), None)).unwrap();
    let err = dispatcher
        .dispatch(HttpAction::Get, Payload::url("users/me"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, DispatchError::Transport { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        // Hold the connection open without answering
        tokio::time::sleep(Duration::from_secs(3)).await;
        drop(socket);
    });

    let dispatcher = HttpDispatcher::new(&ApiConfig {
        base_url: format!("http://{addr}/api/"),
        token: None,
        timeout_secs: 1,
    })
    .unwrap();
    let err = dispatcher
        .dispatch(HttpAction::Get, Payload::url("users/me"))
        .await
        .unwrap_err();
    server.abort();

    assert!(
        matches!(err, DispatchError::Timeout { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn escaping_path_is_rejected_before_sending() {
    let dispatcher = HttpDispatcher::new(&api_config("http://127.0.0.1:9/api/", None)).unwrap();
    let err = dispatcher
        .dispatch(HttpAction::Get, Payload::url("../admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidUrl(_)), "got: {err:?}");
}
