//! Soft and strict calls against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port in a background tokio
//! runtime, then drives the client over real HTTP through the default ureq
//! driver. This covers what the unit tests cannot: header and body delivery,
//! status mapping from the wire, and timeout classification.

use std::net::SocketAddr;
use std::time::Duration;

use courier_core::{
    Client, ClientConfig, ClientError, ErrorHandler, HttpMethod, ParsedBody, Skip, SkipList,
    TransportError,
};
use mock_server::Echo;
use serde_json::json;

fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(skip: SkipList) -> Client {
    Client::new(ClientConfig::default(), ErrorHandler::new(skip))
}

#[test]
fn json_request_reaches_the_server() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Create user", format!("http://{addr}/echo"))
        .header("X-Trace", "t-1")
        .data(json!({"name": "ada", "admin": false}))
        .json();
    let response = client.post(request).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.message, "OK");

    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.headers["content-type"], "application/json");
    assert_eq!(echo.headers["x-trace"], "t-1");
    let sent: serde_json::Value = serde_json::from_str(&echo.body).unwrap();
    assert_eq!(sent, json!({"name": "ada", "admin": false}));
}

#[test]
fn form_request_reaches_the_server_verbatim() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Update settings", format!("http://{addr}/echo"))
        .data("theme=dark&lang=en")
        .form();
    let response = client.put_strict(request).unwrap().unwrap();

    let echo: Echo = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body, "theme=dark&lang=en");
    assert_eq!(echo.headers["content-type"], "application/x-www-form-urlencoded");
}

#[test]
fn soft_call_returns_error_statuses() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Load report", format!("http://{addr}/status/503"))
        .json();
    let response = client.get(request).unwrap();
    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert_eq!(response.message, "Service Unavailable");
}

#[test]
fn strict_call_raises_diagnostic_for_forbidden() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Archive project", format!("http://{addr}/status/403"))
        .data(json!({"id": 9}))
        .json();
    let err = client.post_strict(request).unwrap_err();
    assert!(matches!(err, ClientError::Diagnostic(_)));

    let ctx = err.context().unwrap();
    assert_eq!(ctx.title, "Archive project");
    assert_eq!(ctx.client_request.method, HttpMethod::Post);
    assert_eq!(ctx.client_request.body, Some(ParsedBody::Parsed(json!({"id": 9}))));
    let response = ctx.client_response.unwrap();
    assert_eq!(response.code, 403);
    assert_eq!(response.body, ParsedBody::Parsed(json!({"status": 403})));
}

#[test]
fn large_error_bodies_still_reach_the_handler() {
    let addr = spawn_server();
    let client = client(SkipList::new());
    let size = 11 * 1024 * 1024;

    let request = client
        .request("Fetch dump", format!("http://{addr}/filler/502/{size}"))
        .text();
    let response = client.get(request.clone()).unwrap();
    assert_eq!(response.status, 502);
    assert_eq!(response.body.len(), size);

    let err = client.get_strict(request).unwrap_err();
    assert!(matches!(err, ClientError::Diagnostic(_)));
    let ctx = err.context().unwrap();
    assert_eq!(ctx.client_response.map(|r| r.code), Some(502));
}

#[test]
fn strict_call_skips_listed_status() {
    let addr = spawn_server();
    let client = client(SkipList::from([Skip::Status(403)]));

    let request = client
        .request("Delete project", format!("http://{addr}/status/403"))
        .json();
    let response = client.delete_strict(request).unwrap();
    assert_eq!(response.map(|r| r.status), Some(403));
}

#[test]
fn strict_call_raises_timeout() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Slow export", format!("http://{addr}/delay/2000"))
        .read_timeout(Duration::from_millis(200))
        .text();
    let err = client.get_strict(request).unwrap_err();
    match err {
        ClientError::Timeout(ref timeout) => {
            assert_eq!(timeout.title(), "Slow export");
            assert!(err.context().unwrap().client_response.is_none());
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn strict_call_skips_timeout() {
    let addr = spawn_server();
    let client = client(SkipList::from([Skip::Timeout]));

    let request = client
        .request("Slow export", format!("http://{addr}/delay/2000"))
        .read_timeout(Duration::from_millis(200))
        .text();
    assert!(client.get_strict(request).unwrap().is_none());
}

#[test]
fn soft_call_surfaces_timeout_as_transport_error() {
    let addr = spawn_server();
    let client = client(SkipList::new());

    let request = client
        .request("Slow export", format!("http://{addr}/delay/2000"))
        .read_timeout(Duration::from_millis(200))
        .text();
    let err = client.get(request).unwrap_err();
    assert!(err.is_timeout());
}

#[test]
fn config_read_timeout_applies_without_call_override() {
    let addr = spawn_server();
    let client = Client::new(
        ClientConfig::default().with_read_timeout(Duration::from_millis(200)),
        ErrorHandler::default(),
    );

    let request = client
        .request("Slow export", format!("http://{addr}/delay/2000"))
        .text();
    assert_eq!(request.read_timeout(), Duration::from_millis(200));
    let err = client.get_strict(request).unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)));
}

#[test]
fn client_exposes_its_config_and_handler() {
    let client = Client::new(
        ClientConfig::default().with_open_timeout(Duration::from_secs(4)),
        ErrorHandler::new(SkipList::from([Skip::Status(409)])),
    );
    assert_eq!(client.config().open_timeout(), Some(Duration::from_secs(4)));
    assert!(client.handler().skip_list().skips_status(409));
    assert!(!client.handler().skip_list().is_empty());

    let request = client.request("Ping", "http://localhost/").text();
    assert_eq!(request.open_timeout(), Duration::from_secs(4));
}

#[test]
fn refused_connection_propagates_untranslated() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client(SkipList::from([Skip::Timeout]));

    let request = client
        .request("Ping", format!("http://{addr}/"))
        .open_timeout(Duration::from_secs(2))
        .text();
    let err = client.get_strict(request).unwrap_err();
    match err {
        ClientError::Transport(transport) => assert!(!transport.is_timeout()),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[test]
fn malformed_url_fails_at_dispatch() {
    let client = client(SkipList::new());

    let request = client.request("Broken", "not a url").text();
    let err = client.get(request).unwrap_err();
    assert!(matches!(err, TransportError::Other(_)));
}
