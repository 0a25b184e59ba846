use std::{collections::BTreeMap, time::Duration};

use axum::{
    extract::Path,
    http::{HeaderMap, Method, StatusCode},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Longest delay `/delay/{ms}` will honor.
pub const MAX_DELAY_MS: u64 = 30_000;

/// Largest body `/filler/{code}/{bytes}` will produce.
pub const MAX_FILLER_BYTES: usize = 64 * 1024 * 1024;

/// What `/echo` saw of the incoming request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delayed {
    pub delayed_ms: u64,
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .route("/echo", any(echo))
        .route("/delay/{ms}", any(delay))
        .route("/filler/{code}/{bytes}", any(filler))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<StatusBody>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    debug!(code, "status requested");
    Ok((status, Json(StatusBody { status: code })))
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        headers,
        body,
    })
}

async fn delay(Path(ms): Path<u64>) -> Result<Json<Delayed>, StatusCode> {
    if ms > MAX_DELAY_MS {
        return Err(StatusCode::BAD_REQUEST);
    }
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Ok(Json(Delayed { delayed_ms: ms }))
}

async fn filler(Path((code, bytes)): Path<(u16, usize)>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    if bytes > MAX_FILLER_BYTES {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok((status, "x".repeat(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "POST".to_string(),
            headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
            body: "hello".to_string(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"]["content-type"], "text/plain");
        assert_eq!(json["body"], "hello");
    }

    #[test]
    fn status_body_roundtrips_through_json() {
        let body: StatusBody = serde_json::from_str(r#"{"status":418}"#).unwrap();
        assert_eq!(body, StatusBody { status: 418 });
    }

    #[test]
    fn echo_rejects_missing_body_field() {
        let result: Result<Echo, _> = serde_json::from_str(r#"{"method":"GET","headers":{}}"#);
        assert!(result.is_err());
    }
}
