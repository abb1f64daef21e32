//! Shared utilities for integration tests.

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::Request;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

use whatsmyip::config::AppConfig;
use whatsmyip::http::build_router;
use whatsmyip::lifecycle::startup;
use whatsmyip::whois::{LookupService, OwnershipInfo};

/// Start a programmable mock whois provider on an ephemeral port.
///
/// `f` receives the request path and returns the status and body to send.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let path = read_request_path(&mut socket).await;
                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

/// A provider payload for a public address.
#[allow(dead_code)]
pub fn google_payload() -> String {
    r#"{"status":"success","country":"United States","countryCode":"US","regionName":"Virginia","city":"Ashburn","isp":"Google LLC","org":"Google Public DNS","as":"AS15169 Google LLC","query":"8.8.8.8"}"#.to_string()
}

/// A record like the one a stub provider would answer with.
#[allow(dead_code)]
pub fn test_info() -> OwnershipInfo {
    OwnershipInfo {
        status: "success".to_string(),
        country: "TestCountry".to_string(),
        country_code: "TC".to_string(),
        city: "TestCity".to_string(),
        isp: "TestISP".to_string(),
        org: "TestOrg".to_string(),
        ..OwnershipInfo::default()
    }
}

/// Router over a stub provider, with a fixed peer address.
#[allow(dead_code)]
pub fn test_router(config: &AppConfig, service: Arc<dyn LookupService>, peer: &str) -> Router {
    let state = startup::build_state_with(config, service).unwrap();
    build_router(state, Duration::from_secs(config.timeouts.request_secs))
        .layer(MockConnectInfo(peer.parse::<SocketAddr>().unwrap()))
}

/// Send a GET with the given headers and return status and body.
#[allow(dead_code)]
pub async fn get(router: Router, headers: &[(&str, &str)]) -> (u16, String) {
    let mut builder = Request::builder().uri("/");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}
