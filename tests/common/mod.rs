//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request path and returns `(status, body)`.
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
                        let path = read_request_path(&mut socket).await.unwrap_or_default();
                        let (status, body) = f(path).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
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

async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

/// Knobs and counters of a mock storage service.
#[derive(Clone)]
pub struct MockStorage {
    pub addr: SocketAddr,
    /// `/status` reports `{"state":"OK"}` when true, `{"state":"DOWN"}` otherwise.
    pub healthy: Arc<AtomicBool>,
    /// Status code returned by `/data`.
    pub data_status: Arc<AtomicU16>,
    /// Delay before answering any request.
    pub delay_ms: Arc<AtomicU64>,
    pub data_hits: Arc<AtomicU32>,
    pub status_hits: Arc<AtomicU32>,
}

impl MockStorage {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn data_hits(&self) -> u32 {
        self.data_hits.load(Ordering::SeqCst)
    }

    pub fn status_hits(&self) -> u32 {
        self.status_hits.load(Ordering::SeqCst)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_data_status(&self, status: u16) {
        self.data_status.store(status, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

/// Start a mock storage service whose `/data` body is `{"data":"<name>"}`.
pub async fn start_storage_service(name: &'static str) -> MockStorage {
    let healthy = Arc::new(AtomicBool::new(true));
    let data_status = Arc::new(AtomicU16::new(200));
    let delay_ms = Arc::new(AtomicU64::new(0));
    let data_hits = Arc::new(AtomicU32::new(0));
    let status_hits = Arc::new(AtomicU32::new(0));

    let (h, ds, d, dh, sh) = (
        healthy.clone(),
        data_status.clone(),
        delay_ms.clone(),
        data_hits.clone(),
        status_hits.clone(),
    );
    let addr = start_programmable_backend(move |path| {
        let (h, ds, d, dh, sh) = (h.clone(), ds.clone(), d.clone(), dh.clone(), sh.clone());
        async move {
            let delay = d.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            match path.as_str() {
                "/status" => {
                    sh.fetch_add(1, Ordering::SeqCst);
                    let state = if h.load(Ordering::SeqCst) { "OK" } else { "DOWN" };
                    (200, format!(r#"{{"state":"{state}"}}"#))
                }
                "/data" => {
                    dh.fetch_add(1, Ordering::SeqCst);
                    (ds.load(Ordering::SeqCst), format!(r#"{{"data":"{name}"}}"#))
                }
                _ => (404, r#"{"error":"not found"}"#.to_string()),
            }
        }
    })
    .await;

    MockStorage {
        addr,
        healthy,
        data_status,
        delay_ms,
        data_hits,
        status_hits,
    }
}

/// A local address with nothing listening on it.
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Poll `check` every 20ms until it holds or `within` elapses.
pub async fn eventually<F>(within: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
