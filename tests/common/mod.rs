//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iiif_edge::config::EdgeConfig;
use iiif_edge::http::HttpServer;
use iiif_edge::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Canned upstream response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Request targets ("METHOD /path?query") seen by a mock upstream.
pub type Recorded = Arc<Mutex<Vec<String>>>;

/// Start a mock upstream that answers each request with `f(method, target)`.
pub async fn start_mock_upstream<F>(addr: SocketAddr, f: F) -> Recorded
where
    F: Fn(&str, &str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);
    let log = recorded.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let mut request_line = head.lines().next().unwrap_or_default().split(' ');
                let method = request_line.next().unwrap_or_default().to_string();
                let target = request_line.next().unwrap_or_default().to_string();
                log.lock().unwrap().push(format!("{method} {target}"));

                let response = f(&method, &target);
                let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
                for (name, value) in &response.headers {
                    out.push_str(&format!("{name}: {value}\r\n"));
                }
                out.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.body.len(),
                    response.body
                ));

                let _ = socket.write_all(out.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    recorded
}

/// Config pointing at the given edge and upstream addresses, with the
/// `/kittehs` alternate prefix.
pub fn edge_config(edge: SocketAddr, upstream: SocketAddr) -> EdgeConfig {
    let mut config: EdgeConfig = toml::from_str(
        r#"
        [[prefixes]]
        backend_path = "/{identifier}"
        cache_tier = "public-1h"

        [[prefixes]]
        prefix = "/kittehs"
        backend_path = "/cats/{identifier}"
        cache_tier = "surrogate-1h"

        [observability]
        metrics_enabled = false
        "#,
    )
    .unwrap();
    config.listener.bind_address = edge.to_string();
    config.upstream.address = upstream.to_string();
    config
}

/// A running edge server.
pub struct Edge {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<EdgeConfig>,
}

impl Drop for Edge {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_edge(config: EdgeConfig) -> Edge {
    let addr: SocketAddr = config.listener.bind_address.parse().unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    Edge {
        addr,
        shutdown,
        config_updates,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
