//! In-process mock backend for integration tests.
//!
//! Both servers bind `127.0.0.1:0`, so tests never collide on ports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hyper::body::to_bytes;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use tokio::net::TcpListener;
#[cfg(feature = "ws-native")]
use tokio::net::TcpStream;
#[cfg(feature = "ws-native")]
use tokio_tungstenite::WebSocketStream;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

// ─── WebSocket ───────────────────────────────────────────────────────────────

#[cfg(feature = "ws-native")]
pub struct WsServer {
    /// `ws://127.0.0.1:<port>/ws`
    pub url: String,
    /// Handshakes accepted so far.
    pub connections: Arc<AtomicUsize>,
}

/// Accept WebSocket connections forever, running `handler` on each one.
#[cfg(feature = "ws-native")]
pub async fn ws_server<F, Fut>(handler: F) -> WsServer
where
    F: Fn(WebSocketStream<TcpStream>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&connections);
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                if let Ok(ws) = tokio_tungstenite::accept_async(tcp).await {
                    counter.fetch_add(1, Ordering::SeqCst);
                    handler(ws).await;
                }
            });
        }
    });

    WsServer {
        url: format!("ws://{}/ws", addr),
        connections,
    }
}

/// Poll `cond` until it holds or the test timeout expires.
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cond()
}

// ─── REST ────────────────────────────────────────────────────────────────────

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

pub struct HttpServer {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl HttpServer {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Answer requests with the scripted `(status, body)` pairs in order.
/// Once the script runs out every request gets a 500. A 429 carries
/// `Retry-After: 1`.
pub async fn http_server(script: Vec<(u16, &'static str)>) -> HttpServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let std_listener = listener.into_std().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let requests = Arc::new(Mutex::new(Vec::new()));
    let script = Arc::new(Mutex::new(VecDeque::from(script)));

    let log = Arc::clone(&requests);
    let make_svc = make_service_fn(move |_| {
        let log = Arc::clone(&log);
        let script = Arc::clone(&script);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let log = Arc::clone(&log);
                let script = Arc::clone(&script);
                async move { Ok::<_, Infallible>(respond(req, log, script).await) }
            }))
        }
    });
    let server = Server::from_tcp(std_listener).unwrap().serve(make_svc);
    tokio::spawn(async move {
        if let Err(err) = server.await {
            eprintln!("mock REST server exited with error: {err}");
        }
    });

    HttpServer {
        base_url: format!("http://{}", addr),
        requests,
    }
}

async fn respond(
    req: Request<Body>,
    log: Arc<Mutex<Vec<Recorded>>>,
    script: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
) -> Response<Body> {
    let (parts, body) = req.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_ascii_lowercase(),
                String::from_utf8_lossy(v.as_bytes()).to_string(),
            )
        })
        .collect();
    let body = to_bytes(body).await.unwrap_or_default();

    log.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let (status, payload) = script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, r#"{"error":"unscripted request"}"#));
    let mut response = Response::builder()
        .status(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .header("content-type", "application/json");
    if status == 429 {
        response = response.header("retry-after", "1");
    }
    response.body(Body::from(payload)).unwrap()
}
