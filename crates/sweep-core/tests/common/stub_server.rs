//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each GET is answered by a routing closure keyed on the request path. Every
//! response carries `Connection: close`, so each request uses a fresh connection.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How the server answers one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Given status with a short text body.
    Status(u16),
    /// 200 advertising `declared_len` bytes but closing after `body`.
    Truncated { body: Vec<u8>, declared_len: usize },
    /// 302 to `location`.
    Redirect(String),
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: Option<String>,
}

pub struct StubServer {
    base: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubServer {
    /// Base URL ending in `/`, e.g. "http://127.0.0.1:12345/".
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start<F>(route: F) -> StubServer
where
    F: Fn(&str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let route = Arc::new(route);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let route = Arc::clone(&route);
            let seen = Arc::clone(&seen_srv);
            thread::spawn(move || handle(stream, route.as_ref(), &seen));
        }
    });
    StubServer {
        base: format!("http://127.0.0.1:{}/", port),
        seen,
    }
}

/// Last path segment as an integer id, if it is one.
pub fn trailing_id(path: &str) -> Option<u64> {
    path.rsplit('/').next()?.parse().ok()
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(data).ok()
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

fn handle<F>(mut stream: TcpStream, route: &F, seen: &Mutex<Vec<SeenRequest>>)
where
    F: Fn(&str) -> Reply,
{
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(head) = read_head(&mut stream) else {
        return;
    };
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/").to_string();
    let user_agent = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("user-agent"))
        .map(|(_, v)| v.trim().to_string());
    seen.lock().unwrap().push(SeenRequest {
        path: path.clone(),
        user_agent,
    });

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let (status, extra, declared, body) = match route(&path) {
        Reply::Body(body) => (200, String::new(), body.len(), body),
        Reply::Status(code) => {
            let body = format!("status {}", code).into_bytes();
            (code, String::new(), body.len(), body)
        }
        Reply::Truncated { body, declared_len } => (200, String::new(), declared_len, body),
        Reply::Redirect(location) => (302, format!("Location: {}\r\n", location), 0, Vec::new()),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        declared,
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
    let _ = stream.shutdown(std::net::Shutdown::Both);
}
