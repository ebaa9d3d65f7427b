//! Minimal static file server for the built site.
//!
//! Blocking, one thread per connection, one request per connection
//! (`Connection: close`). Only `GET` and `HEAD` are answered.
//!
//! ## Path mapping
//!
//! ```text
//! /                   → <root>/index.html
//! /images/a.jpg       → <root>/images/a.jpg
//! /images/            → <root>/images/index.html
//! /images/a.jpg?v=2   → <root>/images/a.jpg      (query ignored)
//! /../secret          → 404
//! ```
//!
//! Percent-escapes are decoded before mapping. Any `..` (or other
//! non-plain) path component is answered with 404.

use crate::config::ServerSettings;
use percent_encoding::percent_decode_str;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Everything the server needs, passed in explicitly at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory served at `/`.
    pub root: PathBuf,
    pub address: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            root: settings.root.clone(),
            address: settings.address.clone(),
            port: settings.port,
        }
    }
}

/// A bound listener, ready to [`run`](Server::run).
pub struct Server {
    listener: TcpListener,
    root: PathBuf,
}

impl Server {
    pub fn bind(config: &ServerConfig) -> Result<Self, ServeError> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(&addr).map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        Ok(Self {
            listener,
            root: config.root.clone(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub fn run(self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let root = self.root.clone();
                    thread::spawn(move || handle_connection(stream, &root));
                }
                Err(e) => log::warn!("accept failed: {e}"),
            }
        }
    }
}

/// Bind and serve until the process is stopped.
pub fn serve(config: &ServerConfig) -> Result<(), ServeError> {
    let server = Server::bind(config)?;
    log::info!(
        "serving {} on {}",
        config.root.display(),
        config.socket_addr()
    );
    server.run();
    Ok(())
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Response {
    fn text(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }
}

fn handle_connection(mut stream: TcpStream, root: &Path) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let Some((method, target)) = read_request_line(&stream) else {
        return;
    };

    let response = match method.as_str() {
        "GET" | "HEAD" => respond(root, &target),
        _ => Response::text("405 Method Not Allowed", "Method Not Allowed"),
    };
    log::debug!("{method} {target} -> {}", response.status);

    let header = format!(
        "HTTP/1.1 {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    if method != "HEAD" {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}

/// Read the request line and drain the headers.
fn read_request_line(stream: &TcpStream) -> Option<(String, String)> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut header = String::new();
    loop {
        header.clear();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header.trim_end().is_empty() => break,
            Ok(_) => {}
        }
    }
    Some((method, target))
}

fn respond(root: &Path, target: &str) -> Response {
    let Some(path) = resolve_path(root, target) else {
        return Response::text("404 Not Found", "Not Found");
    };
    match std::fs::read(&path) {
        Ok(body) => Response {
            status: "200 OK",
            content_type: content_type(&path),
            body,
        },
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            Response::text("500 Internal Server Error", "Internal Server Error")
        }
    }
}

/// Map a request target onto a file under `root`, or `None` for 404.
fn resolve_path(root: &Path, target: &str) -> Option<PathBuf> {
    let path = target.split(['?', '#']).next().unwrap_or("");
    let decoded = percent_decode(path)?;
    let rel = Path::new(decoded.trim_start_matches('/'));
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    let mut file = root.join(rel);
    if file.is_dir() {
        file.push("index.html");
    }
    file.is_file().then_some(file)
}

/// Decode `%XX` escapes. A `%` not followed by two hex digits is kept as
/// is. `None` if the decoded bytes aren't UTF-8.
fn percent_decode(input: &str) -> Option<String> {
    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
