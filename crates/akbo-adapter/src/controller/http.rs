//! HTTP controller serving the akbo API
//!
//! A small HTTP/1.1 front: one request per connection, JSON
//! bodies, and only the routes below.
//!
//! | Method | Path       | Response                      |
//! |--------|------------|-------------------------------|
//! | GET    | `/healthz` | `200 {"status":"ok"}`         |

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

pub const SERVICE_TITLE: &str = "Akbo API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

const READ_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_HEADER_LINES: usize = 100;
/// Longest request or header line accepted, terminator included
const MAX_LINE_BYTES: u64 = 8 * 1024;

/// JSON response ready to be written to the socket
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub allow: Option<&'static str>,
    pub body: Value,
}

impl Response {
    fn json(status: u16, reason: &'static str, body: Value) -> Self {
        Self {
            status,
            reason,
            allow: None,
            body,
        }
    }

    fn detail(status: u16, reason: &'static str) -> Self {
        Self::json(status, reason, json!({ "detail": reason }))
    }

    pub fn bad_request() -> Self {
        Self::detail(400, "Bad Request")
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let body = self.body.to_string();
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            self.reason,
            body.len()
        );
        if let Some(allow) = self.allow {
            head.push_str(&format!("Allow: {}\r\n", allow));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(body.as_bytes());
        bytes
    }
}

/// Split `GET /path HTTP/1.1` into method and target
pub fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;

    if parts.next().is_some() || !version.starts_with("HTTP/") || !target.starts_with('/') {
        return None;
    }
    Some((method, target))
}

/// Map a request to its response. Query strings do not affect routing.
pub fn route(method: &str, target: &str) -> Response {
    let path = target.split('?').next().unwrap_or(target);

    match path {
        "/healthz" => match method {
            "GET" => Response::json(200, "OK", json!({ "status": "ok" })),
            _ => Response {
                allow: Some("GET"),
                ..Response::detail(405, "Method Not Allowed")
            },
        },
        _ => Response::detail(404, "Not Found"),
    }
}

/// HTTP server bound to a socket
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    /// Bind the listener (`host:port`; port 0 picks a free port)
    pub async fn bind(addr: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` completes
    pub async fn serve_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!("{} v{} listening on http://{}", SERVICE_TITLE, SERVICE_VERSION, addr);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Connection from {}", peer);
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream).await {
                                    error!("Error handling connection from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => warn!("Failed to accept connection: {}", e),
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutting down HTTP server");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn handle_connection(mut stream: TcpStream) -> io::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut reader = BufReader::new(reader);

    let head = match tokio::time::timeout(READ_TIMEOUT, read_head(&mut reader)).await {
        Ok(result) => result?,
        Err(_) => {
            debug!("Client timed out before sending a request");
            return Ok(());
        }
    };

    let response = match head {
        Head::Empty => return Ok(()),
        Head::Malformed => {
            warn!("Request head too long or not UTF-8");
            Response::bad_request()
        }
        Head::Request(request_line) => match parse_request_line(&request_line) {
            Some((method, target)) => {
                let response = route(method, target);
                info!(method, target, status = response.status, "request");
                response
            }
            None => {
                warn!("Malformed request line: {:?}", request_line);
                Response::bad_request()
            }
        },
    };

    writer.write_all(&response.to_bytes()).await?;
    writer.flush().await?;
    writer.shutdown().await?;
    Ok(())
}

/// What the peer sent before the body
#[derive(Debug, PartialEq, Eq)]
enum Head {
    /// Connection closed without a byte
    Empty,
    /// Request line with the terminator stripped; headers were skipped
    Request(String),
    /// A line over `MAX_LINE_BYTES`, or a request line that is not UTF-8
    Malformed,
}

enum Line {
    Eof,
    TooLong,
    Bytes(Vec<u8>),
}

/// Read one line, never buffering more than `MAX_LINE_BYTES`
async fn read_line_capped<R>(reader: &mut R) -> io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES)
        .read_until(b'\n', &mut buf)
        .await?;

    if read == 0 {
        Ok(Line::Eof)
    } else if buf.last() != Some(&b'\n') && read as u64 == MAX_LINE_BYTES {
        Ok(Line::TooLong)
    } else {
        Ok(Line::Bytes(buf))
    }
}

/// Read the request line and skip headers
async fn read_head<R>(reader: &mut R) -> io::Result<Head>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line_capped(reader).await? {
        Line::Eof => return Ok(Head::Empty),
        Line::TooLong => return Ok(Head::Malformed),
        Line::Bytes(bytes) => bytes,
    };

    for _ in 0..MAX_HEADER_LINES {
        match read_line_capped(reader).await? {
            Line::Eof => break,
            Line::TooLong => return Ok(Head::Malformed),
            Line::Bytes(header) if header == b"\r\n" || header == b"\n" => break,
            Line::Bytes(_) => {}
        }
    }

    match String::from_utf8(request_line) {
        Ok(text) => Ok(Head::Request(text.trim_end().to_string())),
        Err(_) => Ok(Head::Malformed),
    }
}
