//! Minimal canned-response HTTP server for client tests.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};

const SERVICE_PATH: &str = "/controversy_webservice/";

/// Serves a fixed sequence of responses, one per connection, and records the
/// raw requests it received.
pub(crate) struct StubServer {
    addr: SocketAddr,
    requests: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl StubServer {
    pub(crate) async fn ok(body: &str) -> Self {
        Self::serve(vec![(200, "OK", body.to_string())]).await
    }

    pub(crate) async fn with_status(status: u16, reason: &'static str, body: &str) -> Self {
        Self::serve(vec![(status, reason, body.to_string())]).await
    }

    pub(crate) async fn serve(responses: Vec<(u16, &'static str, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for (status, reason, body) in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                let _ = tx.send(request);
            }
        });
        Self {
            addr,
            requests: Mutex::new(rx),
        }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}{SERVICE_PATH}", self.addr)
    }

    /// Next recorded request, headers and body.
    pub(crate) async fn request(&self) -> String {
        self.requests.lock().await.recv().await.unwrap()
    }
}

/// Base URL of a port nothing is listening on.
pub(crate) async fn refused_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{SERVICE_PATH}")
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
