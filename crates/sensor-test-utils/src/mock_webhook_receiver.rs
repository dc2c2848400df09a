//! A minimal HTTP server that captures posted JSON bodies, for exercising
//! the Notifier's delivery and retry behavior without a real webhook
//! endpoint. Deliberately hand-rolled rather than pulling in a web
//! framework — it only ever needs to understand one request shape.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct MockWebhookReceiver {
    host: String,
    port: u16,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MockWebhookReceiver {
    /// Bind a receiver that responds `500` to the first `fail_first_n`
    /// requests and `200` thereafter.
    pub async fn bind(fail_first_n: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("binding an ephemeral port never fails in tests");
        let port = listener.local_addr().expect("bound socket has an addr").port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let remaining_failures = Arc::new(AtomicUsize::new(fail_first_n));

        let received_for_task = received.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let received = received_for_task.clone();
                let remaining_failures = remaining_failures.clone();
                tokio::spawn(serve_one(socket, received, remaining_failures));
            }
        });

        Self {
            host: "127.0.0.1".to_string(),
            port,
            received,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}/webhook", self.host, self.port)
    }

    /// JSON bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().expect("mutex not poisoned").clone()
    }
}

async fn serve_one(
    mut socket: tokio::net::TcpStream,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    remaining_failures: Arc<AtomicUsize>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let Ok(n) = socket.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 1 << 20 {
            return;
        }
    };

    let header_text = String::from_utf8_lossy(&buf[..header_end]);
    let content_length: usize = header_text
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length:").or_else(|| line.strip_prefix("content-length:")))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let Ok(n) = socket.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = &buf[header_end..(header_end + content_length).min(buf.len())];
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        received.lock().expect("mutex not poisoned").push(value);
    }

    let should_fail = remaining_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
            if n > 0 { Some(n - 1) } else { None }
        })
        .is_ok();

    let response = if should_fail {
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    } else {
        "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    };
    let _ = socket.write_all(response.as_bytes()).await;
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
