//! A minimal NDJSON publisher for exercising the Receiver's reconnect and
//! parsing behavior without a real device.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// Binds an ephemeral TCP port and streams pushed lines, newline-terminated,
/// to every connection it accepts.
pub struct MockTcpPublisher {
    host: String,
    port: u16,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MockTcpPublisher {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("binding an ephemeral port never fails in tests");
        let port = listener.local_addr().expect("bound socket has an addr").port();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_for_task = lines.clone();

        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let lines = lines_for_task.clone();
                tokio::spawn(serve_one(socket, lines));
            }
        });

        Self {
            host: "127.0.0.1".to_string(),
            port,
            lines,
        }
    }

    /// Queue a line to be sent to every currently- and future-connected
    /// client. Lines already sent to a connection are not resent.
    pub async fn push_line(&self, line: String) {
        self.lines.lock().expect("mutex not poisoned").push(line);
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

async fn serve_one(mut socket: tokio::net::TcpStream, lines: Arc<Mutex<Vec<String>>>) {
    let mut sent = 0usize;
    loop {
        let pending: Vec<String> = {
            let guard = lines.lock().expect("mutex not poisoned");
            guard[sent.min(guard.len())..].to_vec()
        };
        for line in &pending {
            if socket.write_all(format!("{line}\n").as_bytes()).await.is_err() {
                return;
            }
            sent += 1;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
