//! End-to-end: the Receiver reconnects after its TCP connection is closed
//! by the peer, resuming delivery on the next connection attempt without
//! ever stopping on its own.

use std::time::Duration;

use sensor_ingest::{Receiver, ReceiverConfig};
use sensor_wire::Reading;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

#[tokio::test]
async fn receiver_reconnects_after_peer_closes_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // First connection: write one line, then drop the socket to force the
    // Receiver into backoff. Second connection: write a different line and
    // hold it open for the rest of the test.
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket
            .write_all(
                b"{\"type\":\"sensor_reading\",\"sensor\":\"Pressure\",\"value\":1.0,\"timestamp\":\"2026-01-01T10:00:00\"}\n",
            )
            .await
            .unwrap();
        drop(socket);

        let (mut socket, _) = listener.accept().await.unwrap();
        socket
            .write_all(
                b"{\"type\":\"sensor_reading\",\"sensor\":\"Pressure\",\"value\":2.0,\"timestamp\":\"2026-01-01T10:00:10\"}\n",
            )
            .await
            .unwrap();
        // Keep the listener/socket alive for the remainder of the test.
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let (tx, mut rx) = mpsc::channel(16);
    let config = ReceiverConfig {
        host: "127.0.0.1".to_string(),
        port,
        connect_timeout: Duration::from_millis(500),
        reconnect_delay: Duration::from_millis(30),
    };
    let receiver = Receiver::new(config, tx);
    let stop = receiver.stop_token();
    let handle = receiver.start();

    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for first reading")
        .expect("channel closed");
    match first {
        Reading::Scalar(r) => assert_eq!(r.value, 1.0),
        Reading::Spectral(_) => panic!("expected scalar"),
    }

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for reading after reconnect")
        .expect("channel closed");
    match second {
        Reading::Scalar(r) => assert_eq!(r.value, 2.0),
        Reading::Spectral(_) => panic!("expected scalar"),
    }

    stop.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("receiver did not stop")
        .expect("receiver panicked");
}
