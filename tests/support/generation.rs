//! A local generation server speaking the worker WebSocket protocol.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

pub struct GenerationServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
    client_closed: Arc<AtomicBool>,
}

impl GenerationServer {
    /// Serve one session: read the request, send `frames`, then either finish
    /// with `{"done": true}` or stay silent until the client goes away.
    pub async fn start(frames: Vec<&str>, finish: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let client_closed = Arc::new(AtomicBool::new(false));
        let frames: Vec<String> = frames.into_iter().map(String::from).collect();

        let seen = Arc::clone(&requests);
        let closed = Arc::clone(&client_closed);
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            if let Some(Ok(Message::Text(text))) = ws.next().await {
                seen.lock().push(serde_json::from_str(&text).unwrap());
            }
            for frame in frames {
                if ws.send(Message::Text(frame)).await.is_err() {
                    closed.store(true, Ordering::SeqCst);
                    return;
                }
            }
            if finish {
                let _ = ws.send(Message::Text(r#"{"done": true}"#.into())).await;
            }
            loop {
                match ws.next().await {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
            closed.store(true, Ordering::SeqCst);
        });

        Self {
            addr,
            requests,
            client_closed,
        }
    }

    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().clone()
    }

    pub fn client_closed(&self) -> bool {
        self.client_closed.load(Ordering::SeqCst)
    }
}
