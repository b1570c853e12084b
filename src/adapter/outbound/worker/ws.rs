//! Worker generation server client.
//!
//! Generation runs over a WebSocket at `/generate`; the shutdown notice is a
//! plain `POST /shutdown`.
//!
//! # Session Lifecycle
//!
//! 1. Connect (bounded by the connect timeout)
//! 2. Send the request frame
//! 3. Read `text` frames until `done`, `error` or a close frame
//! 4. Close the socket

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::Client as HttpClient;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use super::message::{FrameEvent, WorkerFrame};
use crate::domain::Endpoint;
use crate::error::{Error, Result};
use crate::infrastructure::config::worker::WorkerConfig;
use crate::port::outbound::worker::{GenerationRequest, GenerationSession, WorkerClient};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket/HTTP client for per-worker generation servers.
pub struct WsWorkerClient {
    http: HttpClient,
    connect_timeout: Duration,
    shutdown_timeout: Duration,
}

impl WsWorkerClient {
    #[must_use]
    pub fn new(connect_timeout: Duration, shutdown_timeout: Duration) -> Self {
        Self {
            http: HttpClient::new(),
            connect_timeout,
            shutdown_timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self::new(config.connect_timeout(), config.shutdown_timeout())
    }
}

#[async_trait]
impl WorkerClient for WsWorkerClient {
    fn name(&self) -> &'static str {
        "websocket"
    }

    async fn notify_shutdown(&self, endpoint: &Endpoint) -> Result<()> {
        let url = endpoint.http_url("/shutdown");
        debug!(url = %url, "Sending shutdown notice");
        self.http
            .post(&url)
            .timeout(self.shutdown_timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn open_session(
        &self,
        endpoint: &Endpoint,
        request: &GenerationRequest,
    ) -> Result<Box<dyn GenerationSession>> {
        let url = endpoint.ws_url("/generate");
        info!(url = %url, messages = request.messages.len(), "Opening generation session");

        let (mut ws, response) = tokio::time::timeout(self.connect_timeout, connect_async(&url))
            .await
            .map_err(|_| Error::Timeout(format!("connecting to {endpoint}")))??;
        debug!(status = %response.status(), "Generation session connected");

        let payload = serde_json::to_string(request)?;
        ws.send(Message::Text(payload)).await?;

        Ok(Box::new(WsSession {
            ws,
            finished: false,
        }))
    }
}

/// One generation session over an open socket.
pub struct WsSession {
    ws: Socket,
    finished: bool,
}

#[async_trait]
impl GenerationSession for WsSession {
    async fn next_fragment(&mut self) -> Option<Result<String>> {
        while !self.finished {
            let Some(message) = self.ws.next().await else {
                self.finished = true;
                break;
            };
            match message {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received generation frame");
                    let frame = match serde_json::from_str::<WorkerFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!(error = %e, bytes = text.len(), "Failed to parse generation frame");
                            continue;
                        }
                    };
                    match frame.into_event() {
                        FrameEvent::Text(fragment) => return Some(Ok(fragment)),
                        FrameEvent::Last(fragment) => {
                            self.finished = true;
                            return Some(Ok(fragment));
                        }
                        FrameEvent::Done => self.finished = true,
                        FrameEvent::Failed(reason) => {
                            self.finished = true;
                            return Some(Err(Error::Connection(format!(
                                "worker reported a generation error: {reason}"
                            ))));
                        }
                        FrameEvent::Ignored => {}
                    }
                }
                Ok(Message::Ping(data)) => {
                    if let Err(e) = self.ws.send(Message::Pong(data)).await {
                        self.finished = true;
                        return Some(Err(e.into()));
                    }
                }
                Ok(Message::Close(frame)) => {
                    debug!(frame = ?frame, "Worker closed generation session");
                    self.finished = true;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }

    async fn close(&mut self) {
        self.finished = true;
        if let Err(e) = self.ws.close(None).await {
            trace!(error = %e, "Generation socket already closed");
        }
    }
}
