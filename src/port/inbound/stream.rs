//! Caller-facing handle on one streaming generation session.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Lazy, cancellable sequence of text fragments from one worker.
///
/// Fragments arrive in the order the worker produced them. The sequence ends
/// with `None` on completion or cancellation; a mid-stream upstream failure
/// yields one `Err` and then ends. Dropping the stream cancels it.
pub struct GenerationStream {
    fragments: mpsc::Receiver<Result<String, ApiError>>,
    cancel: CancellationToken,
    relay: Option<JoinHandle<()>>,
}

impl GenerationStream {
    /// Wrap the receiving side of a relay task.
    pub fn new(
        fragments: mpsc::Receiver<Result<String, ApiError>>,
        cancel: CancellationToken,
        relay: JoinHandle<()>,
    ) -> Self {
        Self {
            fragments,
            cancel,
            relay: Some(relay),
        }
    }

    /// Token that cancels this session when triggered.
    ///
    /// Lets another task (a Ctrl-C handler, a disconnect watcher) cancel the
    /// stream while this handle is being polled.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the session. Buffered fragments are discarded.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.fragments.close();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Next fragment, or `None` once the session is over.
    pub async fn next_fragment(&mut self) -> Option<Result<String, ApiError>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            item = self.fragments.recv() => item,
        }
    }

    /// Drain the whole session into one string.
    pub async fn collect_text(mut self) -> Result<String, ApiError> {
        let mut text = String::new();
        while let Some(fragment) = self.next_fragment().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }

    /// Wait for the relay task to finish its teardown.
    pub async fn join(mut self) {
        if let Some(relay) = self.relay.take() {
            let _ = relay.await;
        }
    }
}

impl Stream for GenerationStream {
    type Item = Result<String, ApiError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        self.fragments.poll_recv(cx)
    }
}

impl Drop for GenerationStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for GenerationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn stream_of(items: Vec<Result<String, ApiError>>) -> GenerationStream {
        let (tx, rx) = mpsc::channel(8);
        let relay = tokio::spawn(async move {
            for item in items {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
        GenerationStream::new(rx, CancellationToken::new(), relay)
    }

    #[tokio::test]
    async fn collects_fragments_in_order() {
        let stream = stream_of(vec![Ok("Hel".into()), Ok("lo".into())]);
        assert_eq!(stream.collect_text().await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn error_surfaces_after_partial_fragments() {
        let mut stream = stream_of(vec![
            Ok("partial".into()),
            Err(ApiError::internal("worker connection lost")),
        ]);
        assert_eq!(stream.next_fragment().await.unwrap().unwrap(), "partial");
        assert!(stream.next_fragment().await.unwrap().is_err());
        assert!(stream.next_fragment().await.is_none());
    }

    #[tokio::test]
    async fn cancelled_stream_yields_nothing() {
        let mut stream = stream_of(vec![Ok("a".into()), Ok("b".into())]);
        stream.cancel();
        assert!(stream.is_cancelled());
        assert!(stream.next_fragment().await.is_none());
    }

    #[tokio::test]
    async fn implements_stream() {
        let stream = stream_of(vec![Ok("x".into()), Ok("y".into())]);
        let items: Vec<_> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(items, vec!["x", "y"]);
    }
}
