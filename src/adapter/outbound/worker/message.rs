//! Generation server WebSocket frames.
//!
//! The client sends one request frame:
//! ```json
//! {"messages": [{"role": "user", "content": "Hi"}], "sampling": {"temperature": 0.9, ...}}
//! ```
//! and the worker answers with `{"text": "..."}` frames followed by either
//! `{"done": true}` or `{"error": "..."}`. The last text frame may carry
//! `"done": true` itself.

use serde::Deserialize;

/// A frame received from the worker.
#[derive(Debug, Default, Deserialize)]
pub struct WorkerFrame {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// What a frame means for the session.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameEvent {
    Text(String),
    /// Final fragment; the session is complete after it.
    Last(String),
    Done,
    Failed(String),
    Ignored,
}

impl WorkerFrame {
    /// Errors win over text, text over completion.
    #[must_use]
    pub fn into_event(self) -> FrameEvent {
        if let Some(error) = self.error {
            return FrameEvent::Failed(error);
        }
        match self.text {
            Some(text) if self.done => FrameEvent::Last(text),
            Some(text) => FrameEvent::Text(text),
            None if self.done => FrameEvent::Done,
            None => FrameEvent::Ignored,
        }
    }
}
