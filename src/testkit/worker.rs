//! Scripted [`WorkerClient`] double.
//!
//! Each `open_session` pops the next script (an empty, finished session when
//! none is queued). A script is a list of fragments, optionally held open
//! after the last one so tests can exercise cancellation and idle timeouts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Endpoint;
use crate::error::{Error, Result};
use crate::port::{GenerationRequest, GenerationSession, WorkerClient};

struct Script {
    fragments: Vec<Result<String>>,
    hold_open: bool,
}

#[derive(Default)]
pub struct ScriptedWorker {
    scripts: Mutex<VecDeque<Script>>,
    opened: Mutex<Vec<GenerationRequest>>,
    shutdowns: Mutex<Vec<Endpoint>>,
    fail_open: AtomicBool,
    fail_shutdown: AtomicBool,
    closed: Arc<AtomicUsize>,
}

impl ScriptedWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a session that yields `fragments` and then finishes.
    pub fn script(&self, fragments: Vec<Result<String>>) {
        self.scripts.lock().push_back(Script {
            fragments,
            hold_open: false,
        });
    }

    /// Queue a session that yields `fragments` and then stays silent.
    pub fn script_hold_open(&self, fragments: Vec<Result<String>>) {
        self.scripts.lock().push_back(Script {
            fragments,
            hold_open: true,
        });
    }

    /// Make every `open_session` fail with a connection error.
    pub fn fail_open(&self) {
        self.fail_open.store(true, Ordering::SeqCst);
    }

    /// Make every shutdown notice fail.
    pub fn fail_shutdown(&self) {
        self.fail_shutdown.store(true, Ordering::SeqCst);
    }

    /// Requests received by successfully opened sessions.
    pub fn opened_requests(&self) -> Vec<GenerationRequest> {
        self.opened.lock().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().len()
    }

    /// Sessions closed through [`GenerationSession::close`].
    pub fn closed_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Endpoints that received a shutdown notice (including failed ones).
    pub fn shutdown_targets(&self) -> Vec<Endpoint> {
        self.shutdowns.lock().clone()
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.lock().len()
    }
}

#[async_trait]
impl WorkerClient for ScriptedWorker {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn notify_shutdown(&self, endpoint: &Endpoint) -> Result<()> {
        self.shutdowns.lock().push(*endpoint);
        if self.fail_shutdown.load(Ordering::SeqCst) {
            return Err(Error::Connection(format!("{endpoint} refused connection")));
        }
        Ok(())
    }

    async fn open_session(
        &self,
        endpoint: &Endpoint,
        request: &GenerationRequest,
    ) -> Result<Box<dyn GenerationSession>> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(Error::Connection(format!("{endpoint} refused connection")));
        }
        self.opened.lock().push(request.clone());
        let script = self.scripts.lock().pop_front().unwrap_or(Script {
            fragments: Vec::new(),
            hold_open: false,
        });
        Ok(Box::new(ScriptedSession {
            fragments: script.fragments.into(),
            hold_open: script.hold_open,
            closed: self.closed.clone(),
            is_closed: false,
        }))
    }
}

struct ScriptedSession {
    fragments: VecDeque<Result<String>>,
    hold_open: bool,
    closed: Arc<AtomicUsize>,
    is_closed: bool,
}

#[async_trait]
impl GenerationSession for ScriptedSession {
    async fn next_fragment(&mut self) -> Option<Result<String>> {
        if let Some(fragment) = self.fragments.pop_front() {
            return Some(fragment);
        }
        if self.hold_open && !self.is_closed {
            std::future::pending::<()>().await;
        }
        None
    }

    async fn close(&mut self) {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
