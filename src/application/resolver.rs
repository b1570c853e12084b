//! Worker record to network endpoint resolution.

use crate::domain::{Endpoint, Worker, WorkerStatus};

/// Derives where a worker's generation server listens.
///
/// Pure: reads the snapshot, never performs I/O.
#[derive(Debug, Clone, Copy)]
pub struct EndpointResolver {
    port: u16,
    tls: bool,
}

impl EndpointResolver {
    #[must_use]
    pub const fn new(port: u16, tls: bool) -> Self {
        Self { port, tls }
    }

    /// Endpoint of a running worker with attached networking, otherwise
    /// `None`. Absence means "not yet reachable", not a failure.
    #[must_use]
    pub fn resolve(&self, worker: &Worker) -> Option<Endpoint> {
        if worker.status != WorkerStatus::Running {
            return None;
        }
        worker
            .address
            .map(|address| Endpoint::new(address, self.port, self.tls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{paused_worker, provisioning_worker, running_worker};

    #[test]
    fn running_worker_with_address_resolves() {
        let resolver = EndpointResolver::new(8080, false);
        let endpoint = resolver.resolve(&running_worker("w1", "10.0.0.5")).unwrap();
        assert_eq!(endpoint.to_string(), "10.0.0.5:8080");
        assert!(!endpoint.tls);
    }

    #[test]
    fn running_worker_without_address_is_unreachable() {
        let resolver = EndpointResolver::new(8080, false);
        let mut worker = running_worker("w1", "10.0.0.5");
        worker.address = None;
        assert_eq!(resolver.resolve(&worker), None);
    }

    #[test]
    fn non_running_workers_are_unreachable() {
        let resolver = EndpointResolver::new(8080, true);
        let mut paused = paused_worker("w1");
        paused.address = Some("10.0.0.5".parse().unwrap());
        assert_eq!(resolver.resolve(&paused), None);
        assert_eq!(resolver.resolve(&provisioning_worker("w2")), None);
    }
}
