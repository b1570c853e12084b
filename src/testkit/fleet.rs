//! In-memory [`ComputeFleet`] with call recording and failure injection.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{CloudId, Worker, WorkerName, WorkerStatus};
use crate::error::{Error, Result};
use crate::port::{ComputeFleet, InstanceSpec};

/// A mutating call received by [`FakeFleet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetCall {
    Create(WorkerName),
    Pause(CloudId),
    Start(CloudId),
    Delete(CloudId),
}

#[derive(Default)]
struct State {
    workers: Vec<Worker>,
    /// Addresses of paused workers, restored on start.
    parked: HashMap<CloudId, IpAddr>,
    calls: Vec<FleetCall>,
    next_id: u64,
    fail_list: Option<Error>,
    fail_mutation: Option<Error>,
}

/// Compute fleet double.
///
/// Transitions are applied instantly: create yields `Provisioning`, pause
/// yields `Paused` (address parked), start yields `Running` (address
/// restored) and delete removes the record. Unknown ids fail like a real
/// provider would.
#[derive(Default)]
pub struct FakeFleet {
    state: Mutex<State>,
    list_count: AtomicUsize,
    mutation_delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(workers: Vec<Worker>) -> Self {
        let fleet = Self::new();
        fleet.state.lock().workers = workers;
        fleet
    }

    /// Current records, as the next `list` would return them.
    pub fn snapshot(&self) -> Vec<Worker> {
        self.state.lock().workers.clone()
    }

    /// Mutating calls received so far, in order.
    pub fn calls(&self) -> Vec<FleetCall> {
        self.state.lock().calls.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    /// Fail the next `list` with `err`.
    pub fn fail_next_list(&self, err: Error) {
        self.state.lock().fail_list = Some(err);
    }

    /// Fail the next mutating call with `err`. The call is still recorded.
    pub fn fail_next_mutation(&self, err: Error) {
        self.state.lock().fail_mutation = Some(err);
    }

    /// Delay every mutating call, to widen race windows.
    pub fn set_mutation_delay(&self, delay: Duration) {
        *self.mutation_delay.lock() = delay;
    }

    /// Highest number of mutating calls observed in flight at once.
    pub fn max_concurrent_mutations(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Simulate the provider finishing a boot: `Running` at `address`.
    pub fn finish_boot(&self, worker: &str, address: &str) {
        let address = address.parse().expect("valid IP address");
        let mut state = self.state.lock();
        if let Some(w) = state.workers.iter_mut().find(|w| w.name.as_str() == worker) {
            w.status = WorkerStatus::Running;
            w.address = Some(address);
        }
    }

    /// Overwrite a worker's status out-of-band.
    pub fn set_status(&self, worker: &str, status: WorkerStatus) {
        let mut state = self.state.lock();
        if let Some(w) = state.workers.iter_mut().find(|w| w.name.as_str() == worker) {
            w.status = status;
        }
    }

    async fn mutate<T>(
        &self,
        call: FleetCall,
        apply: impl FnOnce(&mut State) -> Result<T>,
    ) -> Result<T> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.mutation_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = {
            let mut state = self.state.lock();
            state.calls.push(call);
            match state.fail_mutation.take() {
                Some(err) => Err(err),
                None => apply(&mut state),
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn find<'a>(state: &'a mut State, id: &CloudId) -> Result<&'a mut Worker> {
    state
        .workers
        .iter_mut()
        .find(|w| &w.cloud_id == id)
        .ok_or_else(|| Error::Connection(format!("instance {id} not found")))
}

#[async_trait]
impl ComputeFleet for FakeFleet {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn list(&self) -> Result<Vec<Worker>> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        match state.fail_list.take() {
            Some(err) => Err(err),
            None => Ok(state.workers.clone()),
        }
    }

    async fn create(&self, spec: &InstanceSpec) -> Result<Worker> {
        self.mutate(FleetCall::Create(spec.name.clone()), |state| {
            state.next_id += 1;
            let mut worker = Worker::new(
                spec.name.clone(),
                format!("fake-{}", state.next_id),
                WorkerStatus::Provisioning,
            )
            .with_model(spec.model.clone())
            .with_resources(spec.resources);
            worker.created_at = Some(Utc::now());
            state.workers.push(worker.clone());
            Ok(worker)
        })
        .await
    }

    async fn pause(&self, id: &CloudId) -> Result<()> {
        self.mutate(FleetCall::Pause(id.clone()), |state| {
            let worker = find(state, id)?;
            worker.status = WorkerStatus::Paused;
            let parked = worker.address.take();
            if let Some(address) = parked {
                state.parked.insert(id.clone(), address);
            }
            Ok(())
        })
        .await
    }

    async fn start(&self, id: &CloudId) -> Result<()> {
        self.mutate(FleetCall::Start(id.clone()), |state| {
            let address = state.parked.remove(id);
            let worker = find(state, id)?;
            worker.status = WorkerStatus::Running;
            worker.address = address;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &CloudId) -> Result<()> {
        self.mutate(FleetCall::Delete(id.clone()), |state| {
            find(state, id)?;
            state.workers.retain(|w| &w.cloud_id != id);
            state.parked.remove(id);
            Ok(())
        })
        .await
    }
}
