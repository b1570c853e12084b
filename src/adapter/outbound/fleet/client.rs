//! Compute Fleet REST API client.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client as HttpClient, RequestBuilder};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::dto::{CreateInstanceBody, InstanceList, InstanceRecord};
use crate::domain::{CloudId, Worker};
use crate::error::{Error, Result};
use crate::infrastructure::config::fleet::FleetConfig;
use crate::port::outbound::fleet::{ComputeFleet, InstanceSpec};

/// HTTP client for the Compute Fleet API.
///
/// Listing is retried on timeouts and connect failures; mutations are sent
/// exactly once.
pub struct HttpFleet {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl HttpFleet {
    /// Client with default timeouts and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: trim_base(base_url.into()),
            token: None,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &FleetConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: trim_base(config.api_url.clone()),
            token: config.token.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_with_retry<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let response = self.authorize(self.http.get(url)).send().await;
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response.error_for_status()?;

            match response.json::<T>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Fleet request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            let base = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
            let jitter = rand::thread_rng().gen_range(0..=self.retry_backoff_ms / 2);
            sleep(Duration::from_millis(base + jitter)).await;
        }
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        Ok(self.authorize(request).send().await?.error_for_status()?)
    }

    fn instance_url(&self, id: &CloudId, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/instances/{}/{action}", self.base_url, id),
            None => format!("{}/instances/{}", self.base_url, id),
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl ComputeFleet for HttpFleet {
    fn name(&self) -> &'static str {
        "compute-fleet"
    }

    async fn list(&self) -> Result<Vec<Worker>> {
        let url = format!("{}/instances", self.base_url);
        let response: InstanceList = self.get_with_retry(&url).await?;
        let total = response.instances.len();
        let workers: Vec<Worker> = response
            .instances
            .into_iter()
            .filter_map(InstanceRecord::into_worker)
            .collect();
        debug!(total, workers = workers.len(), "Listed fleet instances");
        Ok(workers)
    }

    async fn create(&self, spec: &InstanceSpec) -> Result<Worker> {
        let url = format!("{}/instances", self.base_url);
        let body = CreateInstanceBody::from(spec);
        info!(worker = %spec.name, model = %spec.model, "Creating instance");

        let record: InstanceRecord = self
            .send_once(self.http.post(&url).json(&body))
            .await?
            .json()
            .await?;
        record.into_worker().ok_or_else(|| {
            Error::Connection(format!(
                "fleet returned an unusable record for '{}'",
                spec.name
            ))
        })
    }

    async fn pause(&self, id: &CloudId) -> Result<()> {
        info!(instance = %id, "Stopping instance");
        self.send_once(self.http.post(self.instance_url(id, Some("stop"))))
            .await?;
        Ok(())
    }

    async fn start(&self, id: &CloudId) -> Result<()> {
        info!(instance = %id, "Starting instance");
        self.send_once(self.http.post(self.instance_url(id, Some("start"))))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &CloudId) -> Result<()> {
        info!(instance = %id, "Deleting instance");
        self.send_once(self.http.delete(self.instance_url(id, None)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GpuType, Quantization, ResourceShape, WorkerName, WorkerStatus};
    use crate::testkit::http::{StubResponse, StubServer};

    fn config(url: String) -> FleetConfig {
        FleetConfig {
            api_url: url,
            timeout_ms: 200,
            connect_timeout_ms: 200,
            retry_max_attempts: 3,
            retry_backoff_ms: 0,
            token: Some("fleet-secret".to_string()),
        }
    }

    const LISTING: &str = r#"{"instances": [
        {"id": "vm-1", "name": "w1", "status": "RUNNING", "network_ip": "10.0.0.5"},
        {"id": "vm-2", "name": "w2", "status": "SUSPENDED", "network_ip": "10.0.0.6"},
        {"id": "vm-3", "name": "Not A Worker", "status": "RUNNING"}
    ]}"#;

    #[tokio::test]
    async fn list_maps_records_and_sends_token() {
        let server = StubServer::start(vec![StubResponse::ok(LISTING)]).await;
        let fleet = HttpFleet::from_config(&config(format!("{}/", server.url())));

        let workers = fleet.list().await.unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].status, WorkerStatus::Running);
        assert_eq!(workers[0].address, Some("10.0.0.5".parse().unwrap()));
        assert_eq!(workers[1].status, WorkerStatus::Paused);
        assert_eq!(workers[1].address, None);

        let requests = server.requests();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/instances");
        assert_eq!(
            requests[0].header("authorization"),
            Some("Bearer fleet-secret")
        );
    }

    #[tokio::test]
    async fn list_retries_timeouts() {
        let server = StubServer::start(vec![
            StubResponse::ok(LISTING).delayed(Duration::from_secs(2)),
            StubResponse::ok(LISTING),
        ])
        .await;
        let fleet = HttpFleet::from_config(&config(server.url()));

        let workers = fleet.list().await.unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_gives_up_after_max_attempts() {
        let server =
            StubServer::start(vec![StubResponse::ok(LISTING).delayed(Duration::from_secs(2))])
                .await;
        let fleet = HttpFleet::from_config(&config(server.url()));

        let err = fleet.list().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(server.requests().len(), 3);
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = StubServer::start(vec![StubResponse::json(500, "{}")]).await;
        let fleet = HttpFleet::from_config(&config(server.url()));

        assert!(fleet.list().await.is_err());
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn mutations_are_sent_once() {
        let server =
            StubServer::start(vec![StubResponse::ok("{}").delayed(Duration::from_secs(2))]).await;
        let fleet = HttpFleet::from_config(&config(server.url()));

        let err = fleet.pause(&CloudId::new("vm-1")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(server.requests().len(), 1);
        assert_eq!(server.requests()[0].path, "/instances/vm-1/stop");
    }

    #[tokio::test]
    async fn mutation_paths() {
        let server = StubServer::start(vec![StubResponse::ok("{}")]).await;
        let fleet = HttpFleet::new(server.url());
        let id = CloudId::new("vm-7");

        fleet.start(&id).await.unwrap();
        fleet.delete(&id).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/instances/vm-7/start");
        assert_eq!(requests[1].method, "DELETE");
        assert_eq!(requests[1].path, "/instances/vm-7");
        assert_eq!(requests[1].header("authorization"), None);
    }

    #[tokio::test]
    async fn create_posts_spec_and_reads_record() {
        let server = StubServer::start(vec![StubResponse::ok(
            r#"{"id": "vm-9", "name": "w9", "status": "PROVISIONING"}"#,
        )])
        .await;
        let fleet = HttpFleet::new(server.url());
        let spec = InstanceSpec {
            name: WorkerName::parse("w9").unwrap(),
            model: "llama-7b".to_string(),
            resources: ResourceShape::try_new(Quantization::Int8, GpuType::A100, 1).unwrap(),
        };

        let worker = fleet.create(&spec).await.unwrap();
        assert_eq!(worker.cloud_id.as_str(), "vm-9");
        assert_eq!(worker.status, WorkerStatus::Provisioning);

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/instances");
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["name"], "w9");
        assert_eq!(body["machine"]["gpu_type"], "A100");
    }
}
