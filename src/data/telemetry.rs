//! Fire-and-forget ingestion telemetry. Reporting must never block or fail
//! the pipeline: sends run detached on the runtime and errors collapse to
//! a debug log line.

use serde::Serialize;

/// One ingestion attempt, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAttempt {
    pub installation_id: String,
    pub category: String,
    pub data_date: String,
    pub outcome: String,
}

pub trait IngestReporter: Send + Sync {
    fn report(&self, attempt: IngestAttempt);
}

/// Default reporter: telemetry disabled.
pub struct NoopReporter;

impl IngestReporter for NoopReporter {
    fn report(&self, _attempt: IngestAttempt) {}
}

/// Posts attempts as JSON to an external logging endpoint.
pub struct HttpReporter {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpReporter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl IngestReporter for HttpReporter {
    fn report(&self, attempt: IngestAttempt) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        tokio::spawn(async move {
            if let Err(err) = client.post(&endpoint).json(&attempt).send().await {
                log::debug!("ingest telemetry dropped: {err}");
            }
        });
    }
}
