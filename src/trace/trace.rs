use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DetectionEvent {
    pub timestamp_ms: u128,
    pub pass: u64,

    pub stage: String,

    pub url: Option<String>,
    pub detail: Option<String>,
    pub fingerprint: Option<String>,
}

impl DetectionEvent {
    pub fn now(pass: u64, stage: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            pass,
            stage: stage.to_string(),
            url: None,
            detail: None,
            fingerprint: None,
        }
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl ToString) -> Self {
        self.fingerprint = Some(fingerprint.to_string());
        self
    }
}
