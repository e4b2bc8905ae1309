use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::EmployeeError;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Supplies raw (unmapped) employee records.
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Value>, EmployeeError>;
    fn name(&self) -> &str;
}

pub type DynEmployeeSource = Box<dyn EmployeeSource>;

/// Employee data served as JSON from a URL, either one object or a list.
pub struct SampleJsonSource {
    client: reqwest::Client,
    url: String,
}

impl SampleJsonSource {
    pub fn new(url: impl Into<String>) -> Result<Self, EmployeeError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(EmployeeError::NotConfigured(
                "sample_url is not configured".to_string(),
            ));
        }
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl EmployeeSource for SampleJsonSource {
    async fn fetch_employees(&self) -> Result<Vec<Value>, EmployeeError> {
        debug!("Fetching employees from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmployeeError::BadStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let data: Value = response.json().await?;
        let records = records_from_json(data)?;
        info!("Fetched {} employee records from {}", records.len(), self.url);
        Ok(records)
    }

    fn name(&self) -> &str {
        "Sample JSON"
    }
}

/// Accepts a single object or an array of records.
pub fn records_from_json(data: Value) -> Result<Vec<Value>, EmployeeError> {
    match data {
        Value::Object(_) => Ok(vec![data]),
        Value::Array(items) => Ok(items),
        other => Err(EmployeeError::UnexpectedShape(json_type_name(&other).to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Placeholder for the ZingHR HR API. Always reports that it is not configured.
pub struct ZingHrSource {
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl ZingHrSource {
    pub fn new(
        base_url: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            base_url,
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl EmployeeSource for ZingHrSource {
    async fn fetch_employees(&self) -> Result<Vec<Value>, EmployeeError> {
        debug!(
            "ZingHR source requested (client id set: {}, secret set: {})",
            self.client_id.is_some(),
            self.client_secret.is_some()
        );
        Err(EmployeeError::NotConfigured(format!(
            "ZingHR integration is not available yet (base_url: {})",
            self.base_url.as_deref().unwrap_or("(none)")
        )))
    }

    fn name(&self) -> &str {
        "ZingHR"
    }
}
