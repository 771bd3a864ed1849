use crate::config::{ApiSettings, AuthScheme};
use crate::domain::model::ApiReading;
use crate::domain::ports::DataSource;
use crate::utils::error::{LiveNftError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

/// Fetches the live value from the configured HTTP data API.
pub struct HttpDataSource {
    client: Client,
    settings: ApiSettings,
}

impl HttpDataSource {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self) -> Result<ApiReading> {
        tracing::debug!("Making API request to: {}", self.settings.url);

        let request = match &self.settings.auth {
            AuthScheme::Bearer => self
                .client
                .get(&self.settings.url)
                .bearer_auth(&self.settings.key),
            AuthScheme::Query { param } => self
                .client
                .get(&self.settings.url)
                .query(&[(param.as_str(), self.settings.key.as_str())]),
        };

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(LiveNftError::ApiDataError {
                message: format!("API returned status {}", response.status()),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let param = payload
            .get("param")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| LiveNftError::ApiDataError {
                message: "Response has no numeric 'param' field".to_string(),
            })?;

        Ok(ApiReading {
            param,
            fetched_at: Utc::now(),
        })
    }
}
