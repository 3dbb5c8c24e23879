use crate::config::AssistantConfig;
use crate::dataset::TabularFinancialDataset;
use crate::error::{AssistantError, Result};
use crate::schema::{ForecastPoint, ForecastRequest};
use log::{info, warn};
use reqwest::Client;

pub const DEFAULT_FORECAST_PERIODS: u32 = 24;

/// Client for the external forecasting endpoint.
///
/// The service receives the known periods plus a horizon and answers with an
/// ordered list of periods; how it extrapolates is its own business.
#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    url: String,
}

impl ForecastClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Ok(Self::new(config.require_forecast_url()?))
    }

    /// Requests `periods` future periods for `dataset`. Every failure is a
    /// [`AssistantError::ForecastFailure`].
    pub async fn forecast(
        &self,
        dataset: &TabularFinancialDataset,
        periods: u32,
    ) -> Result<Vec<ForecastPoint>> {
        if periods == 0 {
            return Err(AssistantError::ForecastFailure(
                "forecast horizon must be at least one period".to_string(),
            ));
        }

        let request = ForecastRequest {
            data: dataset.to_forecast_points(),
            periods,
        };

        let points = self.send(&request).await.map_err(|e| {
            warn!("Forecast request failed: {}", e);
            match e {
                AssistantError::ForecastFailure(_) => e,
                other => AssistantError::ForecastFailure(other.to_string()),
            }
        })?;

        info!(
            "Forecast service returned {} periods for a {}-period horizon",
            points.len(),
            periods
        );
        Ok(points)
    }

    async fn send(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>> {
        let res = self.client.post(&self.url).json(request).send().await?;
        let status = res.status();

        if !status.is_success() {
            return Err(AssistantError::ForecastFailure(format!(
                "API request failed with status {}",
                status
            )));
        }

        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::starter_dataset;

    #[test]
    fn test_from_config_requires_url() {
        let result = ForecastClient::from_config(&AssistantConfig::default());
        assert!(matches!(result, Err(AssistantError::MissingConfig(_))));
    }

    #[tokio::test]
    async fn test_zero_horizon_rejected() {
        let client = ForecastClient::new("http://127.0.0.1:9/forecast");
        let result = client.forecast(&starter_dataset(), 0).await;
        assert!(matches!(result, Err(AssistantError::ForecastFailure(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_forecast_failure() {
        let client = ForecastClient::new("http://127.0.0.1:9/forecast");
        let result = client
            .forecast(&starter_dataset(), DEFAULT_FORECAST_PERIODS)
            .await;
        assert!(matches!(result, Err(AssistantError::ForecastFailure(_))));
    }
}
