use crate::config::AssistantConfig;
use crate::dataset::TabularFinancialDataset;
use crate::error::{AssistantError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{
    build_analysis_prompt, build_forecast_review_prompt, build_jargon_prompt, build_pitch_prompt,
};
use crate::llm::types::{
    FinancialAnalysis, ForecastAnalysis, Language, PitchAnalysis, SimplifiedText,
};
use crate::llm::utils::{parse_model_reply, response_schema_for};
use crate::schema::ForecastPoint;
use log::{info, warn};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Runs the analysis round trips against the generative-language API.
///
/// Every failure, including transport errors, is reported as
/// [`AssistantError::AnalysisFailure`]. Nothing is retried.
pub struct FinancialAnalyst {
    client: GeminiClient,
    currency: String,
}

impl FinancialAnalyst {
    pub fn new(client: GeminiClient, currency: impl Into<String>) -> Self {
        Self {
            client,
            currency: currency.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Ok(Self::new(
            GeminiClient::from_config(config)?,
            config.currency.clone(),
        ))
    }

    /// Insights and recommendations for the current dataset.
    pub async fn analyze_dataset(
        &self,
        dataset: &TabularFinancialDataset,
    ) -> Result<FinancialAnalysis> {
        if !dataset.has_financial_data() {
            return Err(AssistantError::AnalysisFailure(
                "Please enter some financial data before analyzing.".to_string(),
            ));
        }

        let task = "dataset analysis";
        let prompt = build_analysis_prompt(dataset, &self.currency)
            .map_err(|e| analysis_failure(task, e))?;
        let analysis: FinancialAnalysis = self.round_trip(task, &prompt).await?;
        info!(
            "Dataset analysis returned {} insights and {} recommendations",
            analysis.insights.len(),
            analysis.recommendations.len()
        );
        Ok(analysis)
    }

    pub async fn review_forecast(&self, points: &[ForecastPoint]) -> Result<ForecastAnalysis> {
        let task = "forecast review";
        let prompt = build_forecast_review_prompt(points, &self.currency)
            .map_err(|e| analysis_failure(task, e))?;
        self.round_trip(task, &prompt).await
    }

    pub async fn critique_pitch(&self, transcript: &str) -> Result<PitchAnalysis> {
        let task = "pitch critique";
        let prompt = build_pitch_prompt(transcript).map_err(|e| analysis_failure(task, e))?;
        self.round_trip(task, &prompt).await
    }

    pub async fn simplify_jargon(&self, text: &str, language: Language) -> Result<SimplifiedText> {
        let task = "jargon simplification";
        let prompt = build_jargon_prompt(text, language).map_err(|e| analysis_failure(task, e))?;
        self.round_trip(task, &prompt).await
    }

    async fn round_trip<T>(&self, task: &str, prompt: &str) -> Result<T>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let outcome = async {
            let schema = response_schema_for::<T>()?;
            let raw = self.client.generate_text(prompt, Some(schema)).await?;
            parse_model_reply::<T>(&raw)
        }
        .await;

        outcome.map_err(|e| analysis_failure(task, e))
    }
}

fn analysis_failure(task: &str, err: AssistantError) -> AssistantError {
    warn!("{} failed: {}", task, err);
    match err {
        AssistantError::AnalysisFailure(_) => err,
        other => AssistantError::AnalysisFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FinancialPeriodRecord;

    fn offline_analyst() -> FinancialAnalyst {
        FinancialAnalyst::new(GeminiClient::new("k", "m", "http://127.0.0.1:9"), "USD")
    }

    #[tokio::test]
    async fn test_blank_dataset_refused_before_network() {
        let blank = TabularFinancialDataset::from_records(vec![FinancialPeriodRecord::new(
            "Jan", 0.0, 0.0,
        )])
        .unwrap();
        let err = offline_analyst().analyze_dataset(&blank).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Analysis failed: Please enter some financial data before analyzing."
        );
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_analysis_failure() {
        let result = offline_analyst()
            .analyze_dataset(&crate::dataset::starter_dataset())
            .await;
        assert!(matches!(result, Err(AssistantError::AnalysisFailure(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_message_omits_key() {
        let analyst = FinancialAnalyst::new(
            GeminiClient::new("SECRETKEY123", "m", "http://127.0.0.1:9"),
            "USD",
        );
        let err = analyst
            .analyze_dataset(&crate::dataset::starter_dataset())
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::AnalysisFailure(_)));
        assert!(!err.to_string().contains("SECRETKEY123"), "{}", err);
    }

    #[test]
    fn test_serialization_errors_fold_into_analysis_failure() {
        let serde_err = serde_json::from_str::<FinancialAnalysis>("{").unwrap_err();
        let folded = analysis_failure("dataset analysis", AssistantError::from(serde_err));
        assert!(matches!(
            folded,
            AssistantError::AnalysisFailure(ref m) if m.starts_with("Serialization error")
        ));

        let kept = analysis_failure("pitch critique", AssistantError::AnalysisFailure("x".into()));
        assert_eq!(kept.to_string(), "Analysis failed: x");
    }

    #[tokio::test]
    async fn test_empty_transcript_refused() {
        let result = offline_analyst().critique_pitch("").await;
        assert!(matches!(result, Err(AssistantError::AnalysisFailure(_))));
    }
}
