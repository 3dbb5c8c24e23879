use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Insights and recommendations for the uploaded periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialAnalysis {
    #[schemars(description = "Three short, distinct, data-driven observations")]
    pub insights: Vec<String>,

    #[schemars(description = "Three short, distinct, actionable recommendations")]
    pub recommendations: Vec<String>,
}

/// Review of a forecast returned by the forecasting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastAnalysis {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub future_outlook: Option<FutureOutlook>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FutureOutlook {
    pub revenue: String,
    pub expenses: String,
    pub profitability: String,
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CriterionScore {
    #[schemars(description = "Score from 1 to 10")]
    pub score: f64,
    pub feedback: String,
}

/// Critique of a spoken funding pitch, graded per investor criterion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PitchAnalysis {
    #[schemars(description = "Overall score from 1 to 10")]
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub market_opportunity: CriterionScore,
    pub business_model: CriterionScore,
    pub team: CriterionScore,
    pub traction: CriterionScore,
    pub financials: CriterionScore,
    pub recommendations: Vec<String>,
    #[schemars(description = "One of High, Medium or Low")]
    pub funding_readiness: String,
    pub summary: String,
}

impl PitchAnalysis {
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 5] {
        [
            ("Market Opportunity", &self.market_opportunity),
            ("Business Model", &self.business_model),
            ("Team", &self.team),
            ("Traction", &self.traction),
            ("Financials", &self.financials),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JargonTerm {
    pub original: String,
    pub simple: String,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Plain-language rewrite of a financial document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SimplifiedText {
    pub simplified_text: String,
    pub terms: Vec<JargonTerm>,
    pub summary: String,
}

/// Output languages offered by the jargon simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
    Gujarati,
    Tamil,
    Telugu,
    Kannada,
    Bengali,
    Spanish,
    French,
    German,
    Portuguese,
    Italian,
    Dutch,
    Russian,
    Chinese,
    Japanese,
    Korean,
    Arabic,
    Turkish,
}

impl Language {
    /// Name used when instructing the model, with the native spelling.
    pub fn instruction_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi (हिंदी)",
            Language::Marathi => "Marathi (मराठी)",
            Language::Gujarati => "Gujarati (ગુજરાતી)",
            Language::Tamil => "Tamil (தமிழ்)",
            Language::Telugu => "Telugu (తెలుగు)",
            Language::Kannada => "Kannada (ಕನ್ನಡ)",
            Language::Bengali => "Bengali (বাংলা)",
            Language::Spanish => "Spanish (Español)",
            Language::French => "French (Français)",
            Language::German => "German (Deutsch)",
            Language::Portuguese => "Portuguese (Português)",
            Language::Italian => "Italian (Italiano)",
            Language::Dutch => "Dutch (Nederlands)",
            Language::Russian => "Russian (Русский)",
            Language::Chinese => "Chinese (中文)",
            Language::Japanese => "Japanese (日本語)",
            Language::Korean => "Korean (한국어)",
            Language::Arabic => "Arabic (العربية)",
            Language::Turkish => "Turkish (Türkçe)",
        }
    }

    /// Looks a language up by its lowercase code; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(code.trim().to_lowercase()))
            .unwrap_or_default()
    }
}

// Wire types for the generateContent endpoint.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single-turn JSON-mode request.
    pub fn json_prompt(
        prompt: impl Into<String>,
        response_schema: Option<serde_json::Value>,
    ) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if non-blank.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::json_prompt("hello", None);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_first_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":1}"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{\"a\":1}"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.first_text(), None);

        let missing: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.first_text(), None);
    }

    #[test]
    fn test_forecast_analysis_camel_case() {
        let analysis: ForecastAnalysis = serde_json::from_str(
            r#"{"insights":["a"],"recommendations":["b"],"futureOutlook":{"revenue":"up","riskFactors":["fx"]}}"#,
        )
        .unwrap();
        let outlook = analysis.future_outlook.unwrap();
        assert_eq!(outlook.revenue, "up");
        assert_eq!(outlook.risk_factors, vec!["fx".to_string()]);
        assert_eq!(outlook.expenses, "");
    }

    #[test]
    fn test_pitch_analysis_is_lenient() {
        let pitch: PitchAnalysis = serde_json::from_str(
            r#"{"overallScore":7,"team":{"score":8,"feedback":"Strong founders"},"fundingReadiness":"Medium"}"#,
        )
        .unwrap();
        assert_eq!(pitch.overall_score, 7.0);
        assert_eq!(pitch.team.score, 8.0);
        assert_eq!(pitch.criteria()[2].0, "Team");
        assert!(pitch.strengths.is_empty());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("Hindi"), Language::Hindi);
        assert_eq!(Language::from_code("klingon"), Language::English);
        assert_eq!(Language::Tamil.instruction_name(), "Tamil (தமிழ்)");
    }
}
