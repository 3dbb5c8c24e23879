// Prompt builders for the analysis round trips. Every prompt asks for a raw
// JSON object so the reply can go straight through `parse_model_reply`.

use crate::dataset::TabularFinancialDataset;
use crate::error::{AssistantError, Result};
use crate::llm::types::Language;
use crate::schema::ForecastPoint;

pub fn build_analysis_prompt(dataset: &TabularFinancialDataset, currency: &str) -> Result<String> {
    let data = serde_json::to_string_pretty(&dataset.to_analysis_rows())?;

    Ok(format!(
        r#"
You are an expert financial analyst. Analyze the following monthly financial data for a business.
The currency is {currency}.

Financial Data:
{data}

Your task is to provide a concise financial analysis.
Your response MUST be a valid JSON object with ONLY two keys: "insights" and "recommendations".
- "insights": An array of three short, distinct, string sentences summarizing key data-driven observations.
- "recommendations": An array of three short, distinct, string sentences giving actionable advice.

Do not include any introductory text, closing text, or markdown formatting like ```json.
The response should be the raw JSON object itself.
"#
    ))
}

pub fn build_forecast_review_prompt(points: &[ForecastPoint], currency: &str) -> Result<String> {
    if points.is_empty() {
        return Err(AssistantError::AnalysisFailure(
            "No forecast data to analyze.".to_string(),
        ));
    }
    let data = serde_json::to_string_pretty(points)?;

    Ok(format!(
        r#"
You are an expert financial analyst. Analyze the following SME financial forecast data and provide insights and recommendations.
The currency is {currency}.

Forecast Data:
{data}

Your task is to provide a comprehensive financial analysis.
Your response MUST be a valid JSON object with the following structure:
{{
    "insights": [
        "List of key insights about the financial trends",
        "Revenue patterns observed",
        "Expense patterns observed",
        "Profitability trends"
    ],
    "recommendations": [
        "Strategic recommendations for the business",
        "Areas for cost optimization",
        "Revenue growth opportunities",
        "Risk mitigation strategies"
    ],
    "futureOutlook": {{
        "revenue": "Expected revenue trend description",
        "expenses": "Expected expense trend description",
        "profitability": "Profitability forecast description",
        "riskFactors": ["List of potential risks"]
    }}
}}

Focus on practical business insights and actionable recommendations based on the financial data patterns.
Do not include any introductory text, closing text, or markdown formatting.
The response should be the raw JSON object itself.
"#
    ))
}

pub fn build_pitch_prompt(transcript: &str) -> Result<String> {
    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(AssistantError::AnalysisFailure(
            "No transcript available to analyze. Please record your pitch first.".to_string(),
        ));
    }

    Ok(format!(
        r#"Analyze this funding pitch and provide a detailed assessment in JSON format. The pitch is: "{transcript}"

Please evaluate the pitch on the following criteria and return a JSON object with this exact structure:
{{
    "overallScore": (number from 1-10),
    "strengths": ["strength1", "strength2", "strength3"],
    "weaknesses": ["weakness1", "weakness2", "weakness3"],
    "marketOpportunity": {{ "score": (1-10), "feedback": "detailed feedback" }},
    "businessModel": {{ "score": (1-10), "feedback": "detailed feedback" }},
    "team": {{ "score": (1-10), "feedback": "detailed feedback" }},
    "traction": {{ "score": (1-10), "feedback": "detailed feedback" }},
    "financials": {{ "score": (1-10), "feedback": "detailed feedback" }},
    "recommendations": ["recommendation1", "recommendation2", "recommendation3"],
    "fundingReadiness": "High/Medium/Low",
    "summary": "overall summary of the pitch"
}}"#
    ))
}

pub fn build_jargon_prompt(text: &str, language: Language) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AssistantError::AnalysisFailure(
            "Please enter some financial text to simplify".to_string(),
        ));
    }

    let target = language.instruction_name();
    let language_rule = if language == Language::English {
        String::new()
    } else {
        format!(
            "IMPORTANT: Your entire response must be in {target}. All explanations, terms, and text should be in {target}. \
             If you need to keep the original English financial terms, provide them in parentheses after the {target} explanation.\n"
        )
    };

    Ok(format!(
        r#"You are a financial expert helping MSME business owners understand complex financial jargon.

Analyze the following financial text and provide your response ENTIRELY in {target}:

1. Identify all financial terms, acronyms, and jargon
2. Create simplified explanations for each term in {target}
3. Rewrite the entire text in simple, easy-to-understand {target} that a business owner can understand
4. Provide context about why each term matters to a business owner

{language_rule}
Financial Text:
"{text}"

Return your response in this JSON format:
{{
  "simplifiedText": "Complete rewrite of the text in simple {target} that an MSME owner can understand",
  "terms": [
    {{
      "original": "exact term from the text",
      "simple": "simple explanation in {target}",
      "context": "why this matters to a business owner (in {target})",
      "example": "practical example if helpful (in {target})"
    }}
  ],
  "summary": "2-3 sentence summary in {target} of what this document means for the business owner"
}}"#
    ))
}
