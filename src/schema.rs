use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One period (usually a month) of revenue and expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialPeriodRecord {
    #[schemars(description = "Identifier for the period, e.g. 'Jan' or '2023'. Never empty.")]
    pub label: String,

    #[schemars(description = "Revenue earned in the period")]
    pub revenue: f64,

    #[schemars(description = "Expenses incurred in the period")]
    pub expenses: f64,
}

impl FinancialPeriodRecord {
    pub fn new(label: impl Into<String>, revenue: f64, expenses: f64) -> Self {
        Self {
            label: label.into(),
            revenue,
            expenses,
        }
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }

    /// Profit as a percentage of revenue; 0 when there is no revenue.
    pub fn margin(&self) -> f64 {
        if self.revenue > 0.0 {
            self.profit() / self.revenue * 100.0
        } else {
            0.0
        }
    }
}

/// Numeric fields that can be edited in place. The label is not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Revenue,
    Expenses,
}

/// Row shape handed to the text-generation service for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInputRow {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

impl From<&FinancialPeriodRecord> for AnalysisInputRow {
    fn from(record: &FinancialPeriodRecord) -> Self {
        Self {
            month: record.label.clone(),
            revenue: record.revenue,
            expenses: record.expenses,
            profit: record.profit(),
        }
    }
}

/// Row shape exchanged with the forecasting service, in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub expenses: f64,
}

impl ForecastPoint {
    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }
}

impl From<&FinancialPeriodRecord> for ForecastPoint {
    fn from(record: &FinancialPeriodRecord) -> Self {
        Self {
            month: record.label.clone(),
            revenue: record.revenue,
            expenses: record.expenses,
        }
    }
}

/// Body of a forecast request: the known periods plus how many to project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub data: Vec<ForecastPoint>,
    pub periods: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_and_margin() {
        let jan = FinancialPeriodRecord::new("Jan", 200_000.0, 150_000.0);
        assert_eq!(jan.profit(), 50_000.0);
        assert!((jan.margin() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_margin_without_revenue_is_zero() {
        let idle = FinancialPeriodRecord::new("Aug", 0.0, 12_000.0);
        assert_eq!(idle.profit(), -12_000.0);
        assert_eq!(idle.margin(), 0.0);
    }

    #[test]
    fn test_analysis_row_carries_profit() {
        let row = AnalysisInputRow::from(&FinancialPeriodRecord::new("Feb", 180_000.0, 160_000.0));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["month"], "Feb");
        assert_eq!(json["profit"], 20_000.0);
    }

    #[test]
    fn test_forecast_point_tolerates_missing_amounts() {
        let point: ForecastPoint = serde_json::from_str(r#"{"month":"Jul"}"#).unwrap();
        assert_eq!(point, ForecastPoint { month: "Jul".into(), revenue: 0.0, expenses: 0.0 });
    }
}
