use crate::dataset::TabularFinancialDataset;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXCELLENT_MARGIN: f64 = 25.0;
pub const GOOD_MARGIN: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HealthStatus {
    Excellent,
    Good,
    AtRisk,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::AtRisk => "At Risk",
        };
        f.write_str(label)
    }
}

/// Overall business health, graded on the dataset-wide profit margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRating {
    pub status: HealthStatus,
    /// Overall profit margin in percent.
    pub margin: f64,
}

impl HealthRating {
    pub fn from_margin(margin: f64) -> Self {
        let status = if margin >= EXCELLENT_MARGIN {
            HealthStatus::Excellent
        } else if margin >= GOOD_MARGIN {
            HealthStatus::Good
        } else {
            HealthStatus::AtRisk
        };
        Self { status, margin }
    }

    pub fn from_dataset(dataset: &TabularFinancialDataset) -> Self {
        Self::from_margin(dataset.overall_margin())
    }
}

impl fmt::Display for HealthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}% margin)", self.status, self.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::starter_dataset;
    use crate::schema::FinancialPeriodRecord;

    #[test]
    fn test_thresholds() {
        assert_eq!(HealthRating::from_margin(25.0).status, HealthStatus::Excellent);
        assert_eq!(HealthRating::from_margin(24.9).status, HealthStatus::Good);
        assert_eq!(HealthRating::from_margin(15.0).status, HealthStatus::Good);
        assert_eq!(HealthRating::from_margin(14.99).status, HealthStatus::AtRisk);
        assert_eq!(HealthRating::from_margin(-40.0).status, HealthStatus::AtRisk);
    }

    #[test]
    fn test_starter_dataset_is_good() {
        let rating = HealthRating::from_dataset(&starter_dataset());
        assert_eq!(rating.status, HealthStatus::Good);
        assert_eq!(rating.to_string(), "Good (15.3% margin)");
    }

    #[test]
    fn test_no_revenue_is_at_risk() {
        let dataset = TabularFinancialDataset::from_records(vec![FinancialPeriodRecord::new(
            "Jan", 0.0, 500.0,
        )])
        .unwrap();
        let rating = HealthRating::from_dataset(&dataset);
        assert_eq!(rating.status, HealthStatus::AtRisk);
        assert_eq!(rating.margin, 0.0);
    }
}
