use crate::error::{AssistantError, Result};
use crate::schema::{AnalysisInputRow, FinancialPeriodRecord, ForecastPoint, RecordField};
use crate::utils::coerce_integer;
use log::debug;
use serde::{Deserialize, Serialize};

/// Labels handed out by [`TabularFinancialDataset::append`], indexed by the
/// current length modulo 12.
pub const MONTH_CYCLE: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label the next appended record gets when the dataset holds `len` records.
/// Existing labels are not consulted, so datasets longer than 12 repeat names.
pub fn default_label(len: usize) -> &'static str {
    MONTH_CYCLE[len % MONTH_CYCLE.len()]
}

/// An ordered, never-empty sequence of period records.
///
/// Values are immutable from the outside: every edit returns a new dataset
/// and leaves the receiver untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<FinancialPeriodRecord>",
    into = "Vec<FinancialPeriodRecord>"
)]
pub struct TabularFinancialDataset {
    records: Vec<FinancialPeriodRecord>,
}

impl TabularFinancialDataset {
    /// Builds a dataset, rejecting an empty sequence or a record without a label.
    ///
    /// Labels are stored trimmed, the same form the loader reads them back in.
    pub fn from_records(records: Vec<FinancialPeriodRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(AssistantError::EmptyInput);
        }

        let records: Vec<FinancialPeriodRecord> = records
            .into_iter()
            .map(|mut record| {
                if record.label.trim().len() != record.label.len() {
                    record.label = record.label.trim().to_string();
                }
                record
            })
            .collect();

        if let Some(idx) = records.iter().position(|r| r.label.is_empty()) {
            return Err(AssistantError::MissingMonthValue { row: idx + 1 });
        }

        Ok(Self { records })
    }

    fn from_rows(rows: &[(&str, f64, f64)]) -> Self {
        Self {
            records: rows
                .iter()
                .map(|(label, revenue, expenses)| {
                    FinancialPeriodRecord::new(*label, *revenue, *expenses)
                })
                .collect(),
        }
    }

    pub fn records(&self) -> &[FinancialPeriodRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FinancialPeriodRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FinancialPeriodRecord> {
        self.records.get(index)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    /// Returns a copy with a zeroed record appended, labelled from [`MONTH_CYCLE`].
    pub fn append(&self) -> Self {
        let label = default_label(self.records.len());
        debug!("Appending record '{}' at position {}", label, self.records.len());

        let mut records = self.records.clone();
        records.push(FinancialPeriodRecord::new(label, 0.0, 0.0));
        Self { records }
    }

    /// Returns a copy with `field` at `index` overwritten by the integer
    /// coercion of `raw` (non-numeric input becomes 0).
    pub fn update(&self, index: usize, field: RecordField, raw: &str) -> Result<Self> {
        self.check_index(index)?;

        let value = coerce_integer(raw);
        let mut records = self.records.clone();
        let record = &mut records[index];
        match field {
            RecordField::Revenue => record.revenue = value,
            RecordField::Expenses => record.expenses = value,
        }

        Ok(Self { records })
    }

    /// Returns a copy without the record at `index`.
    ///
    /// A single-record dataset is returned unchanged whatever the index.
    pub fn remove(&self, index: usize) -> Result<Self> {
        if self.records.len() <= 1 {
            debug!("Refusing to remove the last remaining record");
            return Ok(self.clone());
        }
        self.check_index(index)?;

        let mut records = self.records.clone();
        records.remove(index);
        Ok(Self { records })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(AssistantError::RecordIndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }

    pub fn to_analysis_rows(&self) -> Vec<AnalysisInputRow> {
        self.records.iter().map(AnalysisInputRow::from).collect()
    }

    pub fn to_forecast_points(&self) -> Vec<ForecastPoint> {
        self.records.iter().map(ForecastPoint::from).collect()
    }

    pub fn total_revenue(&self) -> f64 {
        self.records.iter().map(|r| r.revenue).sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.records.iter().map(|r| r.expenses).sum()
    }

    pub fn total_profit(&self) -> f64 {
        self.total_revenue() - self.total_expenses()
    }

    /// Overall profit margin in percent; 0 when total revenue is not positive.
    pub fn overall_margin(&self) -> f64 {
        let revenue = self.total_revenue();
        if revenue > 0.0 {
            self.total_profit() / revenue * 100.0
        } else {
            0.0
        }
    }

    /// False when every record has zero revenue and zero expenses.
    pub fn has_financial_data(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.revenue != 0.0 || r.expenses != 0.0)
    }
}

impl TryFrom<Vec<FinancialPeriodRecord>> for TabularFinancialDataset {
    type Error = AssistantError;

    fn try_from(records: Vec<FinancialPeriodRecord>) -> Result<Self> {
        Self::from_records(records)
    }
}

impl From<TabularFinancialDataset> for Vec<FinancialPeriodRecord> {
    fn from(dataset: TabularFinancialDataset) -> Self {
        dataset.records
    }
}

impl<'a> IntoIterator for &'a TabularFinancialDataset {
    type Item = &'a FinancialPeriodRecord;
    type IntoIter = std::slice::Iter<'a, FinancialPeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The three months a fresh workspace starts with.
pub fn starter_dataset() -> TabularFinancialDataset {
    TabularFinancialDataset::from_rows(&[
        ("Jan", 200_000.0, 150_000.0),
        ("Feb", 180_000.0, 160_000.0),
        ("Mar", 210_000.0, 190_000.0),
    ])
}

/// The half-year example offered as a downloadable sample file.
pub fn sample_dataset() -> TabularFinancialDataset {
    TabularFinancialDataset::from_rows(&[
        ("Jan", 200_000.0, 150_000.0),
        ("Feb", 180_000.0, 160_000.0),
        ("Mar", 210_000.0, 190_000.0),
        ("Apr", 220_000.0, 180_000.0),
        ("May", 240_000.0, 200_000.0),
        ("Jun", 260_000.0, 210_000.0),
    ])
}
