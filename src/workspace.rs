use crate::dataset::{starter_dataset, TabularFinancialDataset};
use crate::error::Result;
use crate::health::HealthRating;
use crate::ingestion::{load_dataset, UploadedFile};
use crate::llm::types::{FinancialAnalysis, ForecastAnalysis};
use crate::schema::{ForecastPoint, RecordField};
use log::{debug, info};

/// A manual change requested against the current dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetEdit {
    Append,
    Update {
        index: usize,
        field: RecordField,
        raw: String,
    },
    Remove {
        index: usize,
    },
}

/// View-owned state: the current dataset and everything derived from it.
///
/// Each change to the dataset bumps `revision` and marks derived analysis as
/// stale. Results computed against an older revision are discarded when they
/// come back.
#[derive(Debug, Clone)]
pub struct DatasetWorkspace {
    dataset: TabularFinancialDataset,
    revision: u64,
    analysis: Option<FinancialAnalysis>,
    analysis_stale: bool,
    forecast: Vec<ForecastPoint>,
    forecast_analysis: Option<ForecastAnalysis>,
}

impl Default for DatasetWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetWorkspace {
    pub fn new() -> Self {
        Self::with_dataset(starter_dataset())
    }

    pub fn with_dataset(dataset: TabularFinancialDataset) -> Self {
        Self {
            dataset,
            revision: 0,
            analysis: None,
            analysis_stale: false,
            forecast: Vec::new(),
            forecast_analysis: None,
        }
    }

    pub fn dataset(&self) -> &TabularFinancialDataset {
        &self.dataset
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the dataset with a freshly loaded upload.
    ///
    /// On failure nothing changes: the previous dataset and any derived
    /// results stay as they were.
    pub fn load_upload(&mut self, file: &UploadedFile) -> Result<()> {
        let dataset = load_dataset(file)?;
        self.dataset = dataset;
        self.revision += 1;
        self.analysis = None;
        self.analysis_stale = false;
        self.forecast.clear();
        self.forecast_analysis = None;
        info!(
            "Workspace now holds {} records (revision {})",
            self.dataset.len(),
            self.revision
        );
        Ok(())
    }

    /// Applies a manual edit. Returns whether the dataset changed.
    ///
    /// Removing the only remaining record is refused and leaves derived
    /// results valid.
    pub fn apply_edit(&mut self, edit: DatasetEdit) -> Result<bool> {
        let next = match &edit {
            DatasetEdit::Append => self.dataset.append(),
            DatasetEdit::Update { index, field, raw } => self.dataset.update(*index, *field, raw)?,
            DatasetEdit::Remove { .. } if self.dataset.len() <= 1 => {
                debug!("Ignoring remove on a single-record dataset");
                return Ok(false);
            }
            DatasetEdit::Remove { index } => self.dataset.remove(*index)?,
        };

        self.dataset = next;
        self.invalidate();
        debug!("Applied {:?}; revision {}", edit, self.revision);
        Ok(true)
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        if self.analysis.is_some() {
            self.analysis_stale = true;
        }
        self.forecast.clear();
        self.forecast_analysis = None;
    }

    pub fn is_analysis_stale(&self) -> bool {
        self.analysis_stale
    }

    /// The current analysis, or `None` when there is none or it is stale.
    pub fn analysis(&self) -> Option<&FinancialAnalysis> {
        if self.analysis_stale {
            None
        } else {
            self.analysis.as_ref()
        }
    }

    /// The last analysis received, stale or not.
    pub fn last_analysis(&self) -> Option<&FinancialAnalysis> {
        self.analysis.as_ref()
    }

    /// Stores an analysis computed against `revision`. Results for an older
    /// revision are dropped and `false` is returned.
    pub fn record_analysis(&mut self, revision: u64, analysis: FinancialAnalysis) -> bool {
        if revision != self.revision {
            debug!(
                "Discarding analysis for revision {} (current {})",
                revision, self.revision
            );
            return false;
        }
        self.analysis = Some(analysis);
        self.analysis_stale = false;
        true
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn forecast_analysis(&self) -> Option<&ForecastAnalysis> {
        self.forecast_analysis.as_ref()
    }

    /// Stores forecast rows computed against `revision`, replacing earlier ones.
    pub fn record_forecast(&mut self, revision: u64, points: Vec<ForecastPoint>) -> bool {
        if revision != self.revision {
            return false;
        }
        self.forecast = points;
        self.forecast_analysis = None;
        true
    }

    pub fn record_forecast_analysis(&mut self, revision: u64, analysis: ForecastAnalysis) -> bool {
        if revision != self.revision {
            return false;
        }
        self.forecast_analysis = Some(analysis);
        true
    }

    pub fn health_rating(&self) -> HealthRating {
        HealthRating::from_dataset(&self.dataset)
    }
}
