//! # SME Finance Assistant
//!
//! Core of a financial assistant for small and medium businesses: uploaded
//! CSVs become a validated, ordered table of per-period revenue and expenses
//! that can be edited, graded, exported and handed to remote analysis and
//! forecasting services.
//!
//! ## Core Concepts
//!
//! - **Dataset**: a never-empty, ordered sequence of period records. Edits return new values.
//! - **Loader**: file type, CSV structure, row count, required columns and month labels are
//!   checked in that order; the first failure rejects the whole upload.
//! - **Workspace**: the view-owned dataset plus an explicit "analysis is stale" flag.
//! - **Remote collaborators** (feature `gemini`): a generative-language client for insights,
//!   an HTTP forecast client and a document-upload client. Credentials and endpoints come
//!   from [`AssistantConfig`].
//!
//! ## Example
//!
//! ```rust
//! use sme_finance_assistant::*;
//!
//! let upload = UploadedFile::new(
//!     "q1.csv",
//!     Some("text/csv"),
//!     "month,revenue,expenses\nJan,200000,150000\nFeb,180000,160000",
//! );
//!
//! let mut workspace = DatasetWorkspace::new();
//! workspace.load_upload(&upload).unwrap();
//!
//! let jan = workspace.dataset().get(0).unwrap();
//! assert_eq!(jan.profit(), 50_000.0);
//! assert_eq!(jan.margin(), 25.0);
//!
//! workspace.apply_edit(DatasetEdit::Append).unwrap();
//! assert_eq!(workspace.dataset().get(2).unwrap().label, "Mar");
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod health;
pub mod ingestion;
pub mod llm;
pub mod schema;
pub mod utils;
pub mod workspace;

pub use config::AssistantConfig;
pub use dataset::{
    default_label, sample_dataset, starter_dataset, TabularFinancialDataset, MONTH_CYCLE,
};
pub use error::{AssistantError, Result};
pub use health::{HealthRating, HealthStatus};
pub use ingestion::*;
pub use schema::*;
pub use workspace::{DatasetEdit, DatasetWorkspace};
