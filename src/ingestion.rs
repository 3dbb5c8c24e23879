use crate::dataset::{sample_dataset, TabularFinancialDataset};
use crate::error::{AssistantError, Result, REQUIRED_COLUMNS};
use crate::schema::FinancialPeriodRecord;
use crate::utils::{coerce_amount, normalize_header};
use csv::{ReaderBuilder, StringRecord, Writer};
use log::{debug, info, warn};
use std::path::Path;

/// File name offered for the downloadable sample.
pub const SAMPLE_FILE_NAME: &str = "sample_financial_data.csv";

const CSV_MEDIA_TYPE: &str = "text/csv";

/// An upload as received from a file picker or drop zone.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    /// Media type declared by the upload source, if any.
    pub media_type: Option<String>,
    pub content: String,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.map(str::to_string),
            content: content.into(),
        }
    }

    /// Builds an upload from raw bytes; content that is not UTF-8 is malformed.
    pub fn from_bytes(
        file_name: impl Into<String>,
        media_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let content = String::from_utf8(bytes)
            .map_err(|e| AssistantError::MalformedInput(format!("invalid UTF-8: {}", e)))?;
        Ok(Self::new(file_name, media_type, content))
    }

    /// Reads a file from disk. No media type is declared; the extension decides.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self::from_bytes(file_name, None, bytes)
    }

    /// True when either the declared media type or the file extension says CSV.
    pub fn is_delimited_text(&self) -> bool {
        let declared = self
            .media_type
            .as_deref()
            .and_then(|m| m.split(';').next())
            .map(|essence| essence.trim().eq_ignore_ascii_case(CSV_MEDIA_TYPE))
            .unwrap_or(false);

        declared
            || mime_guess::from_path(&self.file_name)
                .iter()
                .any(|mime| mime.essence_str() == CSV_MEDIA_TYPE)
    }
}

/// Parses and validates an upload into a dataset.
///
/// Checks run in a fixed order: file type, CSV structure, row count, required
/// columns, then per-row month labels. The first failure aborts the load; no
/// partial dataset is ever returned.
pub fn load_dataset(file: &UploadedFile) -> Result<TabularFinancialDataset> {
    let result = parse_upload(file);
    match &result {
        Ok(dataset) => info!(
            "Loaded {} financial records from '{}'",
            dataset.len(),
            file.file_name
        ),
        Err(e) => warn!("Rejected upload '{}': {}", file.file_name, e),
    }
    result
}

fn parse_upload(file: &UploadedFile) -> Result<TabularFinancialDataset> {
    if !file.is_delimited_text() {
        return Err(AssistantError::InvalidFileType);
    }

    let (headers, rows) = read_rows(&file.content)?;
    debug!(
        "Parsed {} data rows with headers {:?}",
        rows.len(),
        headers.iter().collect::<Vec<_>>()
    );

    if rows.is_empty() {
        return Err(AssistantError::EmptyInput);
    }

    let columns = ColumnMap::from_headers(&headers)?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| columns.to_record(row, idx + 1))
        .collect::<Result<Vec<_>>>()?;

    TabularFinancialDataset::from_records(records)
}

fn read_rows(content: &str) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AssistantError::MalformedInput(e.to_string()))?
        .clone();

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AssistantError::MalformedInput(e.to_string()))?;

    Ok((headers, rows))
}

/// Positions of every column whose normalized header matches a required name.
/// Several columns may match (e.g. both `Month` and `month`).
struct ColumnMap {
    month: Vec<usize>,
    revenue: Vec<usize>,
    expenses: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let positions = |name: &str| -> Vec<usize> {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| normalize_header(h) == name)
                .map(|(idx, _)| idx)
                .collect()
        };

        let [month, revenue, expenses] = REQUIRED_COLUMNS.map(positions);
        if month.is_empty() || revenue.is_empty() || expenses.is_empty() {
            return Err(AssistantError::missing_columns());
        }

        Ok(Self {
            month,
            revenue,
            expenses,
        })
    }

    fn to_record(&self, row: &StringRecord, row_number: usize) -> Result<FinancialPeriodRecord> {
        let label = first_non_empty(row, &self.month)
            .ok_or(AssistantError::MissingMonthValue { row: row_number })?;

        let revenue = first_non_empty(row, &self.revenue)
            .map(coerce_amount)
            .unwrap_or(0.0);
        let expenses = first_non_empty(row, &self.expenses)
            .map(coerce_amount)
            .unwrap_or(0.0);

        Ok(FinancialPeriodRecord::new(label, revenue, expenses))
    }
}

fn first_non_empty<'a>(row: &'a StringRecord, positions: &[usize]) -> Option<&'a str> {
    positions
        .iter()
        .filter_map(|&idx| row.get(idx))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Serializes a dataset as `month,revenue,expenses` CSV. Loading the output
/// yields an equal dataset.
pub fn export_csv(dataset: &TabularFinancialDataset) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = Writer::from_writer(&mut buffer);
        write_records(&mut writer, dataset)?;
        writer.flush()?;
    }

    String::from_utf8(buffer).map_err(|e| {
        AssistantError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Writes a dataset to `path` in the same format as [`export_csv`].
pub fn write_csv(dataset: &TabularFinancialDataset, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    write_records(&mut writer, dataset)?;
    writer.flush()?;
    Ok(())
}

/// CSV text of the built-in sample dataset.
pub fn sample_csv() -> Result<String> {
    export_csv(&sample_dataset())
}

fn write_records<W: std::io::Write>(
    writer: &mut Writer<W>,
    dataset: &TabularFinancialDataset,
) -> Result<()> {
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in dataset {
        let revenue = record.revenue.to_string();
        let expenses = record.expenses.to_string();
        writer.write_record([record.label.as_str(), revenue.as_str(), expenses.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FinancialPeriodRecord;

    fn csv_upload(content: &str) -> UploadedFile {
        UploadedFile::new("data.csv", Some("text/csv"), content)
    }

    #[test]
    fn test_load_basic() {
        let csv = "month,revenue,expenses\nJan,200000,150000\nFeb,180000,160000";
        let dataset = load_dataset(&csv_upload(csv)).unwrap();

        assert_eq!(
            dataset.records(),
            &[
                FinancialPeriodRecord::new("Jan", 200_000.0, 150_000.0),
                FinancialPeriodRecord::new("Feb", 180_000.0, 160_000.0),
            ]
        );
        let jan = dataset.get(0).unwrap();
        assert_eq!(jan.profit(), 50_000.0);
        assert!((jan.margin() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_file_type_checks() {
        let by_extension = UploadedFile::new("numbers.CSV", None, "");
        assert!(by_extension.is_delimited_text());

        let by_media_type = UploadedFile::new("blob", Some("text/csv;charset=utf-8"), "");
        assert!(by_media_type.is_delimited_text());

        let neither = UploadedFile::new(
            "report.pdf",
            Some("application/pdf"),
            "month,revenue,expenses\nJan,1,1",
        );
        assert!(matches!(
            load_dataset(&neither),
            Err(AssistantError::InvalidFileType)
        ));
    }

    #[test]
    fn test_header_case_and_whitespace() {
        let dataset = load_dataset(&csv_upload(" MONTH ,Revenue,EXPENSES\nJan,10,4\n")).unwrap();
        assert_eq!(dataset.records(), &[FinancialPeriodRecord::new("Jan", 10.0, 4.0)]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "month,revenue,expenses\n\nJan,10,4\n\nFeb,12,5\n\n";
        let dataset = load_dataset(&csv_upload(csv)).unwrap();
        assert_eq!(dataset.labels(), vec!["Jan", "Feb"]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "region,month,revenue,expenses,notes\nNorth,Jan,10,4,ok";
        let dataset = load_dataset(&csv_upload(csv)).unwrap();
        assert_eq!(dataset.records(), &[FinancialPeriodRecord::new("Jan", 10.0, 4.0)]);
    }

    #[test]
    fn test_non_numeric_amounts_coerce_to_zero() {
        let dataset =
            load_dataset(&csv_upload("month,revenue,expenses\nJan,abc,\nFeb,,1e3")).unwrap();
        assert_eq!(
            dataset.records(),
            &[
                FinancialPeriodRecord::new("Jan", 0.0, 0.0),
                FinancialPeriodRecord::new("Feb", 0.0, 1000.0),
            ]
        );
    }

    #[test]
    fn test_numeric_label_is_stringified() {
        let dataset = load_dataset(&csv_upload("month,revenue,expenses\n 2023 ,5,2")).unwrap();
        assert_eq!(dataset.get(0).unwrap().label, "2023");
    }

    #[test]
    fn test_missing_month_value_rejects_whole_load() {
        let result = load_dataset(&csv_upload("month,revenue,expenses\nJan,1,1\n ,2,2\nMar,3,3"));
        assert!(matches!(
            result,
            Err(AssistantError::MissingMonthValue { row: 2 })
        ));
    }

    #[test]
    fn test_duplicate_case_variant_columns() {
        let dataset =
            load_dataset(&csv_upload("Month,month,revenue,expenses\n,Feb,7,3")).unwrap();
        assert_eq!(dataset.get(0).unwrap().label, "Feb");
    }

    #[test]
    fn test_missing_columns() {
        let result = load_dataset(&csv_upload("month,revenue\nJan,100"));
        assert!(matches!(result, Err(AssistantError::MissingColumns { .. })));
    }

    #[test]
    fn test_header_only_is_empty() {
        let result = load_dataset(&csv_upload("month,revenue,expenses\n"));
        assert!(matches!(result, Err(AssistantError::EmptyInput)));

        let result = load_dataset(&csv_upload(""));
        assert!(matches!(result, Err(AssistantError::EmptyInput)));
    }

    #[test]
    fn test_row_length_mismatch_is_malformed() {
        let result = load_dataset(&csv_upload("month,revenue,expenses\nJan,1\n"));
        match result {
            Err(AssistantError::MalformedInput(message)) => assert!(!message.is_empty()),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let result = UploadedFile::from_bytes("data.csv", None, vec![0x6d, 0xff, 0xfe]);
        assert!(matches!(result, Err(AssistantError::MalformedInput(_))));
    }

    #[test]
    fn test_export_round_trip() {
        let dataset = TabularFinancialDataset::from_records(vec![
            FinancialPeriodRecord::new("Jan", 200_000.0, 150_000.0),
            FinancialPeriodRecord::new("Q2, 2024", 1250.75, -30.5),
            FinancialPeriodRecord::new("Jan", 0.0, 0.0),
        ])
        .unwrap();

        let csv = export_csv(&dataset).unwrap();
        assert!(csv.starts_with("month,revenue,expenses\n"));

        let reloaded = load_dataset(&csv_upload(&csv)).unwrap();
        assert_eq!(reloaded, dataset);
    }

    #[test]
    fn test_sample_csv() {
        let csv = sample_csv().unwrap();
        assert_eq!(csv.lines().count(), 7);
        assert_eq!(csv.lines().nth(1), Some("Jan,200000,150000"));
    }
}
