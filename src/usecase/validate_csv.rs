use serde::Serialize;

use crate::domain::service::csv_decoder::{self, FormatError};
use crate::domain::service::row_validator;

#[derive(Debug, Serialize)]
pub struct CsvRowError {
    pub row: i32,
    pub error: String,
}

/// Preview of what an ingestion run would do with this file. `valid` means
/// every row would persist.
#[derive(Debug, Serialize)]
pub struct CsvValidationReport {
    pub valid: bool,
    pub row_count: usize,
    pub errors: Vec<CsvRowError>,
}

/// Dry-run validation of an upload. Shares the decoder and row rules with the
/// ingestion engine, so the verdict matches what a real run would record.
pub struct ValidateCsvUsecase {
    max_csv_rows: usize,
}

impl ValidateCsvUsecase {
    pub fn new(max_csv_rows: usize) -> Self {
        Self { max_csv_rows }
    }

    pub fn execute(&self, bytes: &[u8]) -> Result<CsvValidationReport, FormatError> {
        let records = csv_decoder::decode(bytes, self.max_csv_rows)?;
        let errors: Vec<CsvRowError> = records
            .iter()
            .filter_map(|record| {
                row_validator::validate(record).err().map(|e| CsvRowError {
                    row: record.row_number,
                    error: e.to_string(),
                })
            })
            .collect();
        Ok(CsvValidationReport {
            valid: errors.is_empty(),
            row_count: records.len(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_file_is_valid() {
        let csv = b"name,address,phone\nCity Clinic,12 Main St,555-0101\n";
        let report = ValidateCsvUsecase::new(20).execute(csv).unwrap();
        assert!(report.valid);
        assert_eq!(report.row_count, 1);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn each_bad_row_is_reported_with_its_position() {
        let csv = b"name,address,phone\n\
            City Clinic,12 Main St,\n\
            ,9 Oak Ave,\n\
            Hill Clinic,,\n";
        let report = ValidateCsvUsecase::new(20).execute(csv).unwrap();
        assert!(!report.valid);
        assert_eq!(report.row_count, 3);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].row, 2);
        assert_eq!(report.errors[0].error, "name is a required field");
        assert_eq!(report.errors[1].row, 3);
        assert_eq!(report.errors[1].error, "address is a required field");
    }

    #[test]
    fn format_failures_propagate() {
        assert!(matches!(
            ValidateCsvUsecase::new(20).execute(b""),
            Err(FormatError::Empty)
        ));
    }

    #[test]
    fn validation_is_idempotent() {
        let csv = b"name,address,phone\n,12 Main St,\n";
        let uc = ValidateCsvUsecase::new(20);
        let first = uc.execute(csv).unwrap();
        let second = uc.execute(csv).unwrap();
        assert_eq!(first.valid, second.valid);
        assert_eq!(first.errors.len(), second.errors.len());
    }
}
