use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Created,
    Failed,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Created => "created",
            RowStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for RowStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(RowStatus::Created),
            "failed" => Ok(RowStatus::Failed),
            other => Err(anyhow::anyhow!("unknown row status: {}", other)),
        }
    }
}

/// Per-row result of an ingestion run. Append-only: written once when the
/// row's fate is known, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub batch_id: Uuid,
    pub row_number: i32,
    pub name: String,
    pub status: RowStatus,
    pub facility_id: Option<i64>,
    pub error: Option<String>,
    pub raw_data: Option<String>,
}

impl RowOutcome {
    pub fn created(batch_id: Uuid, row_number: i32, name: String, facility_id: i64) -> Self {
        Self {
            batch_id,
            row_number,
            name,
            status: RowStatus::Created,
            facility_id: Some(facility_id),
            error: None,
            raw_data: None,
        }
    }

    pub fn failed(
        batch_id: Uuid,
        row_number: i32,
        name: String,
        error: String,
        raw_data: Option<String>,
    ) -> Self {
        Self {
            batch_id,
            row_number,
            name,
            status: RowStatus::Failed,
            facility_id: None,
            error: Some(error),
            raw_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_outcome_carries_facility_id() {
        let outcome = RowOutcome::created(Uuid::new_v4(), 1, "City Clinic".to_string(), 42);
        assert_eq!(outcome.status, RowStatus::Created);
        assert_eq!(outcome.facility_id, Some(42));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn failed_outcome_keeps_the_raw_row() {
        let outcome = RowOutcome::failed(
            Uuid::new_v4(),
            2,
            String::new(),
            "name is a required field".to_string(),
            Some(",12 Main St,555-0199".to_string()),
        );
        assert_eq!(outcome.status, RowStatus::Failed);
        assert!(outcome.facility_id.is_none());
        assert_eq!(outcome.raw_data.as_deref(), Some(",12 Main St,555-0199"));
    }
}
