use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted facility record. Rows are created inactive and flipped active in
/// bulk once their batch completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub batch_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated facility candidate. Only the row validator constructs these, so
/// name and address are always non-blank and within length limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

/// Partial update for a single facility. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacilityUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl FacilityUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.phone.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(FacilityUpdate::default().is_empty());
        let update = FacilityUpdate {
            name: Some("General Hospital".to_string()),
            ..FacilityUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
