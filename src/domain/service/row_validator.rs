use crate::domain::entity::facility::NewFacility;
use crate::domain::service::csv_decoder::RawRecord;

pub const MAX_FIELD_LENGTH: usize = 255;

/// One row yields at most one error: rules are applied in order and the
/// first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is a required field")]
    MissingName,

    #[error("name must be at most {MAX_FIELD_LENGTH} characters")]
    NameTooLong,

    #[error("address is a required field")]
    MissingAddress,

    #[error("address must be at most {MAX_FIELD_LENGTH} characters")]
    AddressTooLong,

    #[error("phone must be at most {MAX_FIELD_LENGTH} characters")]
    PhoneTooLong,
}

pub fn validate(record: &RawRecord) -> Result<NewFacility, ValidationError> {
    let name = valid_name(record.name.as_deref())?;
    let address = valid_address(record.address.as_deref())?;
    let phone = valid_phone(record.phone.as_deref())?;
    Ok(NewFacility {
        name,
        address,
        phone,
    })
}

pub fn valid_name(value: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

pub fn valid_address(value: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::AddressTooLong);
    }
    Ok(trimmed.to_string())
}

/// A blank phone collapses to absent rather than failing the row.
pub fn valid_phone(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::PhoneTooLong);
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str, phone: &str) -> RawRecord {
        RawRecord {
            row_number: 1,
            name: Some(name.to_string()),
            address: Some(address.to_string()),
            phone: Some(phone.to_string()),
            source: format!("{},{},{}", name, address, phone),
        }
    }

    #[test]
    fn valid_row_is_trimmed() {
        let input = validate(&record("  City Clinic ", " 12 Main St ", " 555-0101 ")).unwrap();
        assert_eq!(input.name, "City Clinic");
        assert_eq!(input.address, "12 Main St");
        assert_eq!(input.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn blank_name_fails_first() {
        // Both fields are blank; only the name rule fires.
        let err = validate(&record("   ", "", "555-0101")).unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
    }

    #[test]
    fn absent_name_fails() {
        let mut rec = record("x", "12 Main St", "");
        rec.name = None;
        assert_eq!(validate(&rec).unwrap_err(), ValidationError::MissingName);
    }

    #[test]
    fn blank_address_fails() {
        let err = validate(&record("City Clinic", "  ", "")).unwrap_err();
        assert_eq!(err, ValidationError::MissingAddress);
    }

    #[test]
    fn overlong_name_fails() {
        let long = "x".repeat(256);
        let err = validate(&record(&long, "12 Main St", "")).unwrap_err();
        assert_eq!(err, ValidationError::NameTooLong);
    }

    #[test]
    fn name_at_limit_passes() {
        let exact = "x".repeat(255);
        assert!(validate(&record(&exact, "12 Main St", "")).is_ok());
    }

    #[test]
    fn blank_phone_collapses_to_none() {
        let input = validate(&record("City Clinic", "12 Main St", "   ")).unwrap();
        assert!(input.phone.is_none());
    }

    #[test]
    fn overlong_phone_fails() {
        let long = "5".repeat(256);
        let err = validate(&record("City Clinic", "12 Main St", &long)).unwrap_err();
        assert_eq!(err, ValidationError::PhoneTooLong);
    }
}
