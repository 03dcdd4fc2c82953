use serde::Serialize;

/// One parsed CSV line, after header resolution, with its 1-based data-row
/// number. Ephemeral: produced here, consumed once by the validator.
#[derive(Debug, Clone, Serialize)]
pub struct RawRecord {
    pub row_number: i32,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Original line rendered back as text, kept for failed-row reporting.
    pub source: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("file is empty")]
    Empty,

    #[error("file is not valid UTF-8 encoded text")]
    NotUtf8,

    #[error("CSV file must have at least one data row")]
    NoDataRows,

    #[error("invalid CSV file: {0}")]
    Malformed(String),

    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: i32,
        expected: usize,
        found: usize,
    },

    #[error("maximum {0} rows allowed per upload")]
    TooManyRows(usize),
}

/// Decodes an uploaded byte stream into ordered raw records.
///
/// The first line is consumed as a header iff its fields are a duplicate-free
/// subset of {name, address, phone} containing both name and address, in any
/// order. Anything else is data, read positionally as name,address,phone.
/// The heuristic is best effort: a facility literally named "name" on the
/// first line is indistinguishable from a header.
pub fn decode(bytes: &[u8], max_rows: usize) -> Result<Vec<RawRecord>, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FormatError::NotUtf8)?;
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result.map_err(map_csv_error)?);
    }
    if records.is_empty() {
        return Err(FormatError::Empty);
    }

    let (name_idx, address_idx, phone_idx, data) = match header_columns(&records[0]) {
        Some((n, a, p)) => (n, a, p, &records[1..]),
        None => (0, 1, Some(2), &records[..]),
    };
    if data.is_empty() {
        return Err(FormatError::NoDataRows);
    }
    if data.len() > max_rows {
        return Err(FormatError::TooManyRows(max_rows));
    }

    let rows = data
        .iter()
        .enumerate()
        .map(|(i, record)| RawRecord {
            row_number: (i + 1) as i32,
            name: field_at(record, Some(name_idx)),
            address: field_at(record, Some(address_idx)),
            phone: field_at(record, phone_idx),
            source: record.iter().collect::<Vec<_>>().join(","),
        })
        .collect();
    Ok(rows)
}

/// Column positions of (name, address, phone) when the record is a header.
fn header_columns(record: &csv::StringRecord) -> Option<(usize, usize, Option<usize>)> {
    let mut name_idx = None;
    let mut address_idx = None;
    let mut phone_idx = None;
    for (idx, field) in record.iter().enumerate() {
        match field.trim().to_ascii_lowercase().as_str() {
            "name" if name_idx.is_none() => name_idx = Some(idx),
            "address" if address_idx.is_none() => address_idx = Some(idx),
            "phone" if phone_idx.is_none() => phone_idx = Some(idx),
            _ => return None,
        }
    }
    Some((name_idx?, address_idx?, phone_idx))
}

fn field_at(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i)).map(|s| s.to_string())
}

fn map_csv_error(e: csv::Error) -> FormatError {
    match e.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => FormatError::FieldCount {
            row: pos.as_ref().map(|p| p.record() as i32 + 1).unwrap_or(0),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => FormatError::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headerless_rows_are_read_positionally() {
        let csv = b"City Clinic,12 Main St,555-0101\nValley Hospital,9 Oak Ave,555-0102\n";
        let rows = decode(csv, 20).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[0].name.as_deref(), Some("City Clinic"));
        assert_eq!(rows[0].address.as_deref(), Some("12 Main St"));
        assert_eq!(rows[0].phone.as_deref(), Some("555-0101"));
        assert_eq!(rows[1].row_number, 2);
    }

    #[test]
    fn header_permutation_is_mapped_by_column_name() {
        let csv = b"Phone,Name,Address\n555-0101,City Clinic,12 Main St\n";
        let rows = decode(csv, 20).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 1);
        assert_eq!(rows[0].name.as_deref(), Some("City Clinic"));
        assert_eq!(rows[0].address.as_deref(), Some("12 Main St"));
        assert_eq!(rows[0].phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn two_column_header_leaves_phone_absent() {
        let csv = b"name,address\nCity Clinic,12 Main St\n";
        let rows = decode(csv, 20).unwrap();
        assert!(rows[0].phone.is_none());
    }

    #[test]
    fn two_column_headerless_rows_leave_phone_absent() {
        let csv = b"City Clinic,12 Main St\nValley Hospital,9 Oak Ave\n";
        let rows = decode(csv, 20).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].phone.is_none());
    }

    #[test]
    fn unknown_first_line_is_treated_as_data() {
        let csv = b"hospital,location,contact\nCity Clinic,12 Main St,555-0101\n";
        let rows = decode(csv, 20).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("hospital"));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let csv = b"\"St. Mary, West\",1 Elm St,555-0103\n";
        let rows = decode(csv, 20).unwrap();
        assert_eq!(rows[0].name.as_deref(), Some("St. Mary, West"));
    }

    #[test]
    fn empty_and_whitespace_uploads_are_rejected() {
        assert!(matches!(decode(b"", 20), Err(FormatError::Empty)));
        assert!(matches!(decode(b"  \n \n", 20), Err(FormatError::Empty)));
    }

    #[test]
    fn non_utf8_upload_is_rejected() {
        assert!(matches!(
            decode(&[0xff, 0xfe, 0x00], 20),
            Err(FormatError::NotUtf8)
        ));
    }

    #[test]
    fn header_without_data_rows_is_rejected() {
        assert!(matches!(
            decode(b"name,address,phone\n", 20),
            Err(FormatError::NoDataRows)
        ));
    }

    #[test]
    fn row_cap_is_enforced_before_any_mapping() {
        let mut csv = String::new();
        for i in 0..25 {
            csv.push_str(&format!("Clinic {},Street {},555-{:04}\n", i, i, i));
        }
        match decode(csv.as_bytes(), 20) {
            Err(FormatError::TooManyRows(max)) => assert_eq!(max, 20),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn inconsistent_field_counts_are_rejected() {
        let csv = b"City Clinic,12 Main St,555-0101\nValley Hospital,9 Oak Ave\n";
        assert!(matches!(
            decode(csv, 20),
            Err(FormatError::FieldCount { .. })
        ));
    }

    #[test]
    fn decode_is_pure_and_repeatable() {
        let csv = b"name,address,phone\nCity Clinic,12 Main St,\n";
        let first = decode(csv, 20).unwrap();
        let second = decode(csv, 20).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].source, second[0].source);
    }
}
