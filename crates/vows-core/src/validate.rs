//! Shape validation for a persisted guest list.
//!
//! Validation is all-or-nothing: a single bad element rejects the whole
//! value, so a caller never ends up with a partially-accepted list.

use crate::error::ErrorCode;
use crate::model::{Guest, GuestId};
use serde_json::Value;
use std::collections::HashSet;

/// Why a persisted guest list was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("guest list is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("guest list must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("element {index} must be an object, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    #[error("element {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("element {index} field `{field}` must be {expected}, found {found}")]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("element {index} repeats id {id}")]
    DuplicateId { index: usize, id: GuestId },
}

impl ValidationError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidGuestData
    }
}

#[derive(Clone, Copy)]
enum Expected {
    Integer,
    String,
    Bool,
}

impl Expected {
    const fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::String => "a string",
            Self::Bool => "a boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.as_i64().is_some(),
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
        }
    }
}

const FIELDS: [(&str, Expected); 5] = [
    ("id", Expected::Integer),
    ("name", Expected::String),
    ("table", Expected::String),
    ("checkedIn", Expected::Bool),
    ("vip", Expected::Bool),
];

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse and validate a serialized guest list.
///
/// Every element must carry `id` (integer), `name` (string), `table`
/// (string), `checkedIn` (boolean) and `vip` (boolean). Ids must be pairwise
/// distinct. Unknown extra fields are ignored.
///
/// # Errors
///
/// Returns the first violation found, in element order.
pub fn parse_guest_list(raw: &str) -> Result<Vec<Guest>, ValidationError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_guest_list(value)
}

/// Validate an already-parsed JSON value. See [`parse_guest_list`].
///
/// # Errors
///
/// Returns the first violation found, in element order.
pub fn validate_guest_list(value: Value) -> Result<Vec<Guest>, ValidationError> {
    let Value::Array(elements) = value else {
        return Err(ValidationError::NotAnArray {
            found: kind_of(&value),
        });
    };

    let mut seen = HashSet::with_capacity(elements.len());
    let mut guests = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        check_shape(index, &element)?;
        let guest: Guest = serde_json::from_value(element)?;
        if !seen.insert(guest.id) {
            return Err(ValidationError::DuplicateId {
                index,
                id: guest.id,
            });
        }
        guests.push(guest);
    }

    Ok(guests)
}

fn check_shape(index: usize, element: &Value) -> Result<(), ValidationError> {
    let Some(object) = element.as_object() else {
        return Err(ValidationError::NotAnObject {
            index,
            found: kind_of(element),
        });
    };

    for (field, expected) in FIELDS {
        let Some(value) = object.get(field) else {
            return Err(ValidationError::MissingField { index, field });
        };
        if !expected.matches(value) {
            return Err(ValidationError::WrongType {
                index,
                field,
                expected: expected.describe(),
                found: kind_of(value),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"[
        {"id": 1, "name": "Lady Sarah Montgomery", "table": "1", "checkedIn": true, "vip": true},
        {"id": 3, "name": "Mr. Michael Chen", "table": "2", "checkedIn": false, "vip": false}
    ]"#;

    #[test]
    fn accepts_well_formed_list() {
        let guests = parse_guest_list(VALID).expect("valid list");
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[1].id, 3);
        assert!(guests[0].checked_in);
    }

    #[test]
    fn accepts_empty_array() {
        assert!(parse_guest_list("[]").expect("empty list").is_empty());
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = r#"[{"id": 1, "name": "A", "table": "1", "checkedIn": false, "vip": false, "note": "x"}]"#;
        assert_eq!(parse_guest_list(raw).expect("valid").len(), 1);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_guest_list("[{").expect_err("should fail");
        assert!(matches!(err, ValidationError::Malformed(_)));
        assert_eq!(err.code(), ErrorCode::InvalidGuestData);
    }

    #[test]
    fn rejects_non_array() {
        let err = parse_guest_list(r#"{"id": 1}"#).expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::NotAnArray {
                found: "an object"
            }
        ));
    }

    #[test]
    fn rejects_whole_list_when_one_element_misses_vip() {
        let raw = r#"[
            {"id": 1, "name": "A", "table": "1", "checkedIn": false, "vip": false},
            {"id": 2, "name": "B", "table": "1", "checkedIn": false}
        ]"#;
        let err = parse_guest_list(raw).expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::MissingField {
                index: 1,
                field: "vip"
            }
        ));
    }

    #[test]
    fn rejects_string_id() {
        let raw = r#"[{"id": "1", "name": "A", "table": "1", "checkedIn": false, "vip": false}]"#;
        let err = parse_guest_list(raw).expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::WrongType {
                index: 0,
                field: "id",
                found: "a string",
                ..
            }
        ));
    }

    #[test]
    fn rejects_fractional_id() {
        let raw = r#"[{"id": 1.5, "name": "A", "table": "1", "checkedIn": false, "vip": false}]"#;
        assert!(matches!(
            parse_guest_list(raw),
            Err(ValidationError::WrongType { field: "id", .. })
        ));
    }

    #[test]
    fn rejects_non_object_element() {
        let err = parse_guest_list("[1]").expect_err("should fail");
        assert!(matches!(err, ValidationError::NotAnObject { index: 0, .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"[
            {"id": 4, "name": "A", "table": "1", "checkedIn": false, "vip": false},
            {"id": 4, "name": "B", "table": "2", "checkedIn": false, "vip": false}
        ]"#;
        let err = parse_guest_list(raw).expect_err("should fail");
        assert!(matches!(err, ValidationError::DuplicateId { index: 1, id: 4 }));
    }

    #[test]
    fn round_trips_serialized_guests() {
        let guests = parse_guest_list(VALID).expect("valid list");
        let raw = serde_json::to_string(&guests).expect("serialize");
        assert_eq!(parse_guest_list(&raw).expect("reparse"), guests);
    }
}
