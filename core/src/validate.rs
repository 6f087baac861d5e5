//! Field validators for todo records.
//!
//! Request bodies arrive as untyped JSON, so each validator takes a
//! `serde_json::Value` and either returns the normalized Rust value or a
//! `ValidationError` naming the field. All functions are pure.

use serde_json::Value;

use crate::error::{Field, ValidationError};
use crate::todo::Priority;

/// Accept a string that is non-empty after trimming; returns the trimmed text.
pub fn validate_name(value: &Value) -> Result<String, ValidationError> {
    let Value::String(raw) = value else {
        return Err(ValidationError::new(Field::Name, "must be a string"));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Name, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Accept an integer in `1..=3`. Numbers with a zero fractional part
/// (`2.0`) count as integers.
pub fn validate_priority(value: &Value) -> Result<Priority, ValidationError> {
    let integer = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    let Some(integer) = integer else {
        return Err(ValidationError::new(Field::Priority, "must be an integer"));
    };
    Priority::try_from(integer)
}

/// Accept only a JSON boolean.
pub fn validate_done(value: &Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| ValidationError::new(Field::Done, "must be a boolean"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name(&json!("  Buy milk \n")).unwrap(), "Buy milk");
    }

    #[test]
    fn name_rejects_blank_and_non_strings() {
        for bad in [json!(""), json!("   "), json!(null), json!(42), json!(["a"])] {
            let err = validate_name(&bad).unwrap_err();
            assert_eq!(err.field, Field::Name, "{bad}");
        }
    }

    #[test]
    fn priority_accepts_one_to_three() {
        assert_eq!(validate_priority(&json!(1)).unwrap(), Priority::High);
        assert_eq!(validate_priority(&json!(2)).unwrap(), Priority::Medium);
        assert_eq!(validate_priority(&json!(3)).unwrap(), Priority::Low);
        assert_eq!(validate_priority(&json!(2.0)).unwrap(), Priority::Medium);
    }

    #[test]
    fn priority_rejects_out_of_range_and_non_integers() {
        let cases = [
            json!(0),
            json!(4),
            json!(-1),
            json!(1.5),
            json!("2"),
            json!(null),
            json!(true),
        ];
        for bad in cases {
            let err = validate_priority(&bad).unwrap_err();
            assert_eq!(err.field, Field::Priority, "{bad}");
        }
    }

    #[test]
    fn done_is_strictly_boolean() {
        assert!(validate_done(&json!(true)).unwrap());
        assert!(!validate_done(&json!(false)).unwrap());
        for bad in [json!(0), json!(1), json!("true"), json!(null)] {
            assert_eq!(validate_done(&bad).unwrap_err().field, Field::Done, "{bad}");
        }
    }
}
