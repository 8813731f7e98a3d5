//! Canonical type inference from free-text type strings.
//!
//! Two independent inferences live here:
//!
//! - [`infer_type`] reads lineage type strings (`VARCHAR2(50)`, `NUMBER(10,2)`,
//!   `DATE`, ...) and maps them to a [`CanonicalType`] plus an optional length.
//! - [`catalog_data_type`] reads the catalog's declared `FIELD_TYPE` and
//!   `FIELD_LENGTH` for columns the replication engine has to add.
//!
//! # Algorithm
//!
//! [`infer_type`] checks the trimmed input in this order, first match wins:
//!
//! 1. contains `VARCHAR2` → `string`, landing length from the parentheses
//! 2. equals `TIMESTAMP` → `timestamp`
//! 3. equals `DATE` → `string`, never a length
//! 4. contains `NUMBER` → `int`, landing length from the parentheses
//! 5. contains `FLOAT` → `float`, landing length from the parentheses
//! 6. otherwise → `unknown`
//!
//! Lengths are returned verbatim: `NUMBER(10,2)` yields `"10,2"`.

use tracing::warn;

use lineage_model::{CanonicalType, ColumnDataType, FieldLength, InferredType, TypeContext};

/// Infer the canonical type of a lineage type string.
///
/// Never fails: unrecognized input yields [`CanonicalType::Unknown`] with no length.
pub fn infer_type(raw: &str, context: TypeContext) -> InferredType {
    let raw = raw.trim();
    let landing = context == TypeContext::Landing;

    if raw.contains("VARCHAR2") {
        return InferredType {
            canonical: CanonicalType::String,
            char_length: if landing { extract_length(raw) } else { None },
            numeric_length: None,
        };
    }
    if raw == "TIMESTAMP" {
        return InferredType::of(CanonicalType::Timestamp);
    }
    if raw == "DATE" {
        return InferredType::of(CanonicalType::String);
    }
    let numeric = if raw.contains("NUMBER") {
        Some(CanonicalType::Int)
    } else if raw.contains("FLOAT") {
        Some(CanonicalType::Float)
    } else {
        None
    };
    match numeric {
        Some(canonical) => InferredType {
            canonical,
            char_length: None,
            numeric_length: if landing { extract_length(raw) } else { None },
        },
        None => InferredType::unknown(),
    }
}

/// Text between the first `(` and the closing `)`, if both are present.
pub fn extract_length(raw: &str) -> Option<String> {
    if !raw.contains(')') {
        return None;
    }
    let (_, rest) = raw.split_once('(')?;
    let inner = rest.split_once(')').map_or(rest, |(inner, _)| inner);
    Some(inner.to_string())
}

/// Physical type of a column added because the source does not provide it.
///
/// `STRING` keeps the declared length, `NUMERIC` splits a `"p,s"` length,
/// anything else is carried as a 14-character timestamp string.
pub fn catalog_data_type(field_type: Option<&str>, length: Option<&FieldLength>) -> ColumnDataType {
    let raw_length = length.map_or("", FieldLength::as_str);
    match field_type {
        Some("STRING") => ColumnDataType::String {
            length: raw_length.trim().parse().unwrap_or_else(|_| {
                warn!(length = %raw_length, "non-numeric string length, using 0");
                0
            }),
        },
        Some("NUMERIC") => {
            let (precision, scale) = parse_precision_scale(raw_length);
            ColumnDataType::Numeric { precision, scale }
        }
        _ => ColumnDataType::TIMESTAMP_STRING,
    }
}

/// Split a `"p,s"` length into precision and scale.
///
/// Both sides default to 0 when the text has no comma or either side is not
/// an integer. Signs are kept as written.
pub fn parse_precision_scale(raw: &str) -> (i64, i64) {
    let Some((precision, scale)) = raw.split_once(',') else {
        if !raw.trim().is_empty() {
            warn!(length = %raw, "numeric length without scale, using 0,0");
        }
        return (0, 0);
    };
    (length_part(precision), length_part(scale))
}

fn length_part(value: &str) -> i64 {
    value.trim().parse().unwrap_or_else(|_| {
        warn!(value = %value, "non-integer precision or scale, using 0");
        0
    })
}
