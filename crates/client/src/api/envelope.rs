//! Response normalisation.
//!
//! The backend answers in several shapes: `{success, data|error|message}`,
//! `{status: "success"|"error", ...}`, `{error}` with a 4xx status, and bare
//! payloads such as `{cart_items: [...]}`. [`normalize`] folds all of them
//! into `Result<Value, ApiError>` so endpoint code only ever decodes the
//! success payload.
//!
//! Two quirks of the backend's database views are smoothed here:
//! all-caps column names (`CATEGORY_ID`) are lower-cased, and integral
//! floats (`12.0` from `float()` conversions) are narrowed to integers so
//! they decode into integer fields.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Fallback when a failed envelope carries no message.
const DEFAULT_REJECTION: &str = "Request failed";

/// Turn a raw status and body into the success payload or an error.
pub(crate) fn normalize(status: u16, body: &str) -> Result<Value, ApiError> {
    let parsed = if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(body).map(canonicalize)
    };

    if !(200..300).contains(&status) {
        let message = parsed.as_ref().ok().and_then(server_message);
        return Err(match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            _ => ApiError::Server { status, message },
        });
    }

    let value = parsed?;
    if reports_failure(&value) {
        return Err(ApiError::Rejected(
            server_message(&value).unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ));
    }
    Ok(value)
}

/// First human-readable message in the body, preferring `error`.
fn server_message(value: &Value) -> Option<String> {
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn reports_failure(value: &Value) -> bool {
    let success_false = value.get("success").and_then(Value::as_bool) == Some(false);
    let status_error = value
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case("error"));
    success_false || status_error
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (canonical_key(key), canonicalize(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Number(n) => Value::Number(narrow(n)),
        other => other,
    }
}

fn canonical_key(key: String) -> String {
    if key.chars().any(|c| c.is_ascii_uppercase()) && !key.chars().any(|c| c.is_ascii_lowercase())
    {
        key.to_ascii_lowercase()
    } else {
        key
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn narrow(n: serde_json::Number) -> serde_json::Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            serde_json::Number::from(f as i64)
        }
        _ => n,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_payload_passes_through() {
        let value = normalize(200, r#"{"cart_items":[{"cart_id":1}]}"#).unwrap();
        assert_eq!(value, json!({"cart_items": [{"cart_id": 1}]}));
    }

    #[test]
    fn test_success_false_is_rejected() {
        let err = normalize(200, r#"{"success":false,"error":"Plant not found"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == "Plant not found"));

        let err = normalize(200, r#"{"success":false}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == DEFAULT_REJECTION));
    }

    #[test]
    fn test_status_error_envelope() {
        let err = normalize(200, r#"{"status":"error","message":"nope"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(m) if m == "nope"));
        assert!(normalize(200, r#"{"status":"success","data":[]}"#).is_ok());
    }

    #[test]
    fn test_status_codes() {
        assert!(matches!(
            normalize(400, r#"{"error":"POST required"}"#),
            Err(ApiError::BadRequest(Some(m))) if m == "POST required"
        ));
        assert!(matches!(
            normalize(401, r#"{"success":false,"message":"Invalid password"}"#),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(normalize(403, ""), Err(ApiError::Forbidden)));
        assert!(matches!(normalize(404, "<html>"), Err(ApiError::NotFound)));
        assert!(matches!(
            normalize(503, "Service Unavailable"),
            Err(ApiError::Server { status: 503, message: None })
        ));
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        assert!(matches!(normalize(200, "<html>"), Err(ApiError::Decode(_))));
        assert_eq!(normalize(204, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_uppercase_columns_are_canonicalised() {
        let value = normalize(
            200,
            r#"{"success":true,"categories":[{"CATEGORY_ID":3,"NAME":"Succulents","stock_quantity":12.0,"base_price":19.5}]}"#,
        )
        .unwrap();
        let row = &value["categories"][0];
        assert_eq!(row["category_id"], json!(3));
        assert_eq!(row["name"], json!("Succulents"));
        assert_eq!(row["stock_quantity"], json!(12));
        assert!(row["stock_quantity"].is_i64());
        assert_eq!(row["base_price"], json!(19.5));
    }

    #[test]
    fn test_mixed_case_keys_are_kept() {
        let value = normalize(200, r#"{"totalCustomers":4}"#).unwrap();
        assert_eq!(value["totalCustomers"], json!(4));
    }
}
