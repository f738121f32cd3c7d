//! Feature vector parsing and validation.
//!
//! Request bodies are parsed into a [`FeatureVector`] before anything touches
//! the model. Every field is checked and all problems are reported together,
//! so a client sees each bad field in one response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Wire names of the four measurements, in model input order.
pub const FEATURE_NAMES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// One flower specimen: four measurements in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl FeatureVector {
    /// Model input in canonical order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

/// A single rejected location in a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldIssue {
    fn body(kind: &'static str, msg: impl Into<String>) -> Self {
        Self {
            kind,
            loc: vec!["body".to_string()],
            msg: msg.into(),
            input: None,
        }
    }

    fn field(field: &str, kind: &'static str, msg: impl Into<String>, input: Option<Value>) -> Self {
        Self {
            kind,
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            input,
        }
    }

    /// The offending field name, if the issue is about a single field.
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

/// The request body did not describe a valid feature vector.
///
/// Always carries at least one [`FieldIssue`].
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("invalid request: {}", summarize(.detail))]
pub struct ValidationError {
    pub detail: Vec<FieldIssue>,
}

impl ValidationError {
    /// Names of the fields that failed validation.
    pub fn fields(&self) -> Vec<&str> {
        self.detail.iter().filter_map(FieldIssue::field_name).collect()
    }
}

fn summarize(detail: &[FieldIssue]) -> String {
    detail
        .iter()
        .map(|issue| format!("{}: {}", issue.loc.join("."), issue.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a raw JSON request body into a [`FeatureVector`].
///
/// Numbers are taken as-is. Strings holding a decimal number are coerced,
/// anything else is rejected. Unknown keys are ignored.
pub fn parse(body: &[u8]) -> Result<FeatureVector, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ValidationError {
        detail: vec![FieldIssue::body("json_invalid", format!("JSON decode error: {e}"))],
    })?;
    let result = match value {
        Value::Object(ref map) => from_object(map),
        _ => Err(ValidationError {
            detail: vec![FieldIssue::body(
                "model_attributes_type",
                "Input should be a valid dictionary or object",
            )],
        }),
    };
    if let Err(err) = &result {
        debug!(fields = ?err.fields(), "rejected feature vector");
    }
    result
}

/// Validate an already-decoded JSON object.
pub fn from_object(map: &Map<String, Value>) -> Result<FeatureVector, ValidationError> {
    let mut values = [0.0f64; 4];
    let mut detail = Vec::new();

    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
        match coerce(name, map.get(name)) {
            Ok(v) => *slot = v,
            Err(issue) => detail.push(issue),
        }
    }

    if !detail.is_empty() {
        return Err(ValidationError { detail });
    }

    let [sepal_length, sepal_width, petal_length, petal_width] = values;
    Ok(FeatureVector {
        sepal_length,
        sepal_width,
        petal_length,
        petal_width,
    })
}

fn coerce(name: &str, value: Option<&Value>) -> Result<f64, FieldIssue> {
    let v = match value {
        None | Some(Value::Null) => {
            return Err(FieldIssue::field(name, "missing", "Field required", None));
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            FieldIssue::field(
                name,
                "float_type",
                "Input should be a valid number",
                value.cloned(),
            )
        })?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            FieldIssue::field(
                name,
                "float_parsing",
                "Input should be a valid number, unable to parse string as a number",
                value.cloned(),
            )
        })?,
        Some(other) => {
            return Err(FieldIssue::field(
                name,
                "float_type",
                "Input should be a valid number",
                Some(other.clone()),
            ));
        }
    };

    if !v.is_finite() {
        return Err(FieldIssue::field(
            name,
            "finite_number",
            "Input should be a finite number",
            value.cloned(),
        ));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_json(v: Value) -> Result<FeatureVector, ValidationError> {
        parse(v.to_string().as_bytes())
    }

    #[test]
    fn parses_all_numeric_fields() {
        let fv = parse_json(json!({
            "sepal_length": 5.1,
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap();
        assert_eq!(fv.sepal_length, 5.1);
        assert_eq!(fv.petal_width, 0.2);
        assert_eq!(fv.as_array(), [5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn integers_are_accepted() {
        let fv = parse_json(json!({
            "sepal_length": 6,
            "sepal_width": 3,
            "petal_length": 4,
            "petal_width": 1
        }))
        .unwrap();
        assert_eq!(fv.as_array(), [6.0, 3.0, 4.0, 1.0]);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let fv = parse_json(json!({
            "sepal_length": "5.1",
            "sepal_width": " 3.5 ",
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap();
        assert_eq!(fv.sepal_length, 5.1);
        assert_eq!(fv.sepal_width, 3.5);
    }

    #[test]
    fn missing_field_is_reported() {
        let err = parse_json(json!({
            "sepal_length": 5.1,
            "sepal_width": 3.5,
            "petal_length": 1.4
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec!["petal_width"]);
        assert_eq!(err.detail[0].kind, "missing");
        assert_eq!(err.detail[0].loc, vec!["body", "petal_width"]);
    }

    #[test]
    fn null_counts_as_missing() {
        let err = parse_json(json!({
            "sepal_length": null,
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap_err();
        assert_eq!(err.detail[0].kind, "missing");
    }

    #[test]
    fn non_numeric_string_names_the_field() {
        let err = parse_json(json!({
            "sepal_length": "abc",
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec!["sepal_length"]);
        assert_eq!(err.detail[0].kind, "float_parsing");
        assert_eq!(err.detail[0].input, Some(json!("abc")));
    }

    #[test]
    fn wrong_json_types_are_rejected() {
        let err = parse_json(json!({
            "sepal_length": true,
            "sepal_width": [3.5],
            "petal_length": {"v": 1.4},
            "petal_width": 0.2
        }))
        .unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["sepal_length", "sepal_width", "petal_length"]
        );
        assert!(err.detail.iter().all(|i| i.kind == "float_type"));
    }

    #[test]
    fn every_bad_field_is_collected() {
        let err = parse_json(json!({ "sepal_width": "x" })).unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["sepal_length", "sepal_width", "petal_length", "petal_width"]
        );
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        let err = parse_json(json!({
            "sepal_length": "NaN",
            "sepal_width": "inf",
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap_err();
        assert_eq!(err.fields(), vec!["sepal_length", "sepal_width"]);
        assert!(err.detail.iter().all(|i| i.kind == "finite_number"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let fv = parse_json(json!({
            "sepal_length": 5.1,
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2,
            "species_hint": "setosa"
        }));
        assert!(fv.is_ok());
    }

    #[test]
    fn malformed_json_is_a_body_error() {
        let err = parse(b"{not json").unwrap_err();
        assert_eq!(err.detail.len(), 1);
        assert_eq!(err.detail[0].kind, "json_invalid");
        assert_eq!(err.detail[0].loc, vec!["body"]);
        assert!(err.fields().is_empty());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = parse(b"[5.1, 3.5, 1.4, 0.2]").unwrap_err();
        assert_eq!(err.detail[0].kind, "model_attributes_type");
    }

    #[test]
    fn validation_error_serializes_as_detail_list() {
        let err = parse_json(json!({
            "sepal_length": "abc",
            "sepal_width": 3.5,
            "petal_length": 1.4,
            "petal_width": 0.2
        }))
        .unwrap_err();
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["detail"][0]["type"], "float_parsing");
        assert_eq!(body["detail"][0]["loc"], json!(["body", "sepal_length"]));
    }

    #[test]
    fn display_lists_locations() {
        let err = parse(b"{}").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid request: body.sepal_length: Field required"));
    }
}
