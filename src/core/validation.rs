// src/core/validation.rs
use crate::error::ValidationInputError;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completeness summary for one extracted form. Created fresh per call and
/// immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_fields: usize,
    pub missing_fields: Vec<String>,
    pub missing_count: usize,
    pub completeness_score: f64,
}

/// Check form completeness against `required_fields`, or against every leaf
/// path of `form_data` when no explicit list is given.
///
/// A resolved value equal to `""` counts as missing; paths absent from
/// `form_data` resolve to missing as well. Keys of `form_data` not named by
/// an explicit `required_fields` list are ignored.
pub fn validate_completeness(
    form_data: &Value,
    required_fields: Option<&[String]>,
) -> Result<ValidationReport, ValidationInputError> {
    info!("Starting form validation");

    let map = match form_data.as_object() {
        Some(map) => map,
        None => {
            error!("Form data is not a JSON object");
            return Err(ValidationInputError::NotAMapping);
        }
    };

    let derived;
    let required: &[String] = match required_fields {
        Some(fields) => fields,
        None => {
            derived = flatten_keys(map, "");
            &derived
        }
    };

    // Guard the degenerate ratio explicitly instead of dividing by zero.
    if required.is_empty() {
        error!("Required field list is empty; completeness ratio is undefined");
        return Err(ValidationInputError::EmptyRequiredFields);
    }

    let mut missing = Vec::new();
    for key_path in required {
        if resolve_path(form_data, key_path).is_empty() {
            missing.push(key_path.clone());
        }
    }

    let total_fields = required.len();
    let missing_count = missing.len();
    let completeness_score = round2(1.0 - missing_count as f64 / total_fields as f64);
    info!("Validation complete. Score: {}", completeness_score);

    Ok(ValidationReport {
        total_fields,
        missing_fields: missing,
        missing_count,
        completeness_score,
    })
}

/// Flatten nested keys to dot-joined leaf paths, depth-first in insertion
/// order. `{"a": {"b": ""}}` yields `["a.b"]`.
pub fn flatten_keys(map: &Map<String, Value>, parent: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for (key, value) in map {
        let full_key = if parent.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", parent, key)
        };
        match value {
            Value::Object(child) => keys.extend(flatten_keys(child, &full_key)),
            _ => keys.push(full_key),
        }
    }
    keys
}

/// Resolve a dot-joined path against nested form data. Any absent key or
/// non-string final value collapses to `""`.
pub fn resolve_path<'a>(data: &'a Value, key_path: &str) -> &'a str {
    let mut current = Some(data);
    for key in key_path.split('.') {
        current = current.and_then(|value| value.get(key));
    }
    current.and_then(Value::as_str).unwrap_or("")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_then_resolve_round_trips_every_leaf() {
        let data = json!({
            "a": "1",
            "b": {"c": "2", "d": {"e": ""}},
            "f": "3"
        });
        let paths = flatten_keys(data.as_object().unwrap(), "");
        assert_eq!(paths, vec!["a", "b.c", "b.d.e", "f"]);

        let leaves: Vec<&str> = paths.iter().map(|p| resolve_path(&data, p)).collect();
        assert_eq!(leaves, vec!["1", "2", "", "3"]);
    }

    #[test]
    fn all_missing_form_scores_zero() {
        let data = json!({"a": "", "b": {"c": ""}});
        let report = validate_completeness(&data, None).unwrap();
        assert_eq!(report.total_fields, 2);
        assert_eq!(report.missing_fields, vec!["a", "b.c"]);
        assert_eq!(report.missing_count, 2);
        assert_eq!(report.completeness_score, 0.0);
    }

    #[test]
    fn all_present_form_scores_one() {
        let data = json!({"a": "x", "b": {"c": "y"}});
        let report = validate_completeness(&data, None).unwrap();
        assert_eq!(report.completeness_score, 1.0);
        assert!(report.missing_fields.is_empty());
    }

    #[test]
    fn score_stays_in_unit_range_and_counts_add_up() {
        let data = json!({"a": "", "b": "x", "c": "", "d": {"e": "y", "f": ""}});
        let report = validate_completeness(&data, None).unwrap();
        assert!(report.completeness_score >= 0.0 && report.completeness_score <= 1.0);
        assert_eq!(
            report.missing_count + (report.total_fields - report.missing_count),
            report.total_fields
        );
        assert_eq!(report.completeness_score, 0.4);
    }

    #[test]
    fn explicit_required_list_ignores_extra_keys() {
        let data = json!({"a": "x", "ignored": ""});
        let required = vec!["a".to_string()];
        let report = validate_completeness(&data, Some(&required)).unwrap();
        assert_eq!(report.total_fields, 1);
        assert!(report.missing_fields.is_empty());
    }

    #[test]
    fn unknown_required_path_counts_missing_not_error() {
        let data = json!({"a": "x"});
        let required = vec!["a".to_string(), "nested.not.there".to_string()];
        let report = validate_completeness(&data, Some(&required)).unwrap();
        assert_eq!(report.missing_fields, vec!["nested.not.there"]);
        assert_eq!(report.completeness_score, 0.5);
    }

    #[test]
    fn internal_node_at_a_leaf_path_counts_missing() {
        // Path expects a leaf but resolves to an object; the value coerces
        // to "" rather than raising.
        let data = json!({"a": {"b": "x"}});
        let required = vec!["a".to_string()];
        let report = validate_completeness(&data, Some(&required)).unwrap();
        assert_eq!(report.missing_fields, vec!["a"]);
    }

    #[test]
    fn missing_order_matches_required_order() {
        let data = json!({"z": "", "a": ""});
        let required = vec!["z".to_string(), "a".to_string()];
        let report = validate_completeness(&data, Some(&required)).unwrap();
        assert_eq!(report.missing_fields, vec!["z", "a"]);
    }

    #[test]
    fn non_object_form_data_is_rejected() {
        let err = validate_completeness(&json!("not a map"), None).unwrap_err();
        assert!(matches!(err, ValidationInputError::NotAMapping));
    }

    #[test]
    fn empty_required_list_is_rejected() {
        let err = validate_completeness(&json!({}), None).unwrap_err();
        assert!(matches!(err, ValidationInputError::EmptyRequiredFields));

        let explicit: Vec<String> = Vec::new();
        let err = validate_completeness(&json!({"a": "x"}), Some(&explicit)).unwrap_err();
        assert!(matches!(err, ValidationInputError::EmptyRequiredFields));
    }

    #[test]
    fn score_rounds_to_two_decimals() {
        // 1 of 3 missing: 1 - 1/3 = 0.666... -> 0.67
        let data = json!({"a": "", "b": "x", "c": "y"});
        let report = validate_completeness(&data, None).unwrap();
        assert_eq!(report.completeness_score, 0.67);
    }

    #[test]
    fn language_schema_paths_round_trip_through_the_template() {
        use crate::core::template;
        use crate::Language;

        for language in [Language::English, Language::Hebrew] {
            let template = template::empty_template(language);
            let derived = flatten_keys(template.as_object().unwrap(), "");
            assert_eq!(derived, template::required_paths(language));

            // An untouched template is fully missing by definition.
            let report = validate_completeness(&template, None).unwrap();
            assert_eq!(report.completeness_score, 0.0);
            assert_eq!(report.missing_count, report.total_fields);
        }
    }
}
