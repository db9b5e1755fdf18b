use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::modules::openai::MessageRole;
use crate::shared::types::{FieldViolation, ViolationLocation};

/// A JSON request body checked field by field before any upstream call.
///
/// `FIELDS` lists every string field in declaration order; violations are
/// reported in that order.
pub trait RequestSchema: DeserializeOwned + Validate {
    const FIELDS: &'static [&'static str];
}

/// Custom validator for message roles
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if MessageRole::parse(role).is_some() {
        Ok(())
    } else {
        let mut error = ValidationError::new("role");
        error.message = Some(
            format!("role must be one of: {}", MessageRole::ALLOWED.join(", ")).into(),
        );
        Err(error)
    }
}

/// Validate a parsed JSON object against a schema.
///
/// Fields with a non-string JSON type are reported as type violations and
/// left out of deserialization, so a wrong type never becomes a parse error.
pub fn check_body<T: RequestSchema>(mut object: Map<String, Value>) -> Result<T, Vec<FieldViolation>> {
    let mut type_violations: Vec<&'static str> = Vec::new();
    for &field in T::FIELDS {
        if let Some(value) = object.get(field) {
            if !(value.is_string() || value.is_null()) {
                type_violations.push(field);
                object.remove(field);
            }
        }
    }

    let payload: Result<T, _> = serde_json::from_value(Value::Object(object));
    let validation_errors = match &payload {
        Ok(dto) => dto.validate().err(),
        Err(_) => None,
    };

    let mut violations = Vec::new();
    for &field in T::FIELDS {
        if type_violations.contains(&field) {
            violations.push(FieldViolation::body(field, format!("{} must be a string", field)));
            continue;
        }
        if let Some(errors) = &validation_errors {
            violations.extend(field_violations(errors, field, ViolationLocation::Body));
        }
    }

    match payload {
        Ok(dto) if violations.is_empty() => Ok(dto),
        Ok(_) => Err(violations),
        Err(e) => {
            violations.push(FieldViolation::body("body", format!("Invalid request body: {}", e)));
            Err(violations)
        }
    }
}

/// Convert validator errors for one field into violations
pub fn field_violations(
    errors: &ValidationErrors,
    field: &str,
    location: ViolationLocation,
) -> Vec<FieldViolation> {
    errors
        .field_errors()
        .get(field)
        .map(|list| {
            list.iter()
                .map(|error| FieldViolation {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                    location,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// All violations of a validated value, sorted by field name for stable output
pub fn all_violations(errors: &ValidationErrors, location: ViolationLocation) -> Vec<FieldViolation> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();
    fields
        .iter()
        .flat_map(|field| field_violations(errors, field, location))
        .collect()
}
