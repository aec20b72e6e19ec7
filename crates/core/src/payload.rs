//! Kind-specific payload and location validation.
//!
//! Payloads are JSON objects. Shared optional fields:
//! - `description`: string
//! - `photos`: list of strings (stored file references)
//!
//! Per kind:
//! - `damage_report`: `description` is required and non-blank
//! - `inspection`: optional `findings` string
//! - `cost_assessment`: required non-empty `items` list of
//!   `{ "label": string, "amount": number >= 0 }`; the computed `total` is
//!   stamped onto the payload
//! - `maintenance`: nothing beyond the shared fields

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::work_item::{Location, WorkItemKind};

/// Maximum length for free-text payload fields (characters).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum number of photo references per work item.
pub const MAX_PHOTOS: usize = 20;

/// Maximum length of the location address.
pub const MAX_ADDRESS_LENGTH: usize = 500;

/// Validate a payload for `kind` and return the normalized form.
pub fn validate_payload(kind: WorkItemKind, payload: &Value) -> Result<Value, CoreError> {
    let Value::Object(fields) = payload else {
        return Err(CoreError::Validation("Payload must be a JSON object".into()));
    };
    let mut fields = fields.clone();

    optional_text(&fields, "description")?;
    validate_photos(&fields)?;

    match kind {
        WorkItemKind::DamageReport => {
            let description = optional_text(&fields, "description")?;
            if description.map_or(true, |d| d.trim().is_empty()) {
                return Err(CoreError::Validation(
                    "A damage report requires a description".into(),
                ));
            }
        }
        WorkItemKind::Inspection => {
            optional_text(&fields, "findings")?;
        }
        WorkItemKind::CostAssessment => {
            let total = cost_total(&fields)?;
            fields.insert("total".into(), Value::from(total));
        }
        WorkItemKind::Maintenance => {}
    }

    Ok(Value::Object(fields))
}

/// Validate an address and an optional coordinate pair.
pub fn validate_location(location: &Location) -> Result<(), CoreError> {
    let address = location.address.trim();
    if address.is_empty() {
        return Err(CoreError::Validation("Location address is required".into()));
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(CoreError::Validation(format!(
            "Location address exceeds {MAX_ADDRESS_LENGTH} characters"
        )));
    }

    match (location.latitude, location.longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoreError::Validation(format!("Latitude {lat} is out of range")));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CoreError::Validation(format!("Longitude {lon} is out of range")));
            }
            Ok(())
        }
        _ => Err(CoreError::Validation(
            "Latitude and longitude must be given together".into(),
        )),
    }
}

fn optional_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, CoreError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            if text.chars().count() > MAX_TEXT_LENGTH {
                return Err(CoreError::Validation(format!(
                    "'{key}' exceeds maximum length of {MAX_TEXT_LENGTH} characters"
                )));
            }
            Ok(Some(text))
        }
        Some(_) => Err(CoreError::Validation(format!("'{key}' must be a string"))),
    }
}

fn validate_photos(fields: &Map<String, Value>) -> Result<(), CoreError> {
    let photos = match fields.get("photos") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(photos)) => photos,
        Some(_) => return Err(CoreError::Validation("'photos' must be a list".into())),
    };
    if photos.len() > MAX_PHOTOS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_PHOTOS} photos may be attached"
        )));
    }
    if photos.iter().any(|p| !p.is_string()) {
        return Err(CoreError::Validation(
            "'photos' entries must be file references".into(),
        ));
    }
    Ok(())
}

fn cost_total(fields: &Map<String, Value>) -> Result<f64, CoreError> {
    let items = match fields.get("items") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => {
            return Err(CoreError::Validation(
                "A cost assessment requires a non-empty 'items' list".into(),
            ))
        }
    };

    let mut total = 0.0;
    for (i, item) in items.iter().enumerate() {
        let label = item.get("label").and_then(Value::as_str).unwrap_or_default();
        if label.trim().is_empty() {
            return Err(CoreError::Validation(format!("Cost item {i} needs a label")));
        }
        let amount = item.get("amount").and_then(Value::as_f64).ok_or_else(|| {
            CoreError::Validation(format!("Cost item '{label}' needs a numeric amount"))
        })?;
        if amount < 0.0 || !amount.is_finite() {
            return Err(CoreError::Validation(format!(
                "Cost item '{label}' has an invalid amount"
            )));
        }
        total += amount;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn damage_report_needs_description() {
        assert!(validate_payload(WorkItemKind::DamageReport, &json!({"description": "sinkhole"})).is_ok());
        assert!(validate_payload(WorkItemKind::DamageReport, &json!({})).is_err());
        assert!(validate_payload(WorkItemKind::DamageReport, &json!({"description": "   "})).is_err());
    }

    #[test]
    fn payload_must_be_an_object() {
        assert!(validate_payload(WorkItemKind::Maintenance, &json!("text")).is_err());
        assert!(validate_payload(WorkItemKind::Maintenance, &json!([])).is_err());
    }

    #[test]
    fn photos_must_be_string_list() {
        let ok = json!({"description": "crack", "photos": ["a.jpg", "b.jpg"]});
        assert!(validate_payload(WorkItemKind::DamageReport, &ok).is_ok());
        let bad = json!({"description": "crack", "photos": [1, 2]});
        assert!(validate_payload(WorkItemKind::DamageReport, &bad).is_err());
        let too_many = json!({"photos": vec!["p.jpg"; MAX_PHOTOS + 1]});
        assert!(validate_payload(WorkItemKind::Maintenance, &too_many).is_err());
    }

    #[test]
    fn inspection_findings_must_be_text() {
        assert!(validate_payload(WorkItemKind::Inspection, &json!({"findings": "spalling"})).is_ok());
        assert!(validate_payload(WorkItemKind::Inspection, &json!({"findings": 3})).is_err());
    }

    #[test]
    fn cost_assessment_total_is_stamped() {
        let payload = json!({
            "items": [
                {"label": "asphalt", "amount": 1200.5},
                {"label": "labor", "amount": 800}
            ],
            "total": 1.0
        });
        let normalized = validate_payload(WorkItemKind::CostAssessment, &payload).unwrap();
        assert_eq!(normalized["total"], json!(2000.5));
    }

    #[test]
    fn cost_assessment_rejects_bad_items() {
        for payload in [
            json!({}),
            json!({"items": []}),
            json!({"items": [{"label": "", "amount": 1}]}),
            json!({"items": [{"label": "gravel"}]}),
            json!({"items": [{"label": "gravel", "amount": -4}]}),
        ] {
            assert!(validate_payload(WorkItemKind::CostAssessment, &payload).is_err(), "{payload}");
        }
    }

    #[test]
    fn location_rules() {
        let mut location = Location {
            address: "Quezon Blvd".into(),
            latitude: Some(14.6),
            longitude: Some(120.98),
        };
        assert!(validate_location(&location).is_ok());

        location.longitude = None;
        assert!(validate_location(&location).is_err());

        location.latitude = Some(91.0);
        location.longitude = Some(0.0);
        assert!(validate_location(&location).is_err());

        location.address = "  ".into();
        location.latitude = None;
        location.longitude = None;
        assert!(validate_location(&location).is_err());
    }
}
