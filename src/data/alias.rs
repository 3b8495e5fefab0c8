//! Translation between the frontend's field names and the canonical ones.
//!
//! The frontend writes `knownSkills`, `college`, `isBeginner` and friends while
//! responses (and everything behind this module) use the storage names. The
//! mapping lives in one table and is read in both directions: inbound bodies are
//! renamed frontend → canonical, validation errors are reported canonical →
//! frontend so the client sees the key it actually sent.

use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::data::error::Error;
use crate::data::payload::UserPayload;

/// `(frontend, canonical)` pairs.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("knownSkills", "known_skills"),
    ("desiredSkills", "desired_skills"),
    ("linkedin", "linkedin_url"),
    ("github", "github_url"),
    ("college", "college_name"),
    ("isBeginner", "is_beginner"),
    ("hackathonExperiences", "hackathon_experiences"),
];

/// Response-only keys a client may echo back; they never write anything.
const READ_ONLY_FIELDS: &[&str] = &["id", "my_skills", "created_at", "updated_at"];

pub fn canonical_name(frontend: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == frontend)
        .map_or(frontend, |(_, c)| *c)
}

pub fn frontend_name(canonical: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(_, c)| *c == canonical)
        .map_or(canonical, |(f, _)| *f)
}

fn is_read_only(key: &str) -> bool {
    READ_ONLY_FIELDS.contains(&key) || FIELD_ALIASES.iter().any(|(_, c)| *c == key)
}

/// Turn a raw JSON body into a validated [`UserPayload`].
pub fn canonicalize(body: Value) -> Result<UserPayload, Error> {
    let Value::Object(fields) = body else {
        return Err(Error::InvalidPayload("expected a JSON object".to_string()));
    };

    let renamed: Map<String, Value> = fields
        .into_iter()
        .filter(|(key, _)| !is_read_only(key))
        .map(|(key, value)| (canonical_name(&key).to_string(), value))
        .collect();

    let payload: UserPayload = serde_json::from_value(Value::Object(renamed)).map_err(|e| {
        tracing::debug!("rejected user payload: {}", e);
        Error::InvalidPayload(e.to_string())
    })?;

    payload.validate().map_err(invalid_fields)?;

    Ok(payload)
}

pub fn invalid_fields(errors: ValidationErrors) -> Error {
    let mut fields: Vec<String> = errors
        .errors()
        .keys()
        .map(|field| frontend_name(field).to_string())
        .collect();
    fields.sort();
    tracing::debug!("validation failed for {:?}", fields);

    Error::InvalidFields(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::payload::Field;
    use serde_json::json;

    #[test]
    fn table_is_read_both_ways() {
        for (frontend, canonical) in FIELD_ALIASES {
            assert_eq!(canonical_name(frontend), *canonical);
            assert_eq!(frontend_name(canonical), *frontend);
        }
        assert_eq!(canonical_name("name"), "name");
        assert_eq!(frontend_name("email"), "email");
    }

    #[test]
    fn frontend_keys_land_in_canonical_fields() {
        let payload = canonicalize(json!({
            "knownSkills": ["Go"],
            "desiredSkills": [],
            "college": "  MIT ",
            "isBeginner": true,
            "linkedin": "https://linkedin.com/in/someone",
            "hackathonExperiences": [{ "organizer_name": "MLH", "hackathon_name": "HackMIT" }],
        }))
        .unwrap();

        assert_eq!(payload.known_skills, Some(vec!["Go".to_string()]));
        assert_eq!(payload.desired_skills, Some(vec![]));
        assert_eq!(payload.college_name, Field::Value("  MIT ".to_string()));
        assert_eq!(payload.is_beginner, Some(true));
        assert_eq!(
            payload.linkedin_url,
            Field::Value("https://linkedin.com/in/someone".to_string())
        );
        assert_eq!(payload.hackathon_experiences.map(|e| e.len()), Some(1));
    }

    #[test]
    fn echoed_response_fields_are_ignored() {
        let payload = canonicalize(json!({
            "id": 7,
            "known_skills": [{ "id": 1, "name": "Go" }],
            "my_skills": [{ "id": 1, "name": "Go" }],
            "college_name": "ignored",
            "created_at": "2024-01-01T00:00:00Z",
            "name": "Ada",
        }))
        .unwrap();

        assert_eq!(payload.known_skills, None);
        assert_eq!(payload.college_name, Field::Unset);
        assert_eq!(payload.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn validation_errors_use_frontend_names() {
        let err = canonicalize(json!({
            "github": "nope",
            "password": "123",
        }))
        .unwrap_err();

        assert_eq!(
            err,
            Error::InvalidFields(vec!["github".to_string(), "password".to_string()])
        );
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            canonicalize(json!(["knownSkills"])),
            Err(Error::InvalidPayload(_))
        ));
    }
}
