//! Payload mapping between the public API vocabulary and storage names.
//!
//! The portfolio frontend grew its own field names (`job_title`, `name`,
//! `project_url`, ...) that differ from the storage schema. Incoming write
//! payloads are normalized here before they reach the typed request structs:
//! keys are renamed, list-valued fields are joined into their stored string
//! form, derived flags are computed, and nulls and empty strings are dropped
//! so they never clobber existing values during a partial update.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A default applied on create when the client omitted the field.
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// Declarative mapping table for one entity.
pub struct FieldMap {
    /// (api name, storage name) pairs. Keys not listed pass through as-is,
    /// so clients may also speak the storage vocabulary directly.
    pub renames: &'static [(&'static str, &'static str)],
    /// (storage name, separator) for fields sent as JSON arrays but stored
    /// as a single joined string.
    pub list_fields: &'static [(&'static str, &'static str)],
    /// (source field, trigger value, flag field): when the source field is
    /// present, the flag becomes `source == trigger`.
    pub derived_flags: &'static [(&'static str, &'static str, &'static str)],
    /// Create-only defaults.
    pub defaults: &'static [(&'static str, DefaultValue)],
}

pub static PERSONAL_INFO_MAP: FieldMap = FieldMap {
    renames: &[],
    list_fields: &[],
    derived_flags: &[],
    defaults: &[],
};

pub static SKILL_MAP: FieldMap = FieldMap {
    renames: &[],
    list_fields: &[],
    derived_flags: &[],
    defaults: &[],
};

pub static EXPERIENCE_MAP: FieldMap = FieldMap {
    renames: &[("job_title", "position")],
    list_fields: &[("achievements", "\n")],
    derived_flags: &[],
    defaults: &[],
};

pub static EDUCATION_MAP: FieldMap = FieldMap {
    renames: &[
        ("institution_name", "institution"),
        ("degree_title", "degree"),
    ],
    list_fields: &[],
    derived_flags: &[("education_type", "certification", "is_certification")],
    defaults: &[
        ("education_type", DefaultValue::Str("degree")),
        ("is_certification", DefaultValue::Bool(false)),
    ],
};

pub static PROJECT_MAP: FieldMap = FieldMap {
    renames: &[
        ("name", "title"),
        ("project_url", "live_url"),
        ("is_featured", "featured"),
    ],
    list_fields: &[("technologies", ", ")],
    derived_flags: &[],
    defaults: &[
        ("status", DefaultValue::Str("completed")),
        ("is_deployed", DefaultValue::Bool(false)),
        ("featured", DefaultValue::Bool(false)),
    ],
};

/// Normalizes a write payload. `apply_defaults` is true for create and
/// false for partial update, where an omitted field means "leave alone".
pub fn map_payload(payload: Value, map: &FieldMap, apply_defaults: bool) -> Result<Value> {
    let Value::Object(input) = payload else {
        return Err(Error::Validation("request body must be a JSON object".into()));
    };

    let mut out = Map::with_capacity(input.len());

    for (key, value) in input {
        let key = map
            .renames
            .iter()
            .find(|(api, _)| *api == key)
            .map_or(key, |(_, storage)| (*storage).to_string());

        // Nulls and empty strings never overwrite stored values.
        match &value {
            Value::Null => continue,
            Value::String(s) if s.is_empty() => continue,
            _ => {}
        }

        let value = match (map.list_fields.iter().find(|(f, _)| *f == key), &value) {
            (Some((_, sep)), Value::Array(items)) => Value::String(join_list(items, sep)?),
            _ => value,
        };

        out.insert(key, value);
    }

    for (source, trigger, flag) in map.derived_flags {
        if let Some(Value::String(s)) = out.get(*source) {
            let is_set = s == trigger;
            out.insert((*flag).to_string(), Value::Bool(is_set));
        }
    }

    if apply_defaults {
        for (field, default) in map.defaults {
            if !out.contains_key(*field) {
                out.insert((*field).to_string(), default.to_value());
            }
        }
    }

    Ok(Value::Object(out))
}

fn join_list(items: &[Value], sep: &str) -> Result<String> {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => parts.push(s.as_str()),
            _ => {
                return Err(Error::Validation(
                    "list fields must contain only strings".into(),
                ));
            }
        }
    }
    Ok(parts.join(sep))
}

/// Splits a stored joined string back into its list form for responses.
/// Empty or whitespace-only input yields an empty list.
#[must_use]
pub fn split_list(stored: &str, sep: &str) -> Vec<String> {
    stored
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renames_api_names_to_storage_names() {
        let mapped = map_payload(
            json!({"job_title": "Engineer", "company": "Acme"}),
            &EXPERIENCE_MAP,
            true,
        )
        .unwrap();
        assert_eq!(mapped["position"], "Engineer");
        assert_eq!(mapped["company"], "Acme");
        assert!(mapped.get("job_title").is_none());
    }

    #[test]
    fn storage_names_pass_through() {
        let mapped = map_payload(json!({"position": "Engineer"}), &EXPERIENCE_MAP, true).unwrap();
        assert_eq!(mapped["position"], "Engineer");
    }

    #[test]
    fn drops_null_and_empty_string() {
        let mapped = map_payload(
            json!({"company": "Acme", "location": null, "description": ""}),
            &EXPERIENCE_MAP,
            false,
        )
        .unwrap();
        assert_eq!(mapped["company"], "Acme");
        assert!(mapped.get("location").is_none());
        assert!(mapped.get("description").is_none());
    }

    #[test]
    fn joins_and_splits_technologies() {
        let mapped = map_payload(
            json!({"technologies": ["Go", "Rust", "TypeScript"]}),
            &PROJECT_MAP,
            false,
        )
        .unwrap();
        let stored = mapped["technologies"].as_str().unwrap();
        assert_eq!(stored, "Go, Rust, TypeScript");
        assert_eq!(split_list(stored, ","), vec!["Go", "Rust", "TypeScript"]);
    }

    #[test]
    fn joins_achievements_with_newlines() {
        let mapped = map_payload(
            json!({"achievements": ["Shipped v1", "Cut latency 40%"]}),
            &EXPERIENCE_MAP,
            false,
        )
        .unwrap();
        let stored = mapped["achievements"].as_str().unwrap();
        assert_eq!(stored, "Shipped v1\nCut latency 40%");
        assert_eq!(split_list(stored, "\n"), vec!["Shipped v1", "Cut latency 40%"]);
    }

    #[test]
    fn list_field_accepts_prejoined_string() {
        let mapped = map_payload(
            json!({"technologies": "Go, Rust"}),
            &PROJECT_MAP,
            false,
        )
        .unwrap();
        assert_eq!(mapped["technologies"], "Go, Rust");
    }

    #[test]
    fn rejects_mixed_type_lists() {
        let err = map_payload(json!({"technologies": ["Go", 7]}), &PROJECT_MAP, false);
        assert!(err.is_err());
    }

    #[test]
    fn certification_type_sets_flag() {
        let mapped = map_payload(
            json!({"education_type": "certification"}),
            &EDUCATION_MAP,
            false,
        )
        .unwrap();
        assert_eq!(mapped["is_certification"], true);

        let mapped = map_payload(json!({"education_type": "degree"}), &EDUCATION_MAP, false).unwrap();
        assert_eq!(mapped["is_certification"], false);

        // Flag untouched when the type field is absent.
        let mapped = map_payload(json!({"institution": "MIT"}), &EDUCATION_MAP, false).unwrap();
        assert!(mapped.get("is_certification").is_none());
    }

    #[test]
    fn defaults_apply_on_create_only() {
        let created = map_payload(json!({"title": "P"}), &PROJECT_MAP, true).unwrap();
        assert_eq!(created["status"], "completed");
        assert_eq!(created["is_deployed"], false);
        assert_eq!(created["featured"], false);

        let patched = map_payload(json!({"title": "P"}), &PROJECT_MAP, false).unwrap();
        assert!(patched.get("status").is_none());
        assert!(patched.get("featured").is_none());
    }

    #[test]
    fn explicit_values_beat_defaults() {
        let mapped = map_payload(
            json!({"title": "P", "status": "in_progress", "is_featured": true}),
            &PROJECT_MAP,
            true,
        )
        .unwrap();
        assert_eq!(mapped["status"], "in_progress");
        assert_eq!(mapped["featured"], true);
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(map_payload(json!([1, 2]), &PROJECT_MAP, true).is_err());
        assert!(map_payload(json!("x"), &PROJECT_MAP, true).is_err());
    }

    #[test]
    fn split_list_ignores_blank_segments() {
        assert_eq!(split_list("", ","), Vec::<String>::new());
        assert_eq!(split_list("Go,,Rust, ", ","), vec!["Go", "Rust"]);
    }
}
