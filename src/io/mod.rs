//! JSON import/export for the prompt library.
//!
//! Pure string↔data transforms over the library's export schema — the
//! host owns files, clipboards, and timestamped filenames.
//! The schema is a JSON array of prompt objects with `id`, `title`,
//! `content`, `category`, `tags`, `variables`, `is_favorite`,
//! `created_at`, `updated_at`, and `use_count` fields; absent or `null`
//! optional fields are tolerated on import.

use crate::models::prompt::is_valid_tag;
use crate::models::{Prompt, Variable};
use crate::{Error, Result};

/// A sample single-prompt export document.
const SAMPLE_EXPORT: &str = r#"[
  {
    "id": "5a6e3b2c-9c1f-4f55-8a74-d7c2f3a90b14",
    "title": "Code Review Request",
    "content": "Please review this {{language}} code:\n\n{{code}}\n\nFocus on {{focus_area}}.",
    "category": "Development",
    "tags": ["code-review", "programming"],
    "variables": [
      {
        "name": "language",
        "type": "select",
        "default_value": "Python",
        "options": ["Python", "JavaScript", "Go", "Rust"]
      },
      {
        "name": "code",
        "type": "textarea",
        "default_value": ""
      },
      {
        "name": "focus_area",
        "type": "text",
        "default_value": "performance"
      }
    ],
    "is_favorite": false,
    "created_at": "2024-01-15T09:30:00Z",
    "updated_at": "2024-01-15T09:30:00Z",
    "use_count": 0
  }
]"#;

/// Serializes a prompt snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if serialization fails (practically
/// unreachable for well-formed prompts).
pub fn export_library(prompts: &[Prompt]) -> Result<String> {
    serde_json::to_string_pretty(prompts).map_err(|e| Error::OperationFailed {
        operation: "export_library".to_string(),
        cause: e.to_string(),
    })
}

/// Parses a JSON export back into prompts.
///
/// Tolerates missing optional fields (ids are regenerated, timestamps
/// default to now, counters to zero) but rejects structurally invalid
/// documents, empty titles, and malformed variable names.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for malformed JSON or invalid prompts.
pub fn import_library(json: &str) -> Result<Vec<Prompt>> {
    let prompts: Vec<Prompt> =
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("invalid JSON: {e}")))?;

    for (index, prompt) in prompts.iter().enumerate() {
        if prompt.title.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "prompt #{index} has an empty title"
            )));
        }
        for variable in &prompt.variables {
            if !Variable::is_valid_name(&variable.name) {
                return Err(Error::InvalidInput(format!(
                    "prompt '{}' has invalid variable name '{}'",
                    prompt.title, variable.name
                )));
            }
        }
        for tag in &prompt.tags {
            if !is_valid_tag(tag) {
                return Err(Error::InvalidInput(format!(
                    "prompt '{}' has invalid tag '{tag}'",
                    prompt.title
                )));
            }
        }
    }

    tracing::info!(count = prompts.len(), "imported prompt library");
    Ok(prompts)
}

/// Returns a documented sample export for help pages and docs.
#[must_use]
pub const fn sample_export() -> &'static str {
    SAMPLE_EXPORT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariableType;

    fn prompt(title: &str) -> Prompt {
        Prompt::new(title, "content with a {{variable}} token", "General")
    }

    #[test]
    fn test_export_import_round_trip() {
        let prompts = vec![
            prompt("First").with_tags(vec!["a".to_string()]),
            prompt("Second").with_favorite(true),
        ];

        let json = export_library(&prompts).unwrap();
        let imported = import_library(&json).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].id, prompts[0].id);
        assert_eq!(imported[0].title, "First");
        assert_eq!(imported[0].variables.len(), 1);
        assert!(imported[1].is_favorite);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let err = import_library("{not json").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_import_rejects_empty_title() {
        let json = r#"[{"title": "  ", "content": "long enough content", "category": "General"}]"#;
        assert!(import_library(json).is_err());
    }

    #[test]
    fn test_import_rejects_invalid_variable_name() {
        let json = r#"[{
            "title": "Bad variable",
            "content": "some content here",
            "category": "General",
            "variables": [{"name": "1bad"}]
        }]"#;
        assert!(import_library(json).is_err());
    }

    #[test]
    fn test_import_rejects_blank_tag() {
        let json = r#"[{
            "title": "Tagged",
            "content": "long enough content",
            "category": "General",
            "tags": ["  "]
        }]"#;
        assert!(import_library(json).is_err());
    }

    #[test]
    fn test_import_tolerates_missing_optional_fields() {
        let json = r#"[{"title": "Minimal", "content": "long enough content", "category": "General"}]"#;
        let imported = import_library(json).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].use_count, 0);
        assert!(!imported[0].is_favorite);
        assert!(imported[0].tags.is_empty());
        assert!(!imported[0].id.as_str().is_empty());
    }

    #[test]
    fn test_sample_export_imports_cleanly() {
        let imported = import_library(sample_export()).unwrap();

        assert_eq!(imported.len(), 1);
        let sample = &imported[0];
        assert_eq!(sample.title, "Code Review Request");
        assert_eq!(sample.variables.len(), 3);
        assert_eq!(sample.variables[0].kind, VariableType::Select);
        assert_eq!(sample.variables[0].options.len(), 4);
        assert_eq!(sample.variables[1].kind, VariableType::Textarea);
    }
}
