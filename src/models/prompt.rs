//! Prompt models and the variable engine.
//!
//! Provides data structures for stored prompts and the parsing primitives
//! behind variable substitution and live preview.
//!
//! # Token Grammar
//!
//! A variable reference is `{{` + identifier + `}}` where the identifier
//! matches `[A-Za-z_][A-Za-z0-9_]*`. The grammar is deliberately strict and
//! unambiguous:
//!
//! | Input | Recognized |
//! |-------|------------|
//! | `{{name}}` | ✓ |
//! | `{{user_name2}}` | ✓ |
//! | `{{ name }}` | ✗ (internal whitespace) |
//! | `{{1abc}}` | ✗ (leading digit) |
//! | `{{}}` | ✗ (empty) |
//!
//! Unrecognized `{{...}}` sequences are never an error: extraction and
//! substitution leave them as literal text, so prompt content can contain
//! brace sequences unrelated to variables. [`validate_content`] reports
//! them as advisory diagnostics for editing UIs, without affecting the
//! permissive parse.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Creates a compile-time verified regex wrapped in [`LazyLock`].
///
/// # Safety
///
/// The regex pattern is verified at compile time and cannot fail at runtime.
/// The `unreachable!()` branch exists only for type checking.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Regex pattern for recognized template variables: `{{variable_name}}`.
///
/// The identifier must start with a letter or underscore; internal
/// whitespace is not permitted.
static VARIABLE_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}");

/// Regex pattern for detecting any content between `{{` and `}}`.
/// Used only for diagnostics; wider than [`VARIABLE_PATTERN`] on purpose.
static VALIDATION_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{([^}]*)\}\}");

/// Minimum prompt title length.
pub const MIN_TITLE_LEN: usize = 3;
/// Maximum prompt title length.
pub const MAX_TITLE_LEN: usize = 200;
/// Minimum prompt content length.
pub const MIN_CONTENT_LEN: usize = 10;
/// Maximum prompt content length.
pub const MAX_CONTENT_LEN: usize = 10_000;
/// Maximum category name length.
pub const MAX_CATEGORY_LEN: usize = 50;
/// Maximum tag length.
pub const MAX_TAG_LEN: usize = 30;

/// Unique identifier for a stored prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromptId(String);

impl PromptId {
    /// Creates a prompt ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random (UUID v4) prompt ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the prompt ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PromptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PromptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PromptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Input type of a template variable.
///
/// Drives form generation in the presentation layer; the engine itself
/// only stores the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Single-line text input.
    #[default]
    Text,
    /// Multi-line text input.
    Textarea,
    /// Choice among a fixed set of options.
    Select,
    /// Numeric input (value still carried as a string).
    Number,
}

impl VariableType {
    /// Returns all variable type variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Text, Self::Textarea, Self::Select, Self::Number]
    }

    /// Returns the variable type as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Number => "number",
        }
    }

    /// Parses a variable type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "string" => Some(Self::Text),
            "textarea" | "multiline" => Some(Self::Textarea),
            "select" | "choice" | "dropdown" => Some(Self::Select),
            "number" | "numeric" => Some(Self::Number),
            _ => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VariableType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown variable type: {s}"))
    }
}

/// Deserializes a JSON `null` as the type's default value.
///
/// Library exports may write `null` for absent `default_value` and
/// `options` fields; accept both `null` and a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A variable definition attached to a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name (without braces), matching `[A-Za-z_][A-Za-z0-9_]*`.
    pub name: String,
    /// Input type, `text` when auto-detected.
    #[serde(rename = "type", default)]
    pub kind: VariableType,
    /// Default value prefilled in forms; empty when none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_value: String,
    /// Ordered options; only meaningful when `kind` is `select`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
}

impl Variable {
    /// Creates a plain text variable with no default.
    ///
    /// This is the shape synthesized for names referenced in content
    /// without a stored definition.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableType::Text,
            default_value: String::new(),
            options: Vec::new(),
        }
    }

    /// Creates a select variable with the given options.
    #[must_use]
    pub fn select(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableType::Select,
            default_value: String::new(),
            options,
        }
    }

    /// Sets the input type.
    #[must_use]
    pub fn with_kind(mut self, kind: VariableType) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    /// Checks whether a name is a valid variable identifier.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

/// A stored prompt.
///
/// Owned by the storage collaborator; the engine reads fields and never
/// mutates them. `variables` may diverge from what `content` actually
/// references — [`reconcile_variables`] resolves the difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Opaque unique identifier.
    #[serde(default = "PromptId::generate")]
    pub id: PromptId,
    /// Non-empty title.
    pub title: String,
    /// Content with zero or more `{{name}}` tokens.
    pub content: String,
    /// Category name; free-form, with a default set in [`crate::config`].
    pub category: String,
    /// Tags; order irrelevant for scoring, stable for display.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Variable definitions; may lag behind `content`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<Variable>,
    /// Favorite flag.
    #[serde(default)]
    pub is_favorite: bool,
    /// Usage frequency counter.
    #[serde(default)]
    pub use_count: u64,
    /// Creation timestamp.
    #[serde(default = "chrono::Utc::now")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp.
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Prompt {
    /// Creates a new prompt, auto-detecting variables from `content`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let variables = reconcile_variables(&content, &[]);
        let now = chrono::Utc::now();

        Self {
            id: PromptId::generate(),
            title: title.into(),
            content,
            category: category.into(),
            tags: Vec::new(),
            variables,
            is_favorite: false,
            use_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets explicit variable definitions, overriding auto-detected ones.
    #[must_use]
    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    /// Marks the prompt as a favorite.
    #[must_use]
    pub const fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Sets the usage counter.
    #[must_use]
    pub const fn with_use_count(mut self, use_count: u64) -> Self {
        self.use_count = use_count;
        self
    }

    /// Returns the variable names referenced by this prompt's content.
    #[must_use]
    pub fn referenced_variables(&self) -> Vec<String> {
        extract_variables(&self.content)
    }
}

/// Extracts variable names from prompt content.
///
/// Scans left-to-right for `{{identifier}}` tokens and returns each
/// distinct name exactly once, in order of first appearance. Name equality
/// is case-sensitive. Malformed tokens (`{{1abc}}`, `{{}}`, `{{ name }}`)
/// are not recognized and remain literal text.
#[must_use]
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for cap in VARIABLE_PATTERN.captures_iter(content) {
        if let Some(name_match) = cap.get(1) {
            let name = name_match.as_str().to_string();
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }

    names
}

/// Reconciles stored variable definitions with the content's references.
///
/// For every name extracted from `content` without a definition in
/// `existing`, a plain text variable with an empty default is synthesized.
/// Existing definitions are preserved (type, default, options), including
/// ones no longer referenced — pruning is the caller's decision.
///
/// Output order: extraction order first, then existing-but-unreferenced
/// definitions in their original relative order.
#[must_use]
pub fn reconcile_variables(content: &str, existing: &[Variable]) -> Vec<Variable> {
    let referenced = extract_variables(content);
    let referenced_set: HashSet<&str> = referenced.iter().map(String::as_str).collect();
    let existing_by_name: HashMap<&str, &Variable> =
        existing.iter().map(|v| (v.name.as_str(), v)).collect();

    let mut result: Vec<Variable> = referenced
        .iter()
        .map(|name| {
            existing_by_name
                .get(name.as_str())
                .map_or_else(|| Variable::text(name), |v| (*v).clone())
        })
        .collect();

    for var in existing {
        if !referenced_set.contains(var.name.as_str()) {
            result.push(var.clone());
        }
    }

    result
}

/// Substitutes variable values into prompt content.
///
/// Every recognized `{{name}}` token with an entry in `values` is replaced;
/// tokens without a value are left literal so missing inputs stay visible
/// in the output. All occurrences of the same name are replaced
/// identically. Substitution is a single pass: substituted values are not
/// re-scanned for further tokens.
#[must_use]
pub fn substitute_variables<S: BuildHasher>(
    content: &str,
    values: &HashMap<String, String, S>,
) -> String {
    VARIABLE_PATTERN
        .replace_all(content, |caps: &regex::Captures| {
            caps.get(1)
                .and_then(|m| values.get(m.as_str()))
                .map_or_else(|| caps[0].to_string(), String::clone)
        })
        .to_string()
}

/// Returns the referenced variables that still need a value.
///
/// A variable is missing when `values` has no entry for it, or the entry
/// is empty after trimming whitespace. Order follows
/// [`extract_variables`]; the result is always a subset of it.
#[must_use]
pub fn missing_variables<S: BuildHasher>(
    content: &str,
    values: &HashMap<String, String, S>,
) -> Vec<String> {
    extract_variables(content)
        .into_iter()
        .filter(|name| values.get(name).is_none_or(|v| v.trim().is_empty()))
        .collect()
}

/// A rendered live preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Content with available values substituted; unfilled tokens literal.
    pub text: String,
    /// Names still needing a value, in extraction order.
    pub missing: Vec<String>,
}

impl Preview {
    /// Returns whether every referenced variable has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Renders a live preview of `content` under the given values.
///
/// Composes [`substitute_variables`] and [`missing_variables`]. Pure and
/// cheap enough to call on every keystroke (single regex pass over
/// content).
#[must_use]
pub fn render_preview<S: BuildHasher>(
    content: &str,
    values: &HashMap<String, String, S>,
) -> Preview {
    Preview {
        text: substitute_variables(content, values),
        missing: missing_variables(content, values),
    }
}

/// Validation result for prompt content.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Whether the content has no error-level issues.
    pub is_valid: bool,
    /// List of issues found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Creates a valid result with no issues.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
        }
    }

    /// Adds an issue; error-level issues mark the result invalid.
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        if issue.severity == IssueSeverity::Error {
            self.is_valid = false;
        }
        self.issues.push(issue);
    }
}

/// A validation issue found in prompt content.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: IssueSeverity,
    /// Description of the issue.
    pub message: String,
    /// Byte position in the content where the issue was found.
    pub position: Option<usize>,
}

impl ValidationIssue {
    /// Creates a new error-level issue.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
            position: None,
        }
    }

    /// Creates a new warning-level issue.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            position: None,
        }
    }

    /// Sets the position of the issue.
    #[must_use]
    pub const fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Issue that an editing UI should surface prominently.
    Error,
    /// Non-critical issue; content still works.
    Warning,
}

/// Validates prompt content for common authoring mistakes.
///
/// Checks for:
/// - Unbalanced `{{`/`}}` counts
/// - Single braces that look like variable typos
/// - Empty or malformed variable names inside `{{...}}`
/// - Duplicate variable references (warning only)
///
/// Diagnostics are advisory: extraction and substitution stay permissive
/// regardless of what this reports.
#[must_use]
pub fn validate_content(content: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let mut seen_names: HashSet<&str> = HashSet::new();

    let open_count = content.matches("{{").count();
    let close_count = content.matches("}}").count();

    if open_count != close_count {
        result.add_issue(ValidationIssue::error(format!(
            "Unbalanced braces: {open_count} opening '{{{{' vs {close_count} closing '}}}}'"
        )));
    }

    // Single-brace scan: { or } not part of a doubled pair
    let mut i = 0;
    let bytes = content.as_bytes();
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                i += 2;
                continue;
            }
            if i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphabetic() {
                result.add_issue(
                    ValidationIssue::warning("Single '{' found - did you mean '{{'?")
                        .at_position(i),
                );
            }
        } else if bytes[i] == b'}' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'}' {
                i += 2;
                continue;
            }
            if i > 0 && bytes[i - 1].is_ascii_alphanumeric() {
                result.add_issue(
                    ValidationIssue::warning("Single '}' found - did you mean '}}'?")
                        .at_position(i),
                );
            }
        }
        i += 1;
    }

    for cap in VALIDATION_PATTERN.captures_iter(content) {
        if let Some(inner) = cap.get(1) {
            let name = inner.as_str();
            if name.is_empty() {
                result.add_issue(
                    ValidationIssue::error("Empty variable name: {{}}").at_position(inner.start()),
                );
            } else if name.trim() != name {
                result.add_issue(
                    ValidationIssue::error(format!(
                        "Variable '{{{{{name}}}}}' has surrounding whitespace; write '{{{{{}}}}}'",
                        name.trim()
                    ))
                    .at_position(inner.start()),
                );
            } else if !Variable::is_valid_name(name) {
                result.add_issue(
                    ValidationIssue::error(format!(
                        "Invalid variable name '{name}': must match [A-Za-z_][A-Za-z0-9_]*"
                    ))
                    .at_position(inner.start()),
                );
            } else if !seen_names.insert(name) {
                // Duplicate references are functionally valid, just redundant
                result.add_issue(
                    ValidationIssue::warning(format!("Duplicate variable name: '{name}'"))
                        .at_position(inner.start()),
                );
            }
        }
    }

    result
}

/// Validates prompt field lengths.
///
/// Titles must be 3–200 characters, content 10–10000, category 1–50.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the first violated limit.
pub fn validate_prompt_fields(title: &str, content: &str, category: &str) -> Result<()> {
    let title_len = title.trim().chars().count();
    if title_len < MIN_TITLE_LEN || title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::InvalidInput(format!(
            "title must be {MIN_TITLE_LEN}-{MAX_TITLE_LEN} characters"
        )));
    }

    let content_len = content.trim().chars().count();
    if content_len < MIN_CONTENT_LEN || content.chars().count() > MAX_CONTENT_LEN {
        return Err(Error::InvalidInput(format!(
            "content must be {MIN_CONTENT_LEN}-{MAX_CONTENT_LEN} characters"
        )));
    }

    let category_len = category.trim().chars().count();
    if category_len == 0 || category.chars().count() > MAX_CATEGORY_LEN {
        return Err(Error::InvalidInput(format!(
            "category must be 1-{MAX_CATEGORY_LEN} characters"
        )));
    }

    Ok(())
}

/// Checks whether a tag is usable: non-blank and at most
/// [`MAX_TAG_LEN`] characters.
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.trim().is_empty() && tag.chars().count() <= MAX_TAG_LEN
}
