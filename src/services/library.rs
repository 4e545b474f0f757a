//! Snapshot queries over the prompt library.
//!
//! Pure filtering and faceting over an immutable prompt snapshot, plus the
//! one storage-touching operation: using a prompt (which bumps its usage
//! counter through the [`PromptStore`] seam before substituting values).

use crate::models::prompt::substitute_variables;
use crate::models::{Prompt, PromptId};
use crate::storage::PromptStore;
use crate::Result;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Search and filter criteria for listing prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    /// Case-insensitive substring matched against title, content, and tags.
    pub query: String,
    /// Keep only prompts in this category, when set.
    pub category: Option<String>,
    /// Keep prompts carrying any of these tags.
    pub tags: Vec<String>,
    /// Keep only favorites.
    pub favorites_only: bool,
}

impl LibraryFilter {
    /// Creates a filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restricts to a single category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to prompts carrying any of the given tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Restricts to favorites.
    #[must_use]
    pub const fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    /// Checks whether a prompt matches all criteria.
    #[must_use]
    pub fn matches(&self, prompt: &Prompt) -> bool {
        if let Some(category) = &self.category
            && prompt.category != *category
        {
            return false;
        }

        if self.favorites_only && !prompt.is_favorite {
            return false;
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|t| prompt.tags.contains(t)) {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let in_title = prompt.title.to_lowercase().contains(&query);
            let in_content = prompt.content.to_lowercase().contains(&query);
            let in_tags = prompt.tags.iter().any(|t| t.to_lowercase().contains(&query));
            if !(in_title || in_content || in_tags) {
                return false;
            }
        }

        true
    }
}

/// Filters a prompt snapshot, preserving order.
#[must_use]
pub fn filter_prompts(prompts: &[Prompt], filter: &LibraryFilter) -> Vec<Prompt> {
    prompts
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Facet counts over a prompt snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    /// Prompt count per category.
    pub categories: BTreeMap<String, usize>,
    /// Prompt count per tag.
    pub tags: BTreeMap<String, usize>,
}

/// Counts category and tag occurrences across a snapshot.
#[must_use]
pub fn facet_counts(prompts: &[Prompt]) -> FacetCounts {
    let mut counts = FacetCounts::default();

    for prompt in prompts {
        *counts.categories.entry(prompt.category.clone()).or_insert(0) += 1;
        for tag in &prompt.tags {
            *counts.tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    counts
}

/// Uses a prompt: bumps its usage counter and substitutes values.
///
/// Returns `None` when the prompt does not exist. Missing values stay as
/// literal `{{name}}` tokens in the output, matching preview behavior.
///
/// # Errors
///
/// Propagates storage failures from the [`PromptStore`] implementation.
pub fn use_prompt<S: BuildHasher>(
    store: &dyn PromptStore,
    id: &PromptId,
    values: &HashMap<String, String, S>,
) -> Result<Option<String>> {
    let Some(prompt) = store.get(id)? else {
        tracing::debug!(id = %id, "use_prompt: unknown prompt");
        return Ok(None);
    };

    store.increment_use_count(id)?;
    Ok(Some(substitute_variables(&prompt.content, values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPromptStore;

    fn prompt(title: &str, category: &str, tags: &[&str]) -> Prompt {
        Prompt::new(title, "body with {{detail}} token inside", category)
            .with_tags(tags.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_filter_query_matches_title_content_tags() {
        let prompts = vec![
            prompt("Email draft", "Writing", &["outreach"]),
            prompt("Standup notes", "Writing", &["meeting"]),
            prompt("Bug report", "Development", &["email-templates"]),
        ];

        let by_title = filter_prompts(&prompts, &LibraryFilter::new().with_query("email"));
        assert_eq!(by_title.len(), 2);

        let by_content = filter_prompts(&prompts, &LibraryFilter::new().with_query("DETAIL"));
        assert_eq!(by_content.len(), 3);

        let by_tag = filter_prompts(&prompts, &LibraryFilter::new().with_query("meeting"));
        assert_eq!(by_tag.len(), 1);
    }

    #[test]
    fn test_filter_combines_criteria() {
        let prompts = vec![
            prompt("Email draft", "Writing", &["outreach"]).with_favorite(true),
            prompt("Email blast", "Marketing", &["outreach"]),
        ];

        let filter = LibraryFilter::new()
            .with_query("email")
            .with_category("Writing")
            .favorites_only();
        let matched = filter_prompts(&prompts, &filter);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Email draft");
    }

    #[test]
    fn test_filter_any_of_tags() {
        let prompts = vec![
            prompt("A", "Writing", &["x"]),
            prompt("B", "Writing", &["y"]),
            prompt("C", "Writing", &[]),
        ];

        let filter = LibraryFilter::new().with_tags(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(filter_prompts(&prompts, &filter).len(), 2);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let prompts = vec![prompt("A", "Writing", &[]), prompt("B", "Analysis", &[])];
        assert_eq!(filter_prompts(&prompts, &LibraryFilter::new()).len(), 2);
    }

    #[test]
    fn test_facet_counts() {
        let prompts = vec![
            prompt("A", "Writing", &["draft", "email"]),
            prompt("B", "Writing", &["draft"]),
            prompt("C", "Development", &[]),
        ];

        let counts = facet_counts(&prompts);
        assert_eq!(counts.categories.get("Writing"), Some(&2));
        assert_eq!(counts.categories.get("Development"), Some(&1));
        assert_eq!(counts.tags.get("draft"), Some(&2));
        assert_eq!(counts.tags.get("email"), Some(&1));
    }

    #[test]
    fn test_use_prompt_substitutes_and_increments() {
        let store = InMemoryPromptStore::new();
        let p = prompt("A", "Writing", &[]);
        let id = store.save(p).unwrap();

        let mut values = HashMap::new();
        values.insert("detail".to_string(), "specifics".to_string());

        let rendered = use_prompt(&store, &id, &values).unwrap();
        assert_eq!(
            rendered.as_deref(),
            Some("body with specifics token inside")
        );

        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.use_count, 1);
    }

    #[test]
    fn test_use_prompt_unknown_id_is_none() {
        let store = InMemoryPromptStore::new();
        let values: HashMap<String, String> = HashMap::new();

        let rendered = use_prompt(&store, &PromptId::from("missing"), &values).unwrap();
        assert_eq!(rendered, None);
    }
}
