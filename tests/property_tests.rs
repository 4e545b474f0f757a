//! Property-based tests for the variable engine and similarity scoring.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Extraction returns no duplicates and preserves first-appearance order
//! - Substitution with no values is the identity
//! - One substitution pass is stable for token-free values
//! - Missing variables are always a subset of extracted variables
//! - Pairwise similarity is symmetric and bounded
//! - Built graphs only contain edges strictly above the threshold

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use promptdeck::models::prompt::{
    extract_variables, missing_variables, reconcile_variables, render_preview,
    substitute_variables,
};
use promptdeck::services::{jaccard, pairwise_similarity};
use promptdeck::{GalaxyBuilder, GalaxyConfig, GalaxyFilter, Prompt, SimilarityWeights};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

/// Strategy for valid variable identifiers.
fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}"
}

/// Strategy for prompt content assembled from literal chunks and tokens.
fn content_with_tokens() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 .,!?]{0,12}",
            identifier().prop_map(|name| format!("{{{{{name}}}}}")),
        ],
        0..12,
    )
    .prop_map(|chunks| chunks.concat())
}

/// Strategy for a random prompt.
fn arbitrary_prompt() -> impl Strategy<Value = Prompt> {
    (
        "[a-zA-Z ]{0,20}",
        prop::sample::select(vec!["Development", "Writing", "Marketing", "Analysis"]),
        proptest::collection::vec("[a-z]{1,6}", 0..5),
        any::<bool>(),
        0u64..500,
    )
        .prop_map(|(title, category, tags, is_favorite, use_count)| {
            Prompt::new(title, "content long enough for scoring", category)
                .with_tags(tags)
                .with_favorite(is_favorite)
                .with_use_count(use_count)
        })
}

proptest! {
    /// Property: extraction never returns duplicate names.
    #[test]
    fn prop_extraction_has_no_duplicates(content in content_with_tokens()) {
        let names = extract_variables(&content);
        let unique: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(unique.len(), names.len());
    }

    /// Property: every extracted name appears as a literal token in content.
    #[test]
    fn prop_extracted_names_come_from_content(content in content_with_tokens()) {
        for name in extract_variables(&content) {
            let token = format!("{{{{{name}}}}}");
            prop_assert!(content.contains(&token));
        }
    }

    /// Property: first-appearance order is preserved.
    #[test]
    fn prop_extraction_order_is_first_appearance(content in content_with_tokens()) {
        let names = extract_variables(&content);
        let mut last_position = 0;
        for name in &names {
            let token = format!("{{{{{name}}}}}");
            let position = content.find(&token).unwrap();
            prop_assert!(position >= last_position || names.len() == 1);
            last_position = position.max(last_position);
        }
    }

    /// Property: substitution with an empty value map is the identity.
    #[test]
    fn prop_empty_substitution_is_identity(content in content_with_tokens()) {
        let values: HashMap<String, String> = HashMap::new();
        prop_assert_eq!(substitute_variables(&content, &values), content);
    }

    /// Property: a second pass over token-free values changes nothing.
    #[test]
    fn prop_one_pass_substitution_is_stable(
        content in content_with_tokens(),
        values in proptest::collection::hash_map(identifier(), "[a-zA-Z0-9 ]{0,10}", 0..6),
    ) {
        let once = substitute_variables(&content, &values);
        let twice = substitute_variables(&once, &values);
        prop_assert_eq!(once, twice);
    }

    /// Property: missing variables are a subset of extracted, in order.
    #[test]
    fn prop_missing_is_ordered_subset_of_extracted(
        content in content_with_tokens(),
        values in proptest::collection::hash_map(identifier(), "[a-z ]{0,6}", 0..6),
    ) {
        let extracted = extract_variables(&content);
        let missing = missing_variables(&content, &values);

        let mut cursor = extracted.iter();
        for name in &missing {
            prop_assert!(cursor.any(|e| e == name));
        }
    }

    /// Property: a complete preview has no missing names and no recognized
    /// tokens left for the provided names.
    #[test]
    fn prop_fully_valued_preview_is_complete(content in content_with_tokens()) {
        let values: HashMap<String, String> = extract_variables(&content)
            .into_iter()
            .map(|name| (name, "filled".to_string()))
            .collect();

        let preview = render_preview(&content, &values);
        prop_assert!(preview.missing.is_empty());
        for name in values.keys() {
            let token = format!("{{{{{name}}}}}");
            prop_assert!(!preview.text.contains(&token));
        }
    }

    /// Property: reconciliation covers every referenced name exactly once.
    #[test]
    fn prop_reconcile_covers_all_references(content in content_with_tokens()) {
        let variables = reconcile_variables(&content, &[]);
        let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
        let extracted = extract_variables(&content);

        prop_assert_eq!(names.len(), extracted.len());
        for name in &extracted {
            prop_assert!(names.contains(&name.as_str()));
        }
    }

    /// Property: jaccard is bounded and symmetric.
    #[test]
    fn prop_jaccard_bounded_symmetric(
        a in proptest::collection::hash_set("[a-z]{1,4}", 0..8),
        b in proptest::collection::hash_set("[a-z]{1,4}", 0..8),
    ) {
        let ab = jaccard(&a, &b);
        let ba = jaccard(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < f64::EPSILON);
    }

    /// Property: pairwise similarity is symmetric and in [0, 1].
    #[test]
    fn prop_similarity_symmetric_and_bounded(
        a in arbitrary_prompt(),
        b in arbitrary_prompt(),
    ) {
        let weights = SimilarityWeights::default();
        let ab = pairwise_similarity(&a, &b, &weights);
        let ba = pairwise_similarity(&b, &a, &weights);

        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    /// Property: built graphs only carry edges strictly above the threshold,
    /// and nodes are exactly the filtered prompt set.
    #[test]
    fn prop_graph_edges_respect_threshold(
        prompts in proptest::collection::vec(arbitrary_prompt(), 0..12),
        threshold in 0.0f64..=1.0,
    ) {
        let builder = GalaxyBuilder::new(
            GalaxyConfig::new().with_threshold(threshold).with_seed(1),
        )
        .unwrap();
        let graph = builder.build(&prompts, &GalaxyFilter::new()).unwrap();

        prop_assert_eq!(graph.node_count(), prompts.len());
        for edge in &graph.edges {
            prop_assert!(edge.weight > threshold);
            prop_assert!(edge.weight <= 1.0 + 1e-12);
        }

        let stats = builder.statistics(&graph);
        prop_assert!(stats.component_count <= graph.node_count().max(1) || graph.is_empty());
        if graph.edges.is_empty() {
            prop_assert!(stats.average_similarity.abs() < f64::EPSILON);
        }
    }
}
