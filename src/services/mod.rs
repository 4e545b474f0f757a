//! Core services: similarity scoring, galaxy building, layout, and
//! snapshot library queries.

mod components;
mod galaxy;
mod layout;
mod library;
mod similarity;

pub use components::connected_components;
pub use galaxy::{GalaxyBuilder, GalaxyFilter};
pub use layout::{LayoutEngine, SpringLayout, SpringOptions, depth_for_use_count};
pub use library::{FacetCounts, LibraryFilter, facet_counts, filter_prompts, use_prompt};
pub use similarity::{SimilarityWeights, jaccard, pairwise_similarity, title_words};
