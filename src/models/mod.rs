//! Data models shared by the variable engine and the galaxy builder.

pub mod graph;
pub mod prompt;

pub use graph::{GalaxyGraph, GalaxyNode, GalaxyStats, Position, SimilarityEdge};
pub use prompt::{Prompt, PromptId, Variable, VariableType};
