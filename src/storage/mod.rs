//! Storage collaborator seam.
//!
//! The core never persists anything itself; hosts provide a
//! [`PromptStore`] implementation and pass immutable snapshots into the
//! engines. [`InMemoryPromptStore`] covers tests and simple embedders.

mod memory;

pub use memory::InMemoryPromptStore;

use crate::models::{Prompt, PromptId};
use crate::Result;

/// Trait for prompt storage backends.
///
/// Implementations are the authoritative source of truth for prompts.
/// `Send + Sync` so a single instance can serve concurrent sessions;
/// methods take `&self`, leaving interior mutability to the
/// implementation.
pub trait PromptStore: Send + Sync {
    /// Returns every stored prompt, in a stable order.
    fn all_prompts(&self) -> Result<Vec<Prompt>>;

    /// Retrieves a prompt by ID.
    fn get(&self, id: &PromptId) -> Result<Option<Prompt>>;

    /// Stores a prompt (insert or replace) and returns its ID.
    fn save(&self, prompt: Prompt) -> Result<PromptId>;

    /// Increments a prompt's usage counter.
    ///
    /// Returns `false` when the prompt does not exist.
    fn increment_use_count(&self, id: &PromptId) -> Result<bool>;

    /// Checks if a prompt exists.
    fn exists(&self, id: &PromptId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Returns the total count of prompts.
    fn count(&self) -> Result<usize> {
        Ok(self.all_prompts()?.len())
    }
}
