//! In-memory prompt store for testing and simple embedders.

use crate::models::{Prompt, PromptId};
use crate::storage::PromptStore;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory prompt store.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics.
/// Data is not persisted between runs.
#[derive(Debug, Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<PromptId, Prompt>>,
}

impl InMemoryPromptStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given prompts.
    #[must_use]
    pub fn with_prompts(prompts: Vec<Prompt>) -> Self {
        let map = prompts.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            prompts: RwLock::new(map),
        }
    }

    fn locked_for(operation: &str) -> Error {
        Error::OperationFailed {
            operation: operation.to_string(),
            cause: "prompt store lock poisoned".to_string(),
        }
    }
}

impl PromptStore for InMemoryPromptStore {
    fn all_prompts(&self) -> Result<Vec<Prompt>> {
        let guard = self
            .prompts
            .read()
            .map_err(|_| Self::locked_for("all_prompts"))?;

        let mut prompts: Vec<Prompt> = guard.values().cloned().collect();
        // Stable order: oldest first, ID as tiebreaker
        prompts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(prompts)
    }

    fn get(&self, id: &PromptId) -> Result<Option<Prompt>> {
        let guard = self.prompts.read().map_err(|_| Self::locked_for("get"))?;
        Ok(guard.get(id).cloned())
    }

    fn save(&self, prompt: Prompt) -> Result<PromptId> {
        let mut guard = self.prompts.write().map_err(|_| Self::locked_for("save"))?;
        let id = prompt.id.clone();
        guard.insert(id.clone(), prompt);
        Ok(id)
    }

    fn increment_use_count(&self, id: &PromptId) -> Result<bool> {
        let mut guard = self
            .prompts
            .write()
            .map_err(|_| Self::locked_for("increment_use_count"))?;

        match guard.get_mut(id) {
            Some(prompt) => {
                prompt.use_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
