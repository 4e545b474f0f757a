//! Galaxy configuration.
//!
//! All scoring and styling constants live here as configuration defaults
//! rather than hard-coded literals, so hosts can tune them without code
//! changes. The defaults define the documented behavior: 0.40/0.50/0.10
//! similarity weights, 0.1 edge threshold, and the node size formula
//! `base_size + favorite_bonus + min(use_count / usage_divisor, usage_cap)`.

use crate::services::SimilarityWeights;
use crate::{Error, Result};

/// Default prompt categories seeded into new libraries.
///
/// The category set is not closed; hosts can add their own.
pub const DEFAULT_CATEGORIES: &[&str] =
    &["Development", "Writing", "Marketing", "Analysis", "General"];

/// Visual styling for galaxy nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Base marker size for every node.
    pub base_size: f64,
    /// Extra size for favorite prompts.
    pub favorite_bonus: f64,
    /// Divisor applied to `use_count` before capping.
    pub usage_divisor: f64,
    /// Cap on the usage contribution to size.
    pub usage_cap: f64,
    /// Color override for favorite prompts.
    pub favorite_color: String,
    /// Category palette, cycled in category first-appearance order.
    pub palette: Vec<String>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            base_size: 10.0,
            favorite_bonus: 5.0,
            usage_divisor: 2.0,
            usage_cap: 10.0,
            favorite_color: "#F59E0B".to_string(),
            palette: vec![
                "#2563EB".to_string(),
                "#8B5CF6".to_string(),
                "#EC4899".to_string(),
                "#10B981".to_string(),
                "#3B82F6".to_string(),
            ],
        }
    }
}

impl NodeStyle {
    /// Marker size for a prompt: `base + favorite bonus + capped usage`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_for(&self, is_favorite: bool, use_count: u64) -> f64 {
        let favorite = if is_favorite { self.favorite_bonus } else { 0.0 };
        let usage = (use_count as f64 / self.usage_divisor).min(self.usage_cap);
        self.base_size + favorite + usage
    }

    /// Color for a node given its category's palette slot.
    #[must_use]
    pub fn color_for(&self, category_slot: usize, is_favorite: bool) -> String {
        if is_favorite {
            return self.favorite_color.clone();
        }
        self.palette[category_slot % self.palette.len()].clone()
    }

    /// Validates the style constants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for non-finite or degenerate
    /// values (zero base size, empty palette, non-positive divisor).
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_size", self.base_size),
            ("favorite_bonus", self.favorite_bonus),
            ("usage_divisor", self.usage_divisor),
            ("usage_cap", self.usage_cap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "node style {name} {value} must be finite and non-negative"
                )));
            }
        }
        if self.base_size == 0.0 {
            return Err(Error::InvalidConfig(
                "node style base_size must be positive".to_string(),
            ));
        }
        if self.usage_divisor == 0.0 {
            return Err(Error::InvalidConfig(
                "node style usage_divisor must be positive".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(Error::InvalidConfig(
                "node style palette must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for galaxy construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyConfig {
    /// Similarity signal weights.
    pub weights: SimilarityWeights,
    /// Edge creation threshold; an edge exists iff `score > threshold`
    /// (strict inequality).
    pub threshold: f64,
    /// Node sizing and coloring.
    pub node_style: NodeStyle,
    /// Layout seed; `None` draws from OS entropy (production), `Some`
    /// makes the layout fully reproducible (tests).
    pub seed: Option<u64>,
    /// Optional cap on the filtered prompt count, guarding the O(n²)
    /// scoring pass on unexpectedly large libraries.
    pub max_prompts: Option<usize>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            threshold: 0.1,
            node_style: NodeStyle::default(),
            seed: None,
            max_prompts: None,
        }
    }
}

impl GalaxyConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the similarity weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the edge threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the node style.
    #[must_use]
    pub fn with_node_style(mut self, node_style: NodeStyle) -> Self {
        self.node_style = node_style;
        self
    }

    /// Sets a fixed layout seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the prompt count cap.
    #[must_use]
    pub const fn with_max_prompts(mut self, max_prompts: usize) -> Self {
        self.max_prompts = Some(max_prompts);
        self
    }

    /// Loads configuration overrides from `PROMPTDECK_*` environment
    /// variables, starting from defaults. Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PROMPTDECK_THRESHOLD")
            && let Ok(threshold) = val.parse()
        {
            config.threshold = threshold;
        }

        if let Ok(val) = std::env::var("PROMPTDECK_WEIGHT_CATEGORY")
            && let Ok(weight) = val.parse()
        {
            config.weights.category = weight;
        }

        if let Ok(val) = std::env::var("PROMPTDECK_WEIGHT_TAGS")
            && let Ok(weight) = val.parse()
        {
            config.weights.tags = weight;
        }

        if let Ok(val) = std::env::var("PROMPTDECK_WEIGHT_TITLE")
            && let Ok(weight) = val.parse()
        {
            config.weights.title = weight;
        }

        if let Ok(val) = std::env::var("PROMPTDECK_LAYOUT_SEED")
            && let Ok(seed) = val.parse()
        {
            config.seed = Some(seed);
        }

        if let Ok(val) = std::env::var("PROMPTDECK_MAX_PROMPTS")
            && let Ok(max) = val.parse()
        {
            config.max_prompts = Some(max);
        }

        config
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the threshold falls outside
    /// \[0,1\], the weights are invalid, or the node style is degenerate.
    /// Called by [`crate::services::GalaxyBuilder::new`], so bad
    /// configurations fail fast instead of producing nonsensical scores.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.node_style.validate()?;

        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "threshold {} must be in [0, 1]",
                self.threshold
            )));
        }

        Ok(())
    }
}
