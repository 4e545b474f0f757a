//! 3D layout for the galaxy graph.
//!
//! The layout strategy is injectable via [`LayoutEngine`] so the spring
//! embedding is an implementation detail, swappable and independently
//! testable with a deterministic seed. The default [`SpringLayout`] runs a
//! Fruchterman–Reingold force simulation in 2D and derives depth from
//! usage:
//!
//! - `x`, `y` — spring layout; strongly connected nodes pull together,
//!   disconnected components drift apart.
//! - `z` — monotonic in `use_count` (heavily used prompts sit closer to
//!   the viewer) plus a bounded random jitter so tied counts don't overlap
//!   perfectly.

use crate::models::{GalaxyGraph, Position, PromptId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Scales use count into depth units.
const DEPTH_GAIN: f64 = 1.5;

/// Smallest distance used in force computations, to avoid dividing by
/// zero when two nodes land on the same point.
const MIN_DISTANCE: f64 = 1e-6;

/// Strategy interface for positioning galaxy nodes in 3D.
///
/// Implementations must be deterministic for a fixed `seed`; `None`
/// requests entropy-based initialization for production use.
pub trait LayoutEngine: Send + Sync {
    /// Computes a position for every node in the graph.
    fn layout(&self, graph: &GalaxyGraph, seed: Option<u64>) -> HashMap<PromptId, Position>;
}

/// Tuning knobs for [`SpringLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringOptions {
    /// Number of force-simulation iterations.
    pub iterations: usize,
    /// Half-extent of the layout cube; final x/y land in `[-scale, scale]`.
    pub scale: f64,
    /// Maximum absolute depth jitter added to the use-count depth.
    pub jitter: f64,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            iterations: 50,
            scale: 10.0,
            jitter: 0.5,
        }
    }
}

/// Depth coordinate for a usage counter, before jitter.
///
/// Logarithmic so heavily used prompts do not fly arbitrarily far from
/// the rest; strictly monotonic in `use_count`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn depth_for_use_count(use_count: u64) -> f64 {
    DEPTH_GAIN * (use_count as f64).ln_1p()
}

/// Force-directed spring layout (Fruchterman–Reingold) in 2D, with
/// usage-derived depth.
#[derive(Debug, Clone, Default)]
pub struct SpringLayout {
    options: SpringOptions,
}

impl SpringLayout {
    /// Creates a layout engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layout engine with the given options.
    #[must_use]
    pub const fn with_options(options: SpringOptions) -> Self {
        Self { options }
    }

    /// Runs the 2D force simulation.
    #[allow(clippy::cast_precision_loss)]
    fn spring_positions(&self, graph: &GalaxyGraph, rng: &mut StdRng) -> Vec<(f64, f64)> {
        let n = graph.nodes.len();
        let scale = self.options.scale;

        if n == 1 {
            return vec![(0.0, 0.0)];
        }

        let index_of: HashMap<&PromptId, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (&node.id, i))
            .collect();
        let edges: Vec<(usize, usize, f64)> = graph
            .edges
            .iter()
            .filter_map(|e| {
                let a = *index_of.get(&e.source)?;
                let b = *index_of.get(&e.target)?;
                Some((a, b, e.weight))
            })
            .collect();

        let mut xy: Vec<(f64, f64)> = (0..n)
            .map(|_| {
                (
                    rng.random_range(-scale..=scale),
                    rng.random_range(-scale..=scale),
                )
            })
            .collect();

        let k = (scale * scale / n as f64).sqrt();
        let mut temperature = scale / 5.0;
        let cooling = temperature / (self.options.iterations as f64 + 1.0);

        for _ in 0..self.options.iterations {
            let mut disp = vec![(0.0_f64, 0.0_f64); n];

            // Repulsion between every pair
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = xy[i].0 - xy[j].0;
                    let dy = xy[i].1 - xy[j].1;
                    let dist = dx.hypot(dy).max(MIN_DISTANCE);
                    let force = k * k / dist;
                    let (ux, uy) = (dx / dist, dy / dist);
                    disp[i].0 += ux * force;
                    disp[i].1 += uy * force;
                    disp[j].0 -= ux * force;
                    disp[j].1 -= uy * force;
                }
            }

            // Attraction along edges, weighted by similarity
            for &(i, j, weight) in &edges {
                let dx = xy[i].0 - xy[j].0;
                let dy = xy[i].1 - xy[j].1;
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let force = dist * dist / k * weight;
                let (ux, uy) = (dx / dist, dy / dist);
                disp[i].0 -= ux * force;
                disp[i].1 -= uy * force;
                disp[j].0 += ux * force;
                disp[j].1 += uy * force;
            }

            // Apply displacements, limited by the current temperature
            for i in 0..n {
                let (dx, dy) = disp[i];
                let norm = dx.hypot(dy);
                if norm > MIN_DISTANCE {
                    let limited = norm.min(temperature);
                    xy[i].0 += dx / norm * limited;
                    xy[i].1 += dy / norm * limited;
                }
            }

            temperature = (temperature - cooling).max(0.0);
        }

        recenter_and_rescale(&mut xy, scale);
        xy
    }
}

/// Translates positions to their centroid and rescales the farthest node
/// onto the `[-scale, scale]` boundary.
#[allow(clippy::cast_precision_loss)]
fn recenter_and_rescale(xy: &mut [(f64, f64)], scale: f64) {
    let n = xy.len() as f64;
    let cx = xy.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = xy.iter().map(|p| p.1).sum::<f64>() / n;

    let mut max_radius = 0.0_f64;
    for p in xy.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        max_radius = max_radius.max(p.0.hypot(p.1));
    }

    if max_radius > MIN_DISTANCE {
        let factor = scale / max_radius;
        for p in xy.iter_mut() {
            p.0 *= factor;
            p.1 *= factor;
        }
    }
}

impl LayoutEngine for SpringLayout {
    fn layout(&self, graph: &GalaxyGraph, seed: Option<u64>) -> HashMap<PromptId, Position> {
        if graph.nodes.is_empty() {
            return HashMap::new();
        }

        let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let xy = self.spring_positions(graph, &mut rng);

        let jitter = self.options.jitter;
        graph
            .nodes
            .iter()
            .zip(xy)
            .map(|(node, (x, y))| {
                let wobble = if jitter > 0.0 {
                    rng.random_range(-jitter..=jitter)
                } else {
                    0.0
                };
                let z = depth_for_use_count(node.use_count) + wobble;
                (node.id.clone(), Position::new(x, y, z))
            })
            .collect()
    }
}
