//! Force-directed layout step.
//!
//! One step applies, in order:
//! - Centering force toward the viewport centre
//! - Repulsion between all nodes (Coulomb's law), exact or Barnes-Hut
//! - Spring force along edges (Hooke's law) toward a weight-scaled rest length
//! - Damping, integration and clamping into the viewport margin
//!
//! Edge weight scales the *rest length*: a heavier edge settles its endpoints
//! further apart, not closer. This matches the behaviour of the dashboard the
//! layout was built for and is kept as-is.

use super::quadtree::{pair_repulsion, Quadtree};
use super::types::{NetworkData, Viewport};
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Below this length a link has no defined direction and exerts no force
const MIN_LINK_LENGTH: f32 = 1e-6;

/// Position and velocity of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Pos2,
    pub vel: Vec2,
}

impl Body {
    pub fn at(pos: Pos2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }
}

/// How the pairwise repulsion pass is computed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepulsionMode {
    /// Every pair, O(n²). Fine for tens of nodes.
    #[default]
    Exact,
    /// Quadtree approximation; `theta` is the cell-size / distance opening threshold
    BarnesHut { theta: f32 },
}

/// Force-directed layout parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLayout {
    /// Pull toward the viewport centre, per unit of displacement
    pub centering: f32,
    /// Repulsion strength between nodes
    pub repulsion: f32,
    /// Spring strength along edges
    pub attraction: f32,
    /// Velocity multiplier per step (0.0 - 1.0)
    pub damping: f32,
    /// Rest length of a weight-1 edge
    pub link_distance: f32,
    /// Distance floor for repulsion, prevents division by zero
    pub min_distance: f32,
    /// Distance kept between nodes and the viewport edges
    pub margin: f32,
    /// How much degree adds to a node's inertia (0 = uniform)
    pub degree_mass_weight: f32,
    /// Average speed below which the layout counts as settled
    pub settle_threshold: f32,
    pub repulsion_mode: RepulsionMode,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            centering: 0.05,
            repulsion: 1000.0,
            attraction: 0.1,
            damping: 0.9,
            link_distance: 100.0,
            min_distance: 1.0,
            margin: 30.0,
            degree_mass_weight: 0.0,
            settle_threshold: 0.1,
            repulsion_mode: RepulsionMode::Exact,
        }
    }
}

impl ForceLayout {
    /// Run one iteration of the force simulation.
    ///
    /// Reads `current` and writes the resulting frame into `next`; both are in
    /// node order. Edges whose endpoints are missing from `node_index` are skipped.
    pub fn step(
        &self,
        current: &[Body],
        next: &mut [Body],
        data: &NetworkData,
        node_index: &HashMap<String, usize>,
        viewport: Viewport,
    ) {
        debug_assert_eq!(current.len(), next.len());
        debug_assert_eq!(current.len(), data.nodes.len());

        let n = current.len();
        if n == 0 {
            return;
        }

        let masses = self.node_masses(data);
        let mut forces = vec![Vec2::ZERO; n];

        let center = viewport.center();
        for (force, body) in forces.iter_mut().zip(current) {
            *force += (center - body.pos) * self.centering;
        }

        match self.repulsion_mode {
            RepulsionMode::Exact => self.apply_exact_repulsion(current, &masses, &mut forces),
            RepulsionMode::BarnesHut { theta } => {
                let positions: Vec<Pos2> = current.iter().map(|b| b.pos).collect();
                let tree = Quadtree::build(&positions, theta);
                for (i, force) in forces.iter_mut().enumerate() {
                    let push = tree.repulsion_on(i, positions[i], self.repulsion, self.min_distance);
                    *force += push / masses[i];
                }
            }
        }

        for edge in &data.edges {
            let (Some(&source), Some(&target)) = (
                node_index.get(edge.source.as_str()),
                node_index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if source == target {
                continue;
            }

            let delta = current[target].pos - current[source].pos;
            let length = delta.length();
            if length < MIN_LINK_LENGTH {
                continue;
            }

            // Invalid or overflowing weights exert no force, like dangling edges
            if !(edge.weight.is_finite() && edge.weight > 0.0) {
                continue;
            }
            let rest_length = self.link_distance * edge.weight;
            if !rest_length.is_finite() {
                continue;
            }
            let displacement = length - rest_length;
            let force = (delta / length) * (displacement * self.attraction);
            if !(force.x.is_finite() && force.y.is_finite()) {
                continue;
            }
            forces[source] += force;
            forces[target] -= force;
        }

        let bounds = viewport.inner_bounds(self.margin);
        for ((out, body), force) in next.iter_mut().zip(current).zip(&forces) {
            let mut vel = (body.vel + *force) * self.damping;
            if !(vel.x.is_finite() && vel.y.is_finite()) {
                vel = Vec2::ZERO;
            }
            let pos = body.pos + vel;
            out.vel = vel;
            out.pos = Pos2::new(
                pos.x.clamp(bounds.min.x, bounds.max.x),
                pos.y.clamp(bounds.min.y, bounds.max.y),
            );
        }
    }

    /// Each unordered pair once, equal and opposite.
    fn apply_exact_repulsion(&self, current: &[Body], masses: &[f32], forces: &mut [Vec2]) {
        for i in 0..current.len() {
            for j in (i + 1)..current.len() {
                let push = pair_repulsion(
                    i,
                    current[i].pos,
                    j,
                    current[j].pos,
                    self.repulsion,
                    self.min_distance,
                );
                forces[i] += push / masses[i];
                forces[j] -= push / masses[j];
            }
        }
    }

    /// mass = 1.0 + weight * normalized degree (range 1.0 to 1.0 + weight).
    /// At weight 0 every mass is 1.0.
    fn node_masses(&self, data: &NetworkData) -> Vec<f32> {
        if self.degree_mass_weight == 0.0 {
            return vec![1.0; data.nodes.len()];
        }

        let min = data.nodes.iter().map(|n| n.degree).min().unwrap_or(0) as f32;
        let max = data.nodes.iter().map(|n| n.degree).max().unwrap_or(0) as f32;
        let span = (max - min).max(1.0);

        data.nodes
            .iter()
            .map(|n| {
                let normalized = (n.degree as f32 - min) / span;
                (1.0 + self.degree_mass_weight * normalized).max(0.1)
            })
            .collect()
    }

    /// Check if the simulation has settled
    pub fn is_settled(&self, bodies: &[Body]) -> bool {
        if bodies.is_empty() {
            return true;
        }
        let total: f32 = bodies.iter().map(|b| b.vel.length()).sum();
        total / (bodies.len() as f32) < self.settle_threshold
    }
}

/// Sum of squared speeds over all bodies
pub fn kinetic_energy(bodies: &[Body]) -> f32 {
    bodies.iter().map(|b| b.vel.length_sq()).sum()
}
