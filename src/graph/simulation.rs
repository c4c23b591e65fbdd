//! Frame-driven owner of a running layout.
//!
//! The host calls [`LayoutSimulation::step`] once per frame and reads positions
//! in between. Positions live in two buffers: a step reads the front buffer,
//! writes the back buffer and then swaps, so readers only ever observe whole
//! frames.

use egui::Pos2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f32::consts::TAU;

use super::layout::{kinetic_energy, Body, ForceLayout};
use super::types::{NetworkData, NetworkEdge, NetworkNode, Viewport};

/// Knobs that govern a run rather than the forces themselves
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Nodes without a prior position start within this distance of the centre
    pub scatter_radius: f32,
    /// Fixed seed for the initial scatter; `None` draws from the OS
    pub seed: Option<u64>,
    /// Stop advancing once the layout has stayed settled for `settle_delay_secs`
    pub auto_pause: bool,
    pub settle_delay_secs: f32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            scatter_radius: 100.0,
            seed: None,
            auto_pause: false,
            settle_delay_secs: 1.0,
        }
    }
}

/// What a call to [`LayoutSimulation::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// Auto-paused after settling; call `wake` to resume
    Paused,
    Disposed,
}

pub struct LayoutSimulation {
    data: NetworkData,
    node_index: HashMap<String, usize>,
    front: Vec<Body>,
    back: Vec<Body>,
    layout: ForceLayout,
    viewport: Viewport,
    options: SimulationOptions,
    rng: StdRng,
    settled_for: f32,
    paused: bool,
    disposed: bool,
    steps: u64,
}

impl LayoutSimulation {
    pub fn new(
        data: NetworkData,
        viewport: Viewport,
        layout: ForceLayout,
        options: SimulationOptions,
    ) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sim = Self {
            data: NetworkData::default(),
            node_index: HashMap::new(),
            front: Vec::new(),
            back: Vec::new(),
            layout,
            viewport,
            options,
            rng,
            settled_for: 0.0,
            paused: false,
            disposed: false,
            steps: 0,
        };
        sim.install(data, &HashMap::new());
        sim
    }

    /// Replace the graph, keeping the position and velocity of every node id
    /// that is still present. New ids start from their prior position or a
    /// fresh scatter.
    pub fn reload(&mut self, data: NetworkData) {
        let previous: HashMap<String, Body> = self
            .data
            .nodes
            .iter()
            .zip(&self.front)
            .map(|(node, body)| (node.id.clone(), *body))
            .collect();
        self.install(data, &previous);
        self.wake();
    }

    fn install(&mut self, data: NetworkData, previous: &HashMap<String, Body>) {
        let bounds = self.viewport.inner_bounds(self.layout.margin);
        let center = self.viewport.center();
        let mut kept = 0usize;

        self.front.clear();
        for node in &data.nodes {
            let body = if let Some(body) = previous.get(&node.id) {
                kept += 1;
                *body
            } else if let Some(pos) = node.prior_position() {
                Body::at(pos)
            } else {
                // Uniform over the disc
                let angle = self.rng.gen_range(0.0..TAU);
                let radius = self.options.scatter_radius.max(0.0) * self.rng.gen::<f32>().sqrt();
                Body::at(center + egui::vec2(angle.cos(), angle.sin()) * radius)
            };
            self.front.push(Body {
                pos: bounds.clamp(body.pos),
                vel: body.vel,
            });
        }
        self.back = self.front.clone();
        self.node_index = data.node_index();

        match data.validate() {
            Ok(dangling) => {
                for edge in dangling {
                    tracing::warn!(
                        "Edge {} -> {} references a missing node and will be ignored",
                        edge.source,
                        edge.target
                    );
                }
            }
            Err(e) => tracing::warn!("{}; edges with invalid weights exert no force", e),
        }

        tracing::debug!(
            "Loaded network: {} nodes ({} warm), {} edges",
            data.nodes.len(),
            kept,
            data.edges.len()
        );
        self.data = data;
        self.settled_for = 0.0;
    }

    /// Advance the layout by exactly one discrete step.
    ///
    /// `dt` is the frame time in seconds; it only drives the auto-pause timer.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        if self.disposed {
            return StepOutcome::Disposed;
        }
        if self.paused {
            return StepOutcome::Paused;
        }

        self.layout.step(
            &self.front,
            &mut self.back,
            &self.data,
            &self.node_index,
            self.viewport,
        );
        std::mem::swap(&mut self.front, &mut self.back);
        self.steps += 1;

        tracing::trace!(
            step = self.steps,
            energy = kinetic_energy(&self.front),
            "layout step"
        );

        if self.options.auto_pause {
            if self.layout.is_settled(&self.front) {
                self.settled_for += dt.max(0.0);
                if self.settled_for >= self.options.settle_delay_secs {
                    self.paused = true;
                    tracing::info!("Layout settled after {} steps, pausing", self.steps);
                }
            } else {
                self.settled_for = 0.0;
            }
        }

        StepOutcome::Advanced
    }

    /// Resume after an auto-pause
    pub fn wake(&mut self) {
        self.paused = false;
        self.settled_for = 0.0;
    }

    /// Stop the simulation for good; later steps do nothing
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!("Disposing layout after {} steps", self.steps);
        }
        self.disposed = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_settled(&self) -> bool {
        self.layout.is_settled(&self.front)
    }

    pub fn kinetic_energy(&self) -> f32 {
        kinetic_energy(&self.front)
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the drawing surface; positions are clamped into the new bounds
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let bounds = viewport.inner_bounds(self.layout.margin);
        for body in &mut self.front {
            body.pos = bounds.clamp(body.pos);
        }
        self.wake();
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: ForceLayout) {
        self.layout = layout;
        self.wake();
    }

    pub fn data(&self) -> &NetworkData {
        &self.data
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.data.nodes
    }

    pub fn edges(&self) -> &[NetworkEdge] {
        &self.data.edges
    }

    /// Latest complete frame, in node order
    pub fn bodies(&self) -> &[Body] {
        &self.front
    }

    pub fn positions(&self) -> impl Iterator<Item = (&NetworkNode, Pos2)> + '_ {
        self.data.nodes.iter().zip(&self.front).map(|(n, b)| (n, b.pos))
    }

    pub fn position_of(&self, id: &str) -> Option<Pos2> {
        self.node_index.get(id).map(|&i| self.front[i].pos)
    }

    /// Copy of the graph with each node's `x`/`y` set to its current position,
    /// suitable for a later warm start.
    pub fn snapshot(&self) -> NetworkData {
        let mut data = self.data.clone();
        for (node, body) in data.nodes.iter_mut().zip(&self.front) {
            node.x = Some(body.pos.x);
            node.y = Some(body.pos.y);
        }
        data
    }
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
