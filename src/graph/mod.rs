//! Graph data structures, layout simulation and hit-testing.

pub mod interaction;
pub mod layout;
pub mod metrics;
pub mod quadtree;
pub mod simulation;
pub mod types;

pub use interaction::{
    hit_test, node_at, EdgeAppearance, NetworkInteraction, NodeAppearance, NodeSizing,
};
pub use layout::{kinetic_energy, Body, ForceLayout, RepulsionMode};
pub use metrics::{centrality, compute_metrics, CentralityScores};
pub use simulation::{LayoutSimulation, SimulationOptions, StepOutcome};
pub use types::{
    ActorCategory, NetworkData, NetworkEdge, NetworkNode, Viewport, MAX_EDGE_WEIGHT,
};
