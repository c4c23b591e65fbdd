//! Force-directed layout for actor relationship networks.
//!
//! Hosts build a [`LayoutSimulation`] from a [`NetworkData`], call
//! [`LayoutSimulation::step`] once per frame and draw the positions it
//! reports. [`NetworkInteraction`] maps pointer events onto nodes and
//! [`export::to_csv`] dumps node attributes.

pub mod error;
pub mod export;
pub mod graph;
pub mod settings;
pub mod theme;

pub use error::{NetworkError, Result};
pub use graph::{
    ActorCategory, ForceLayout, LayoutSimulation, NetworkData, NetworkEdge, NetworkInteraction,
    NetworkNode, NodeSizing, SimulationOptions, StepOutcome, Viewport,
};
pub use settings::Settings;
