//! Persistent layout settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NetworkError, Result};
use crate::graph::{ForceLayout, NodeSizing, RepulsionMode, SimulationOptions, Viewport};

/// All tunable constants, stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Viewport
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,

    // Physics
    #[serde(default = "default_centering")]
    pub centering: f32,
    #[serde(default = "default_repulsion")]
    pub repulsion: f32,
    #[serde(default = "default_attraction")]
    pub attraction: f32,
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_link_distance")]
    pub link_distance: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// How much degree adds to inertia (0 = uniform)
    #[serde(default)]
    pub degree_mass_weight: f32,
    #[serde(default)]
    pub repulsion_mode: RepulsionMode,

    // Initialization
    #[serde(default = "default_scatter_radius")]
    pub scatter_radius: f32,
    #[serde(default)]
    pub seed: Option<u64>,

    // Settling
    #[serde(default)]
    pub auto_pause: bool,
    #[serde(default = "default_settle_threshold")]
    pub settle_threshold: f32,
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: f32,

    // Interaction
    #[serde(default = "default_node_base_radius")]
    pub node_base_radius: f32,
    #[serde(default = "default_node_radius_per_degree")]
    pub node_radius_per_degree: f32,
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    600.0
}

fn default_centering() -> f32 {
    ForceLayout::default().centering
}

fn default_repulsion() -> f32 {
    ForceLayout::default().repulsion
}

fn default_attraction() -> f32 {
    ForceLayout::default().attraction
}

fn default_damping() -> f32 {
    ForceLayout::default().damping
}

fn default_link_distance() -> f32 {
    ForceLayout::default().link_distance
}

fn default_min_distance() -> f32 {
    ForceLayout::default().min_distance
}

fn default_margin() -> f32 {
    ForceLayout::default().margin
}

fn default_settle_threshold() -> f32 {
    ForceLayout::default().settle_threshold
}

fn default_scatter_radius() -> f32 {
    SimulationOptions::default().scatter_radius
}

fn default_settle_delay_secs() -> f32 {
    SimulationOptions::default().settle_delay_secs
}

fn default_node_base_radius() -> f32 {
    NodeSizing::default().base
}

fn default_node_radius_per_degree() -> f32 {
    NodeSizing::default().per_degree
}

impl Default for Settings {
    fn default() -> Self {
        let layout = ForceLayout::default();
        let options = SimulationOptions::default();
        let sizing = NodeSizing::default();
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),

            centering: layout.centering,
            repulsion: layout.repulsion,
            attraction: layout.attraction,
            damping: layout.damping,
            link_distance: layout.link_distance,
            min_distance: layout.min_distance,
            margin: layout.margin,
            degree_mass_weight: layout.degree_mass_weight,
            repulsion_mode: layout.repulsion_mode,

            scatter_radius: options.scatter_radius,
            seed: options.seed,

            auto_pause: options.auto_pause,
            settle_threshold: layout.settle_threshold,
            settle_delay_secs: options.settle_delay_secs,

            node_base_radius: sizing.base,
            node_radius_per_degree: sizing.per_degree,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("actor-network");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from the config directory, returning defaults if the file
    /// doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to load settings: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().ok_or(NetworkError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| NetworkError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| NetworkError::io(path, e))?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn layout(&self) -> ForceLayout {
        ForceLayout {
            centering: self.centering,
            repulsion: self.repulsion,
            attraction: self.attraction,
            damping: self.damping,
            link_distance: self.link_distance,
            min_distance: self.min_distance,
            margin: self.margin,
            degree_mass_weight: self.degree_mass_weight,
            settle_threshold: self.settle_threshold,
            repulsion_mode: self.repulsion_mode,
        }
    }

    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            scatter_radius: self.scatter_radius,
            seed: self.seed,
            auto_pause: self.auto_pause,
            settle_delay_secs: self.settle_delay_secs,
        }
    }

    pub fn node_sizing(&self) -> NodeSizing {
        NodeSizing {
            base: self.node_base_radius,
            per_degree: self.node_radius_per_degree,
        }
    }

    pub fn viewport(&self) -> Result<Viewport> {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}
