//! Graph data types for actor networks.

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::theme;

/// Largest accepted edge weight; keeps weight-scaled rest lengths finite
pub const MAX_EDGE_WEIGHT: f32 = 1e6;

/// Kind of actor a node represents. Only affects colour and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorCategory {
    Government,
    International,
    Ngo,
    Private,
    Academic,
    Community,
}

impl ActorCategory {
    pub fn color(&self) -> egui::Color32 {
        match self {
            ActorCategory::Government => theme::category::GOVERNMENT,
            ActorCategory::International => theme::category::INTERNATIONAL,
            ActorCategory::Ngo => theme::category::NGO,
            ActorCategory::Private => theme::category::PRIVATE,
            ActorCategory::Academic => theme::category::ACADEMIC,
            ActorCategory::Community => theme::category::COMMUNITY,
        }
    }

    /// Human-readable name for legends and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            ActorCategory::Government => "Government",
            ActorCategory::International => "International",
            ActorCategory::Ngo => "NGO",
            ActorCategory::Private => "Private Sector",
            ActorCategory::Academic => "Academic",
            ActorCategory::Community => "Community",
        }
    }

    /// Identifier as it appears in JSON input and CSV export
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorCategory::Government => "government",
            ActorCategory::International => "international",
            ActorCategory::Ngo => "ngo",
            ActorCategory::Private => "private",
            ActorCategory::Academic => "academic",
            ActorCategory::Community => "community",
        }
    }

    pub fn all() -> &'static [ActorCategory] {
        &[
            ActorCategory::Government,
            ActorCategory::International,
            ActorCategory::Ngo,
            ActorCategory::Private,
            ActorCategory::Academic,
            ActorCategory::Community,
        ]
    }
}

/// An actor in the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    #[serde(alias = "type")]
    pub category: ActorCategory,
    /// Incident edge count, precomputed upstream
    #[serde(default)]
    pub degree: u32,
    #[serde(default)]
    pub betweenness: f32,
    #[serde(default)]
    pub closeness: f32,
    /// Prior position; when present the simulation starts here instead of scattering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl NetworkNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: ActorCategory) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            degree: 0,
            betweenness: 0.0,
            closeness: 0.0,
            x: None,
            y: None,
        }
    }

    pub fn with_degree(mut self, degree: u32) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_centrality(mut self, betweenness: f32, closeness: f32) -> Self {
        self.betweenness = betweenness;
        self.closeness = closeness;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Prior position, if both coordinates are present and finite
    pub fn prior_position(&self) -> Option<Pos2> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Pos2::new(x, y)),
            _ => None,
        }
    }
}

fn default_weight() -> f32 {
    1.0
}

/// A weighted relationship between two actors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    /// Scales the link rest length and the rendered stroke
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl NetworkEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Complete graph as supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
}

impl NetworkData {
    pub fn new(nodes: Vec<NetworkNode>, edges: Vec<NetworkEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the id -> array index lookup. Later duplicates shadow earlier ones.
    pub fn node_index(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect()
    }

    pub fn get_node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check edge weights and collect edges whose endpoints are missing.
    ///
    /// Dangling edges are not an error: the simulator skips them. They are
    /// returned so callers can report them.
    pub fn validate(&self) -> Result<Vec<&NetworkEdge>> {
        let index = self.node_index();
        let mut dangling = Vec::new();

        for edge in &self.edges {
            let weight = edge.weight;
            if !(weight.is_finite() && weight > 0.0 && weight <= MAX_EDGE_WEIGHT) {
                return Err(NetworkError::InvalidWeight {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    weight: edge.weight,
                });
            }
            if !index.contains_key(&edge.source) || !index.contains_key(&edge.target) {
                dangling.push(edge);
            }
        }

        Ok(dangling)
    }
}

/// Drawing surface dimensions the layout is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(NetworkError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Region positions are clamped into: `[margin, size - margin]` per axis.
    /// Collapses to the centre line when the viewport is narrower than two margins.
    pub fn inner_bounds(&self, margin: f32) -> Rect {
        let margin = margin.max(0.0);
        let min_x = margin.min(self.width / 2.0);
        let min_y = margin.min(self.height / 2.0);
        let max_x = (self.width - margin).max(min_x);
        let max_y = (self.height - margin).max(min_y);
        Rect::from_min_max(Pos2::new(min_x, min_y), Pos2::new(max_x, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_graph_json_with_type_alias_and_defaults() {
        let json = r#"{
            "nodes": [
                {"id": "moh", "label": "Ministry of Health", "type": "government", "degree": 2,
                 "betweenness": 0.5, "closeness": 0.75},
                {"id": "who", "label": "WHO", "category": "international", "x": 10.0, "y": 20.0}
            ],
            "edges": [
                {"source": "moh", "target": "who", "weight": 2.0},
                {"source": "who", "target": "moh"}
            ]
        }"#;

        let data = NetworkData::from_json(json).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].category, ActorCategory::Government);
        assert_eq!(data.nodes[0].degree, 2);
        assert_eq!(data.nodes[0].prior_position(), None);
        assert_eq!(data.nodes[1].degree, 0);
        assert_eq!(data.nodes[1].prior_position(), Some(Pos2::new(10.0, 20.0)));
        assert_eq!(data.edges[1].weight, 1.0);
    }

    #[test]
    fn rejects_unknown_category() {
        let json = r#"{"nodes": [{"id": "a", "label": "A", "type": "martian"}]}"#;
        assert!(matches!(
            NetworkData::from_json(json),
            Err(NetworkError::Json(_))
        ));
    }

    #[test]
    fn validate_reports_dangling_edges() {
        let data = NetworkData::new(
            vec![
                NetworkNode::new("a", "A", ActorCategory::Ngo),
                NetworkNode::new("b", "B", ActorCategory::Ngo),
            ],
            vec![NetworkEdge::new("a", "b", 1.0), NetworkEdge::new("a", "ghost", 1.0)],
        );

        let dangling = data.validate().unwrap();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].target, "ghost");
    }

    #[test]
    fn validate_rejects_non_positive_weight() {
        let data = NetworkData::new(
            vec![
                NetworkNode::new("a", "A", ActorCategory::Ngo),
                NetworkNode::new("b", "B", ActorCategory::Ngo),
            ],
            vec![NetworkEdge::new("a", "b", 0.0)],
        );

        assert!(matches!(
            data.validate(),
            Err(NetworkError::InvalidWeight { weight, .. }) if weight == 0.0
        ));
    }

    #[test]
    fn validate_rejects_oversized_weight() {
        let mut data = NetworkData::new(
            vec![
                NetworkNode::new("a", "A", ActorCategory::Ngo),
                NetworkNode::new("b", "B", ActorCategory::Ngo),
            ],
            vec![NetworkEdge::new("a", "b", MAX_EDGE_WEIGHT)],
        );
        assert!(data.validate().is_ok());

        data.edges[0].weight = 1e37;
        assert!(matches!(
            data.validate(),
            Err(NetworkError::InvalidWeight { weight, .. }) if weight == 1e37
        ));
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 100.0).is_err());
        assert!(Viewport::new(100.0, f32::NAN).is_err());
        assert!(Viewport::new(800.0, 600.0).is_ok());
    }

    #[test]
    fn inner_bounds_apply_margin() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let bounds = viewport.inner_bounds(30.0);
        assert_eq!(bounds.min, Pos2::new(30.0, 30.0));
        assert_eq!(bounds.max, Pos2::new(770.0, 570.0));

        let tiny = Viewport::new(40.0, 40.0).unwrap().inner_bounds(30.0);
        assert_eq!(tiny.min, Pos2::new(20.0, 20.0));
        assert_eq!(tiny.max, Pos2::new(20.0, 20.0));
    }

    #[test]
    fn category_identifiers_round_trip_through_serde() {
        for category in ActorCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
