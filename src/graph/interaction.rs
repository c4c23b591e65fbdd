//! Pointer hit-testing and hover/selection state.
//!
//! Everything here only reads simulated positions; it never touches the
//! simulation, so it is safe to call on every pointer-move event.

use egui::{Color32, Pos2};
use std::collections::HashSet;

use super::layout::Body;
use super::simulation::LayoutSimulation;
use super::types::{NetworkEdge, NetworkNode};
use crate::theme;

/// Render radius as a function of degree: `base + degree * per_degree`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSizing {
    pub base: f32,
    pub per_degree: f32,
}

impl Default for NodeSizing {
    fn default() -> Self {
        Self {
            base: 8.0,
            per_degree: 2.0,
        }
    }
}

impl NodeSizing {
    pub fn radius(&self, degree: u32) -> f32 {
        self.base + degree as f32 * self.per_degree
    }
}

/// Index of the first node (in array order) whose disc contains `pointer`.
///
/// Overlapping nodes resolve to whichever comes first in `nodes`; there is
/// no z-order.
pub fn hit_test(
    nodes: &[NetworkNode],
    bodies: &[Body],
    sizing: &NodeSizing,
    pointer: Pos2,
) -> Option<usize> {
    nodes.iter().zip(bodies).position(|(node, body)| {
        body.pos.distance(pointer) <= sizing.radius(node.degree)
    })
}

/// Node under `pointer` in the simulation's latest frame
pub fn node_at<'a>(
    sim: &'a LayoutSimulation,
    sizing: &NodeSizing,
    pointer: Pos2,
) -> Option<&'a NetworkNode> {
    hit_test(sim.nodes(), sim.bodies(), sizing, pointer).map(|i| &sim.nodes()[i])
}

/// What a renderer needs to draw one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAppearance {
    pub radius: f32,
    pub fill: Color32,
    /// Outline colour when hovered or selected
    pub outline: Option<Color32>,
}

/// What a renderer needs to draw one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAppearance {
    pub width: f32,
    pub color: Color32,
}

/// Hover, selection and highlight state for one view of the network
pub struct NetworkInteraction {
    sizing: NodeSizing,
    hovered: Option<String>,
    selected: Option<String>,
    /// Supplied by the host; only read here
    highlighted: HashSet<String>,
    on_node_click: Option<Box<dyn FnMut(&str)>>,
}

impl NetworkInteraction {
    pub fn new(sizing: NodeSizing) -> Self {
        Self {
            sizing,
            hovered: None,
            selected: None,
            highlighted: HashSet::new(),
            on_node_click: None,
        }
    }

    /// Register the click callback; invoked synchronously with the clicked node id
    pub fn on_node_click(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_node_click = Some(Box::new(callback));
        self
    }

    pub fn set_highlighted(&mut self, highlighted: HashSet<String>) {
        self.highlighted = highlighted;
    }

    pub fn highlighted(&self) -> &HashSet<String> {
        &self.highlighted
    }

    pub fn sizing(&self) -> &NodeSizing {
        &self.sizing
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Update hover from a pointer position, returning the hovered id
    pub fn pointer_moved(&mut self, sim: &LayoutSimulation, pointer: Pos2) -> Option<&str> {
        self.hovered = node_at(sim, &self.sizing, pointer).map(|n| n.id.clone());
        self.hovered.as_deref()
    }

    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }

    /// Select the node under `pointer` and fire the click callback.
    /// A click on empty space leaves the selection unchanged.
    pub fn pointer_clicked(&mut self, sim: &LayoutSimulation, pointer: Pos2) -> Option<String> {
        let id = node_at(sim, &self.sizing, pointer)?.id.clone();
        tracing::debug!("Node clicked: {}", id);
        if let Some(callback) = self.on_node_click.as_mut() {
            callback(&id);
        }
        self.selected = Some(id.clone());
        Some(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    pub fn is_emphasized(&self, id: &str) -> bool {
        self.is_highlighted(id) || self.hovered() == Some(id) || self.selected() == Some(id)
    }

    /// Fill is dimmed when a highlight set is active and the node is not in it
    pub fn appearance(&self, node: &NetworkNode) -> NodeAppearance {
        let base = node.category.color();
        let dimmed = !self.highlighted.is_empty() && !self.is_emphasized(&node.id);
        let fill = if dimmed {
            base.gamma_multiply(theme::emphasis::DIM_FACTOR)
        } else {
            base
        };

        let outline = if self.selected() == Some(node.id.as_str()) {
            Some(theme::emphasis::SELECTED)
        } else if self.hovered() == Some(node.id.as_str()) {
            Some(theme::emphasis::HOVERED)
        } else {
            None
        };

        NodeAppearance {
            radius: self.sizing.radius(node.degree),
            fill,
            outline,
        }
    }
}

impl NetworkInteraction {
    /// Width follows weight; dimmed unless an endpoint is emphasized while a
    /// highlight set is active
    pub fn edge_appearance(&self, edge: &NetworkEdge) -> EdgeAppearance {
        let dimmed = !self.highlighted.is_empty()
            && !self.is_emphasized(&edge.source)
            && !self.is_emphasized(&edge.target);
        EdgeAppearance {
            width: theme::edge_width(edge.weight),
            color: if dimmed {
                theme::EDGE.gamma_multiply(theme::emphasis::DIM_FACTOR)
            } else {
                theme::EDGE
            },
        }
    }
}

impl Default for NetworkInteraction {
    fn default() -> Self {
        Self::new(NodeSizing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::layout::ForceLayout;
    use crate::graph::simulation::SimulationOptions;
    use crate::graph::types::{ActorCategory, NetworkData, Viewport};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn frozen(nodes: Vec<NetworkNode>) -> LayoutSimulation {
        LayoutSimulation::new(
            NetworkData::new(nodes, vec![]),
            Viewport::new(800.0, 600.0).unwrap(),
            ForceLayout::default(),
            SimulationOptions::default(),
        )
    }

    #[test]
    fn hit_inside_radius_only() {
        let nodes = vec![NetworkNode::new("a", "A", ActorCategory::Ngo).with_degree(2)];
        let bodies = vec![Body::at(Pos2::new(100.0, 100.0))];
        let sizing = NodeSizing::default();
        assert_eq!(sizing.radius(2), 12.0);

        assert_eq!(hit_test(&nodes, &bodies, &sizing, Pos2::new(100.0, 100.0)), Some(0));
        assert_eq!(hit_test(&nodes, &bodies, &sizing, Pos2::new(100.0, 112.0)), Some(0));
        assert_eq!(hit_test(&nodes, &bodies, &sizing, Pos2::new(100.0, 120.0)), None);
    }

    #[test]
    fn overlapping_nodes_resolve_to_first_in_order() {
        let nodes = vec![
            NetworkNode::new("first", "First", ActorCategory::Ngo),
            NetworkNode::new("second", "Second", ActorCategory::Ngo).with_degree(5),
        ];
        let bodies = vec![
            Body::at(Pos2::new(100.0, 100.0)),
            Body::at(Pos2::new(104.0, 100.0)),
        ];
        let hit = hit_test(&nodes, &bodies, &NodeSizing::default(), Pos2::new(102.0, 100.0));
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn click_selects_and_invokes_callback() {
        let sim = frozen(vec![
            NetworkNode::new("a", "A", ActorCategory::Government).with_position(200.0, 200.0),
            NetworkNode::new("b", "B", ActorCategory::Private).with_position(400.0, 300.0),
        ]);

        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        let mut interaction = NetworkInteraction::default()
            .on_node_click(move |id| sink.borrow_mut().push(id.to_string()));

        assert_eq!(interaction.pointer_clicked(&sim, Pos2::new(402.0, 301.0)), Some("b".into()));
        assert_eq!(interaction.selected(), Some("b"));

        // Empty space: no callback, selection kept
        assert_eq!(interaction.pointer_clicked(&sim, Pos2::new(600.0, 100.0)), None);
        assert_eq!(interaction.selected(), Some("b"));

        assert_eq!(*clicks.borrow(), vec!["b".to_string()]);
    }

    #[test]
    fn hover_follows_pointer() {
        let sim = frozen(vec![
            NetworkNode::new("a", "A", ActorCategory::Academic).with_position(200.0, 200.0),
        ]);
        let mut interaction = NetworkInteraction::default();

        assert_eq!(interaction.pointer_moved(&sim, Pos2::new(205.0, 200.0)), Some("a"));
        assert_eq!(interaction.pointer_moved(&sim, Pos2::new(300.0, 200.0)), None);

        interaction.pointer_moved(&sim, Pos2::new(200.0, 200.0));
        interaction.pointer_left();
        assert_eq!(interaction.hovered(), None);
    }

    #[test]
    fn highlight_dims_everything_else() {
        let a = NetworkNode::new("a", "A", ActorCategory::Community);
        let b = NetworkNode::new("b", "B", ActorCategory::Community).with_degree(3);
        let mut interaction = NetworkInteraction::default();

        // No highlight set: nothing is dimmed
        assert_eq!(interaction.appearance(&b).fill, ActorCategory::Community.color());

        interaction.set_highlighted(["a".to_string()].into());
        assert!(interaction.is_highlighted("a"));
        assert_eq!(interaction.appearance(&a).fill, ActorCategory::Community.color());
        assert_ne!(interaction.appearance(&b).fill, ActorCategory::Community.color());
        assert_eq!(interaction.appearance(&b).radius, 14.0);
        assert_eq!(interaction.appearance(&b).outline, None);
    }

    #[test]
    fn edges_off_the_highlight_are_dimmed() {
        let mut interaction = NetworkInteraction::default();
        let touching = NetworkEdge::new("a", "b", 2.0);
        let elsewhere = NetworkEdge::new("b", "c", 0.1);

        assert_eq!(interaction.edge_appearance(&elsewhere).color, theme::EDGE);

        interaction.set_highlighted(["a".to_string()].into());
        let near = interaction.edge_appearance(&touching);
        let far = interaction.edge_appearance(&elsewhere);
        assert_eq!(near.color, theme::EDGE);
        assert_eq!(near.width, 3.0);
        assert_ne!(far.color, theme::EDGE);
        assert_eq!(far.width, 0.5);
    }
}
