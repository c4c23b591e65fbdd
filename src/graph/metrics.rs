//! Degree and centrality scores for graphs supplied without them.
//!
//! The simulator never calls this; it is an upstream helper for hosts (and
//! the CLI) that load bare node/edge lists.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::VecDeque;

use super::types::NetworkData;

/// Per-node scores, in node order
#[derive(Debug, Clone, PartialEq)]
pub struct CentralityScores {
    pub degree: Vec<u32>,
    /// Normalised to [0, 1] by the number of pairs not involving the node
    pub betweenness: Vec<f32>,
    /// Reachable nodes divided by the summed hop distance to them
    pub closeness: Vec<f32>,
}

/// Compute degree, betweenness and closeness.
///
/// Edges with a missing endpoint are ignored. Degree counts every incident
/// edge (a self-loop once); centrality treats the graph as simple and
/// unweighted.
pub fn centrality(data: &NetworkData) -> CentralityScores {
    let n = data.nodes.len();
    let index = data.node_index();

    let mut graph = UnGraph::<(), ()>::with_capacity(n, data.edges.len());
    for _ in 0..n {
        graph.add_node(());
    }

    let mut degree = vec![0u32; n];
    for edge in &data.edges {
        let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) else {
            continue;
        };
        degree[s] += 1;
        if s != t {
            degree[t] += 1;
            graph.update_edge(NodeIndex::new(s), NodeIndex::new(t), ());
        }
    }

    let mut betweenness = vec![0.0f64; n];
    let mut closeness = vec![0.0f32; n];

    // Brandes: one BFS per source, then back-propagate pair dependencies
    for source in 0..n {
        let mut order = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut paths = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];
        paths[source] = 1.0;
        dist[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for w in graph.neighbors(NodeIndex::new(v)).map(|w| w.index()) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    paths[w] += paths[v];
                    preds[w].push(v);
                }
            }
        }

        let reached = dist.iter().filter(|&&d| d > 0).count();
        let total: i64 = dist.iter().filter(|&&d| d > 0).sum();
        if total > 0 {
            closeness[source] = reached as f32 / total as f32;
        }

        let mut dependency = vec![0.0f64; n];
        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                betweenness[w] += dependency[w];
            }
        }
    }

    // Each unordered pair was counted from both ends
    let pairs = if n > 2 {
        ((n - 1) * (n - 2)) as f64
    } else {
        1.0
    };
    let betweenness = betweenness
        .into_iter()
        .map(|b| if n > 2 { (b / pairs) as f32 } else { 0.0 })
        .collect();

    CentralityScores {
        degree,
        betweenness,
        closeness,
    }
}

/// Overwrite every node's degree, betweenness and closeness
pub fn compute_metrics(data: &mut NetworkData) {
    let scores = centrality(data);
    for (i, node) in data.nodes.iter_mut().enumerate() {
        node.degree = scores.degree[i];
        node.betweenness = scores.betweenness[i];
        node.closeness = scores.closeness[i];
    }
    tracing::debug!("Computed centrality for {} nodes", data.nodes.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{ActorCategory, NetworkEdge, NetworkNode};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> NetworkData {
        NetworkData::new(
            ids.iter()
                .map(|id| NetworkNode::new(*id, *id, ActorCategory::Ngo))
                .collect(),
            edges
                .iter()
                .map(|(s, t)| NetworkEdge::new(*s, *t, 1.0))
                .collect(),
        )
    }

    #[test]
    fn path_middle_carries_all_shortest_paths() {
        let scores = centrality(&graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]));

        assert_eq!(scores.degree, vec![1, 2, 1]);
        assert!((scores.betweenness[1] - 1.0).abs() < 1e-6);
        assert_eq!(scores.betweenness[0], 0.0);
        assert_eq!(scores.betweenness[2], 0.0);
        assert!((scores.closeness[1] - 1.0).abs() < 1e-6);
        assert!((scores.closeness[0] - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn star_center_and_isolated_node() {
        let scores = centrality(&graph(
            &["hub", "x", "y", "z", "alone"],
            &[("hub", "x"), ("hub", "y"), ("hub", "z")],
        ));

        assert_eq!(scores.degree, vec![3, 1, 1, 1, 0]);
        // 3 of the 6 pairs not involving the hub pass through it
        assert!((scores.betweenness[0] - 0.5).abs() < 1e-6);
        assert_eq!(scores.closeness[4], 0.0);
        assert!(scores.betweenness.iter().all(|b| (0.0..=1.0).contains(b)));
    }

    #[test]
    fn dangling_and_duplicate_edges() {
        let mut data = graph(
            &["a", "b"],
            &[("a", "b"), ("a", "b"), ("a", "ghost"), ("b", "b")],
        );
        compute_metrics(&mut data);

        assert_eq!(data.nodes[0].degree, 2);
        assert_eq!(data.nodes[1].degree, 3);
        assert_eq!(data.nodes[0].closeness, 1.0);
        assert_eq!(data.nodes[0].betweenness, 0.0);
    }

    #[test]
    fn square_splits_paths_evenly() {
        let scores = centrality(&graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
        ));
        for b in &scores.betweenness {
            assert!((b - 1.0 / 6.0).abs() < 1e-6, "{b}");
        }
    }
}
