//! render::layout
//!
//! Node selection, positions, and sizes for drawing a network.
//!
//! Large networks are unreadable as a whole, so drawings focus on the
//! best-connected handles plus their direct neighbours.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::core::network::Network;
use crate::core::types::Handle;

/// Default optimal node distance for [`spring_layout`].
pub const DEFAULT_SPRING_K: f64 = 0.7;

/// Default iteration count for [`spring_layout`].
pub const DEFAULT_ITERATIONS: usize = 50;

/// Smallest drawn node size.
pub const MIN_NODE_SIZE: u32 = 50;

/// Size of the highest-degree node.
pub const MAX_NODE_SIZE: u32 = 500;

/// Minimum distance used in force calculations.
const MIN_DISTANCE: f64 = 0.01;

/// A focused view of a network.
#[derive(Debug, Clone)]
pub struct Focus {
    /// Induced subgraph over the top handles and their neighbours
    pub subgraph: Network,
    /// The top handles, best first; only these get labels
    pub top: Vec<Handle>,
}

/// Nodes ranked by weighted degree, highest first, ties by handle.
pub fn ranked_nodes(network: &Network) -> Vec<(&Handle, u64)> {
    let mut ranked: Vec<(&Handle, u64)> = network
        .nodes()
        .map(|h| (h, network.weighted_degree(h)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}

/// The top `top_n` handles by weighted degree plus every successor and
/// predecessor of each.
pub fn focus_subgraph(network: &Network, top_n: usize) -> Focus {
    let top: Vec<Handle> = ranked_nodes(network)
        .into_iter()
        .take(top_n)
        .map(|(h, _)| h.clone())
        .collect();

    let mut keep: HashSet<Handle> = top.iter().cloned().collect();
    for handle in &top {
        keep.extend(network.successors(handle).into_iter().cloned());
        keep.extend(network.predecessors(handle).into_iter().cloned());
    }

    Focus {
        subgraph: network.subgraph(&keep),
        top,
    }
}

/// Node sizes scaled by weighted degree in `full`.
///
/// `max(MIN_NODE_SIZE, MAX_NODE_SIZE * degree / max_degree)`, where
/// `max_degree` is the highest degree in `full`.
pub fn node_sizes(full: &Network, drawn: &Network) -> BTreeMap<Handle, u32> {
    let max_degree = full
        .nodes()
        .map(|h| full.weighted_degree(h))
        .max()
        .filter(|d| *d > 0)
        .unwrap_or(1);

    drawn
        .nodes()
        .map(|h| {
            let scaled = (MAX_NODE_SIZE as u64 * full.weighted_degree(h)) / max_degree;
            let size = u32::try_from(scaled).unwrap_or(MAX_NODE_SIZE);
            (h.clone(), size.max(MIN_NODE_SIZE))
        })
        .collect()
}

/// Fruchterman-Reingold force-directed layout.
///
/// Deterministic: nodes start evenly spaced on the unit circle in sorted
/// handle order. Edges attract in both directions, weighted by the summed
/// weight between the two handles; self-loops exert no force. Positions
/// are centred and scaled into [-1, 1].
pub fn spring_layout(network: &Network, k: f64, iterations: usize) -> BTreeMap<Handle, (f64, f64)> {
    let nodes: Vec<&Handle> = network.sorted_nodes();
    let n = nodes.len();
    if n == 0 {
        return BTreeMap::new();
    }
    if n == 1 {
        return BTreeMap::from([(nodes[0].clone(), (0.0, 0.0))]);
    }

    let index: HashMap<&Handle, usize> = nodes.iter().enumerate().map(|(i, h)| (*h, i)).collect();

    let mut attraction = vec![vec![0.0_f64; n]; n];
    for edge in network.edges() {
        let (Some(&i), Some(&j)) = (index.get(edge.source), index.get(edge.target)) else {
            continue;
        };
        if i == j {
            continue;
        }
        attraction[i][j] += edge.weight as f64;
        attraction[j][i] += edge.weight as f64;
    }

    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![(0.0_f64, 0.0_f64); n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (dist * dist) - attraction[i][j] * dist / k;
                disp[i].0 += dx * force;
                disp[i].1 += dy * force;
            }
        }

        for i in 0..n {
            let (dx, dy) = disp[i];
            let len = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            pos[i].0 += dx * temperature / len;
            pos[i].1 += dy * temperature / len;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    nodes
        .into_iter()
        .cloned()
        .zip(pos)
        .collect()
}

/// Centre positions on the origin and scale the largest coordinate to 1.
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let (cx, cy) = pos
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let (cx, cy) = (cx / n, cy / n);

    let mut extent: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        extent = extent.max(p.0.abs()).max(p.1.abs());
    }
    if extent > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= extent;
            p.1 /= extent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::CollapsePolicy;

    fn h(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    /// hub mentions three spokes; one spoke mentions an outsider.
    fn star() -> Network {
        let mut net = Network::new(CollapsePolicy::Weighted);
        for spoke in ["s1", "s2", "s3"] {
            net.insert_edge(h("hub"), h(spoke), 2, Vec::new());
        }
        net.insert_edge(h("s1"), h("far"), 1, Vec::new());
        net.insert_edge(h("x"), h("y"), 1, Vec::new());
        net
    }

    #[test]
    fn ranking_orders_by_degree_then_handle() {
        let net = star();
        let ranked: Vec<(&str, u64)> = ranked_nodes(&net)
            .into_iter()
            .map(|(h, d)| (h.as_str(), d))
            .collect();
        assert_eq!(ranked[0], ("hub", 6));
        assert_eq!(ranked[1], ("s1", 3));
        assert_eq!(ranked[2], ("s2", 2));
    }

    #[test]
    fn focus_includes_neighbours_of_top_nodes() {
        let focus = focus_subgraph(&star(), 1);
        let nodes: Vec<&str> = focus
            .subgraph
            .sorted_nodes()
            .into_iter()
            .map(|h| h.as_str())
            .collect();

        assert_eq!(focus.top, vec![h("hub")]);
        assert_eq!(nodes, vec!["hub", "s1", "s2", "s3"]);
        assert_eq!(focus.subgraph.edge_count(), 3);
    }

    #[test]
    fn focus_of_empty_network_is_empty() {
        let focus = focus_subgraph(&Network::new(CollapsePolicy::Weighted), 10);
        assert!(focus.subgraph.is_empty());
        assert!(focus.top.is_empty());
    }

    #[test]
    fn sizes_scale_with_degree() {
        let mut net = star();
        net.add_node(h("lonely"));
        let sizes = node_sizes(&net, &net);
        assert_eq!(sizes[&h("hub")], MAX_NODE_SIZE);
        assert_eq!(sizes[&h("s1")], 250);
        assert_eq!(sizes[&h("far")], 83);
        assert_eq!(sizes[&h("lonely")], MIN_NODE_SIZE);
    }

    #[test]
    fn layout_is_deterministic_and_bounded() {
        let net = star();
        let first = spring_layout(&net, DEFAULT_SPRING_K, DEFAULT_ITERATIONS);
        let second = spring_layout(&net, DEFAULT_SPRING_K, DEFAULT_ITERATIONS);

        assert_eq!(first, second);
        assert_eq!(first.len(), net.node_count());
        for (x, y) in first.values() {
            assert!(x.abs() <= 1.0 + 1e-9 && y.abs() <= 1.0 + 1e-9);
            assert!(x.is_finite() && y.is_finite());
        }
    }

    #[test]
    fn single_node_sits_at_origin() {
        let mut net = Network::new(CollapsePolicy::Weighted);
        net.add_node(h("solo"));
        let layout = spring_layout(&net, DEFAULT_SPRING_K, DEFAULT_ITERATIONS);
        assert_eq!(layout[&h("solo")], (0.0, 0.0));
    }
}
