//! export::json
//!
//! Node-link JSON:
//!
//! ```json
//! {
//!   "directed": true,
//!   "multigraph": false,
//!   "nodes": [{"id": "alice"}, {"id": "bob"}],
//!   "links": [{"source": "alice", "target": "bob", "weight": 2, "posts": ["1", "7"]}]
//! }
//! ```
//!
//! `multigraph` records the collapse policy. Readers reject links that
//! reference undeclared nodes and links with zero weight.

use std::collections::HashSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::core::network::{CollapsePolicy, Network};
use crate::core::types::{Handle, PostId};

/// Serialized form of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

/// A serialized node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
}

/// A serialized edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight")]
    pub weight: u64,
    #[serde(default)]
    pub posts: Vec<String>,
}

fn default_weight() -> u64 {
    1
}

/// Convert a network to its node-link form.
///
/// Nodes are sorted; links keep insertion order so parallel edges stay
/// distinguishable.
pub fn to_node_link(network: &Network) -> NodeLinkGraph {
    NodeLinkGraph {
        directed: true,
        multigraph: network.collapse() == CollapsePolicy::Multigraph,
        nodes: network
            .sorted_nodes()
            .into_iter()
            .map(|h| NodeRecord { id: h.to_string() })
            .collect(),
        links: network
            .edges()
            .map(|e| LinkRecord {
                source: e.source.to_string(),
                target: e.target.to_string(),
                weight: e.weight,
                posts: e.posts.iter().map(|p| p.to_string()).collect(),
            })
            .collect(),
    }
}

/// Rebuild a network from its node-link form.
pub fn from_node_link(graph: NodeLinkGraph) -> Result<Network, ExportError> {
    if !graph.directed {
        return Err(ExportError::Undirected);
    }
    let collapse = if graph.multigraph {
        CollapsePolicy::Multigraph
    } else {
        CollapsePolicy::Weighted
    };

    let mut network = Network::new(collapse);
    let mut declared = HashSet::new();
    for node in graph.nodes {
        let handle = Handle::new(node.id)?;
        declared.insert(handle.clone());
        network.add_node(handle);
    }

    for link in graph.links {
        let source = Handle::new(link.source)?;
        let target = Handle::new(link.target)?;
        for endpoint in [&source, &target] {
            if !declared.contains(endpoint) {
                return Err(ExportError::UnknownNode(endpoint.to_string()));
            }
        }
        if link.weight == 0 {
            return Err(ExportError::InvalidWeight {
                from: source.to_string(),
                to: target.to_string(),
            });
        }
        let posts = link
            .posts
            .into_iter()
            .filter_map(|p| PostId::new(p).ok())
            .collect();
        network.insert_edge(source, target, link.weight, posts);
    }

    Ok(network)
}

/// Serialize a network to a pretty-printed JSON string.
pub fn to_json(network: &Network) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&to_node_link(network))?)
}

/// Parse a network from a JSON string.
pub fn from_json(json: &str) -> Result<Network, ExportError> {
    from_node_link(serde_json::from_str(json)?)
}

/// Write a network as JSON.
pub fn write_json<W: Write>(network: &Network, mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, &to_node_link(network))?;
    writeln!(out)?;
    Ok(())
}

/// Read a network from JSON.
pub fn read_json<R: Read>(input: R) -> Result<Network, ExportError> {
    from_node_link(serde_json::from_reader(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::{build_network, BuildOptions};
    use crate::core::types::Post;

    fn h(s: &str) -> Handle {
        Handle::new(s).unwrap()
    }

    fn mention_posts() -> Vec<Post> {
        vec![
            Post::new(PostId::new("1").unwrap(), h("a"), "").with_mentions(vec![h("b"), h("c")]),
            Post::new(PostId::new("2").unwrap(), h("a"), "").with_mentions(vec![h("b")]),
            Post::new(PostId::new("3").unwrap(), h("d"), ""),
        ]
    }

    #[test]
    fn weighted_round_trip_keeps_weights_and_posts() {
        let network = build_network(&mention_posts(), BuildOptions::default());
        let loaded = from_json(&to_json(&network).unwrap()).unwrap();

        assert_eq!(loaded.collapse(), CollapsePolicy::Weighted);
        assert_eq!(loaded.pair_weights(), network.pair_weights());
        assert_eq!(loaded.sorted_nodes(), network.sorted_nodes());
        let ab = loaded.edges().find(|e| e.target.as_str() == "b").unwrap();
        let ids: Vec<&str> = ab.posts.iter().map(|p| p.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn multigraph_round_trip_keeps_parallel_edges() {
        let options = BuildOptions {
            collapse: CollapsePolicy::Multigraph,
            ..Default::default()
        };
        let network = build_network(&mention_posts(), options);
        let loaded = from_json(&to_json(&network).unwrap()).unwrap();

        assert_eq!(loaded.collapse(), CollapsePolicy::Multigraph);
        assert_eq!(loaded.edge_count(), 3);
        assert_eq!(loaded.edge_weight(&h("a"), &h("b")), 2);
    }

    #[test]
    fn isolated_nodes_survive() {
        let network = build_network(&mention_posts(), BuildOptions::default());
        let loaded = from_json(&to_json(&network).unwrap()).unwrap();
        assert!(loaded.contains(&h("d")));
        assert_eq!(loaded.weighted_degree(&h("d")), 0);
    }

    #[test]
    fn empty_network_round_trips() {
        let network = Network::new(CollapsePolicy::Weighted);
        let json = to_json(&network).unwrap();
        assert!(from_json(&json).unwrap().is_empty());
    }

    #[test]
    fn rejects_undeclared_nodes() {
        let json = r#"{"directed": true, "multigraph": false,
            "nodes": [{"id": "a"}],
            "links": [{"source": "a", "target": "ghost", "weight": 1}]}"#;
        assert!(matches!(from_json(json), Err(ExportError::UnknownNode(n)) if n == "ghost"));
    }

    #[test]
    fn rejects_zero_weight() {
        let json = r#"{"directed": true, "multigraph": false,
            "nodes": [{"id": "a"}, {"id": "b"}],
            "links": [{"source": "a", "target": "b", "weight": 0}]}"#;
        assert!(matches!(from_json(json), Err(ExportError::InvalidWeight { .. })));
    }

    #[test]
    fn rejects_undirected() {
        let json = r#"{"directed": false, "multigraph": false, "nodes": [], "links": []}"#;
        assert!(matches!(from_json(json), Err(ExportError::Undirected)));
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let json = r#"{"directed": true, "multigraph": false,
            "nodes": [{"id": "a"}, {"id": "b"}],
            "links": [{"source": "a", "target": "b"}]}"#;
        assert_eq!(from_json(json).unwrap().edge_weight(&h("a"), &h("b")), 1);
    }
}
