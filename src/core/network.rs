//! core::network
//!
//! Mention network representation and construction.
//!
//! # Architecture
//!
//! The mention network is a directed graph where:
//! - Nodes are user handles (authors and mention targets)
//! - An edge `a -> b` means a post authored by `a` mentioned `b`
//! - Edge weight counts mention occurrences
//!
//! The network is built fresh from a post sequence on every run and held in
//! memory. It is backed by a `petgraph` `DiGraph` plus a handle index.
//!
//! # Policies
//!
//! - [`CollapsePolicy::Weighted`] merges repeated (author, target) pairs into
//!   one edge whose weight is the occurrence count and whose `posts` lists
//!   the contributing post ids once each, in first-seen order.
//! - [`CollapsePolicy::Multigraph`] keeps one weight-1 edge per occurrence.
//! - [`SelfLoopPolicy::Keep`] turns a self-mention into a self-loop;
//!   [`SelfLoopPolicy::Drop`] ignores it (the author is still a node).
//!
//! Every occurrence in a post's `mentions` list counts. Handles match by
//! exact string; no normalization happens here.
//!
//! # Invariants
//!
//! - Every edge's source and target are nodes of the network
//! - Node set, edge set, and weights do not depend on post order

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use super::types::{Handle, Post, PostId};

/// How repeated (author, target) pairs are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsePolicy {
    /// One edge per ordered pair, weight = occurrence count
    #[default]
    Weighted,
    /// One weight-1 edge per occurrence
    Multigraph,
}

impl CollapsePolicy {
    /// Valid policy names, for help text and validation.
    pub const NAMES: &'static [&'static str] = &["weighted", "multigraph"];
}

impl fmt::Display for CollapsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollapsePolicy::Weighted => write!(f, "weighted"),
            CollapsePolicy::Multigraph => write!(f, "multigraph"),
        }
    }
}

impl FromStr for CollapsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(CollapsePolicy::Weighted),
            "multigraph" => Ok(CollapsePolicy::Multigraph),
            other => Err(format!(
                "invalid collapse policy '{}', must be one of: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// What happens when an author mentions themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfLoopPolicy {
    /// Record a self-loop edge
    #[default]
    Keep,
    /// Ignore the self-mention
    Drop,
}

impl SelfLoopPolicy {
    /// Valid policy names, for help text and validation.
    pub const NAMES: &'static [&'static str] = &["keep", "drop"];
}

impl fmt::Display for SelfLoopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfLoopPolicy::Keep => write!(f, "keep"),
            SelfLoopPolicy::Drop => write!(f, "drop"),
        }
    }
}

impl FromStr for SelfLoopPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(SelfLoopPolicy::Keep),
            "drop" => Ok(SelfLoopPolicy::Drop),
            other => Err(format!(
                "invalid self-loop policy '{}', must be one of: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Options applied to a single network build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub collapse: CollapsePolicy,
    pub self_loops: SelfLoopPolicy,
}

/// Edge payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEdge {
    /// Number of mention occurrences this edge stands for
    pub weight: u64,
    /// Contributing posts, each listed once
    pub posts: Vec<PostId>,
}

/// A borrowed view of one edge, for serializers and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub source: &'a Handle,
    pub target: &'a Handle,
    pub weight: u64,
    pub posts: &'a [PostId],
}

/// The mention network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: DiGraph<Handle, MentionEdge>,
    index: HashMap<Handle, NodeIndex>,
    collapse: CollapsePolicy,
}

impl Network {
    /// Create an empty network with the given collapse policy.
    pub fn new(collapse: CollapsePolicy) -> Self {
        Self {
            collapse,
            ..Self::default()
        }
    }

    /// The collapse policy this network was built with.
    pub fn collapse(&self) -> CollapsePolicy {
        self.collapse
    }

    /// Add a node if it is not already present.
    pub fn add_node(&mut self, handle: Handle) -> NodeIndex {
        if let Some(&idx) = self.index.get(&handle) {
            return idx;
        }
        let idx = self.graph.add_node(handle.clone());
        self.index.insert(handle, idx);
        idx
    }

    /// Record a single mention occurrence `source -> target` from `post`.
    ///
    /// Both endpoints are added as nodes.
    pub fn record_mention(&mut self, source: &Handle, target: &Handle, post: &PostId) {
        self.insert_edge(source.clone(), target.clone(), 1, vec![post.clone()]);
    }

    /// Insert an edge with an explicit weight and post list.
    ///
    /// Under the weighted policy an existing `source -> target` edge absorbs
    /// the weight and any posts it does not list yet. Under the multigraph
    /// policy a new parallel edge is always added.
    pub fn insert_edge(&mut self, source: Handle, target: Handle, weight: u64, posts: Vec<PostId>) {
        let from = self.add_node(source);
        let to = self.add_node(target);

        if self.collapse == CollapsePolicy::Weighted {
            if let Some(edge) = self.graph.find_edge(from, to) {
                let existing = &mut self.graph[edge];
                existing.weight = existing.weight.saturating_add(weight);
                for post in posts {
                    if !existing.posts.contains(&post) {
                        existing.posts.push(post);
                    }
                }
                return;
            }
        }

        let mut unique = Vec::with_capacity(posts.len());
        for post in posts {
            if !unique.contains(&post) {
                unique.push(post);
            }
        }
        self.graph.add_edge(
            from,
            to,
            MentionEdge {
                weight,
                posts: unique,
            },
        );
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges (parallel edges counted separately).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> u64 {
        self.graph.edge_references().map(|e| e.weight().weight).sum()
    }

    /// Check whether a handle is a node.
    pub fn contains(&self, handle: &Handle) -> bool {
        self.index.contains_key(handle)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Handle> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(move |e| EdgeView {
            source: &self.graph[e.source()],
            target: &self.graph[e.target()],
            weight: e.weight().weight,
            posts: &e.weight().posts,
        })
    }

    /// Total weight from `source` to `target`, summed over parallel edges.
    ///
    /// Returns 0 when there is no such edge.
    pub fn edge_weight(&self, source: &Handle, target: &Handle) -> u64 {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(target)) else {
            return 0;
        };
        self.graph
            .edges_directed(from, Direction::Outgoing)
            .filter(|e| e.target() == to)
            .map(|e| e.weight().weight)
            .sum()
    }

    /// Weighted degree (in + out). A self-loop counts twice.
    pub fn weighted_degree(&self, handle: &Handle) -> u64 {
        let Some(&idx) = self.index.get(handle) else {
            return 0;
        };
        let out: u64 = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight().weight)
            .sum();
        let inc: u64 = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight().weight)
            .sum();
        out + inc
    }

    /// Distinct handles this handle mentioned.
    pub fn successors(&self, handle: &Handle) -> Vec<&Handle> {
        self.neighbors(handle, Direction::Outgoing)
    }

    /// Distinct handles that mentioned this handle.
    pub fn predecessors(&self, handle: &Handle) -> Vec<&Handle> {
        self.neighbors(handle, Direction::Incoming)
    }

    fn neighbors(&self, handle: &Handle, dir: Direction) -> Vec<&Handle> {
        let Some(&idx) = self.index.get(handle) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut result: Vec<&Handle> = self
            .graph
            .neighbors_directed(idx, dir)
            .filter(|n| seen.insert(*n))
            .map(|n| &self.graph[n])
            .collect();
        result.sort();
        result
    }

    /// The `n` heaviest edges, ties broken by source then target.
    pub fn top_edges(&self, n: usize) -> Vec<EdgeView<'_>> {
        let mut edges: Vec<EdgeView<'_>> = self.edges().collect();
        edges.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then_with(|| a.source.cmp(b.source))
                .then_with(|| a.target.cmp(b.target))
        });
        edges.truncate(n);
        edges
    }

    /// Weight per ordered pair, summed over parallel edges.
    ///
    /// Sorted, so two networks can be compared regardless of insertion order.
    pub fn pair_weights(&self) -> BTreeMap<(Handle, Handle), u64> {
        let mut weights = BTreeMap::new();
        for edge in self.edges() {
            *weights
                .entry((edge.source.clone(), edge.target.clone()))
                .or_insert(0) += edge.weight;
        }
        weights
    }

    /// Sorted node handles.
    pub fn sorted_nodes(&self) -> Vec<&Handle> {
        let mut nodes: Vec<&Handle> = self.nodes().collect();
        nodes.sort();
        nodes
    }

    /// The induced subgraph over `keep`, same collapse policy.
    pub fn subgraph(&self, keep: &HashSet<Handle>) -> Network {
        let mut sub = Network::new(self.collapse);
        for node in self.nodes().filter(|h| keep.contains(*h)) {
            sub.add_node(node.clone());
        }
        for edge in self.edges() {
            if keep.contains(edge.source) && keep.contains(edge.target) {
                sub.insert_edge(
                    edge.source.clone(),
                    edge.target.clone(),
                    edge.weight,
                    edge.posts.to_vec(),
                );
            }
        }
        sub
    }
}

/// Builds a [`Network`] from posts.
///
/// # Example
///
/// ```
/// use chirpgraph::core::network::{BuildOptions, NetworkBuilder};
/// use chirpgraph::core::types::{Handle, Post, PostId};
///
/// let a = Handle::new("a").unwrap();
/// let b = Handle::new("b").unwrap();
/// let c = Handle::new("c").unwrap();
/// let post = Post::new(PostId::new("1").unwrap(), a.clone(), "hi @b @c")
///     .with_mentions(vec![b.clone(), c.clone()]);
///
/// let network = NetworkBuilder::new(BuildOptions::default()).build(&[post]);
/// assert_eq!(network.node_count(), 3);
/// assert_eq!(network.edge_weight(&a, &b), 1);
/// assert_eq!(network.edge_weight(&a, &c), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkBuilder {
    options: BuildOptions,
}

impl NetworkBuilder {
    /// Create a builder with the given options.
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// The options this builder applies.
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Build a network in one pass over `posts`.
    ///
    /// Never fails: an empty input yields an empty network.
    pub fn build<'a, I>(&self, posts: I) -> Network
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut network = Network::new(self.options.collapse);

        for post in posts {
            network.add_node(post.author.clone());

            for target in &post.mentions {
                if *target == post.author && self.options.self_loops == SelfLoopPolicy::Drop {
                    continue;
                }
                network.record_mention(&post.author, target, &post.id);
            }
        }

        network
    }
}

/// Convenience wrapper around [`NetworkBuilder::build`].
pub fn build_network(posts: &[Post], options: BuildOptions) -> Network {
    NetworkBuilder::new(options).build(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(name: &str) -> Handle {
        Handle::new(name).unwrap()
    }

    fn post(id: &str, author: &str, mentions: &[&str]) -> Post {
        Post::new(PostId::new(id).unwrap(), h(author), "")
            .with_mentions(mentions.iter().map(|m| h(m)).collect())
    }

    fn weighted() -> BuildOptions {
        BuildOptions::default()
    }

    fn multigraph() -> BuildOptions {
        BuildOptions {
            collapse: CollapsePolicy::Multigraph,
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_network() {
        let network = build_network(&[], weighted());
        assert!(network.is_empty());
        assert_eq!(network.node_count(), 0);
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn single_post_two_mentions() {
        let network = build_network(&[post("1", "a", &["b", "c"])], weighted());

        assert_eq!(network.sorted_nodes(), vec![&h("a"), &h("b"), &h("c")]);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.edge_weight(&h("a"), &h("b")), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("c")), 1);
    }

    #[test]
    fn repeated_pair_collapses_to_weight() {
        let posts = [post("1", "a", &["b"]), post("2", "a", &["b"])];
        let network = build_network(&posts, weighted());

        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("b")), 2);
        let edge = network.edges().next().unwrap();
        assert_eq!(edge.posts, &[PostId::new("1").unwrap(), PostId::new("2").unwrap()]);
    }

    #[test]
    fn repeated_pair_multigraph_keeps_parallel_edges() {
        let posts = [post("1", "a", &["b"]), post("2", "a", &["b"])];
        let network = build_network(&posts, multigraph());

        assert_eq!(network.edge_count(), 2);
        assert!(network.edges().all(|e| e.weight == 1));
        assert_eq!(network.edge_weight(&h("a"), &h("b")), 2);
    }

    #[test]
    fn duplicate_mention_within_post_counts_each_occurrence() {
        let network = build_network(&[post("1", "a", &["b", "b"])], weighted());

        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("b")), 2);
        // The post is listed once.
        assert_eq!(network.edges().next().unwrap().posts.len(), 1);
    }

    #[test]
    fn author_without_mentions_is_isolated() {
        let network = build_network(&[post("1", "a", &[])], weighted());

        assert_eq!(network.node_count(), 1);
        assert!(network.contains(&h("a")));
        assert_eq!(network.edge_count(), 0);
        assert_eq!(network.weighted_degree(&h("a")), 0);
    }

    #[test]
    fn self_mention_kept_as_loop() {
        let network = build_network(&[post("1", "a", &["a"])], weighted());

        assert_eq!(network.node_count(), 1);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("a")), 1);
    }

    #[test]
    fn self_mention_dropped_by_policy() {
        let options = BuildOptions {
            self_loops: SelfLoopPolicy::Drop,
            ..Default::default()
        };
        let network = build_network(&[post("1", "a", &["a", "b"])], options);

        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("a")), 0);
    }

    #[test]
    fn handles_match_exactly() {
        let network = build_network(&[post("1", "a", &["B", "b"])], weighted());
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn every_edge_endpoint_is_a_node() {
        let posts = [
            post("1", "a", &["b", "c"]),
            post("2", "b", &["c", "d"]),
            post("3", "e", &[]),
        ];
        let network = build_network(&posts, weighted());
        for edge in network.edges() {
            assert!(network.contains(edge.source));
            assert!(network.contains(edge.target));
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let posts = [post("1", "a", &["b"]), post("2", "b", &["a", "c"])];
        let first = build_network(&posts, weighted());
        let second = build_network(&posts, weighted());

        assert_eq!(first.sorted_nodes(), second.sorted_nodes());
        assert_eq!(first.pair_weights(), second.pair_weights());
    }

    #[test]
    fn post_order_does_not_matter() {
        let forward = [post("1", "a", &["b"]), post("2", "c", &["a"]), post("3", "a", &["b"])];
        let mut reversed = forward.clone();
        reversed.reverse();

        let x = build_network(&forward, weighted());
        let y = build_network(&reversed, weighted());
        assert_eq!(x.sorted_nodes(), y.sorted_nodes());
        assert_eq!(x.pair_weights(), y.pair_weights());
    }

    #[test]
    fn weighted_degree_counts_both_directions() {
        let posts = [post("1", "a", &["b"]), post("2", "b", &["a"]), post("3", "c", &["a"])];
        let network = build_network(&posts, weighted());
        assert_eq!(network.weighted_degree(&h("a")), 3);
        assert_eq!(network.weighted_degree(&h("c")), 1);
        assert_eq!(network.weighted_degree(&h("missing")), 0);
    }

    #[test]
    fn neighbors_are_distinct_and_sorted() {
        let posts = [post("1", "a", &["c", "b"]), post("2", "a", &["b"])];
        let network = build_network(&posts, multigraph());
        assert_eq!(network.successors(&h("a")), vec![&h("b"), &h("c")]);
        assert_eq!(network.predecessors(&h("b")), vec![&h("a")]);
    }

    #[test]
    fn top_edges_ordered_by_weight_then_name() {
        let posts = [
            post("1", "a", &["b"]),
            post("2", "a", &["b"]),
            post("3", "z", &["y"]),
            post("4", "c", &["d"]),
        ];
        let network = build_network(&posts, weighted());
        let top: Vec<(String, String, u64)> = network
            .top_edges(2)
            .into_iter()
            .map(|e| (e.source.to_string(), e.target.to_string(), e.weight))
            .collect();
        assert_eq!(
            top,
            vec![("a".into(), "b".into(), 2), ("c".into(), "d".into(), 1)]
        );
    }

    #[test]
    fn subgraph_keeps_only_internal_edges() {
        let posts = [post("1", "a", &["b", "c"])];
        let network = build_network(&posts, weighted());
        let keep: HashSet<Handle> = [h("a"), h("b")].into_iter().collect();

        let sub = network.subgraph(&keep);
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.edge_weight(&h("a"), &h("b")), 1);
    }

    #[test]
    fn insert_edge_merges_under_weighted_policy() {
        let mut network = Network::new(CollapsePolicy::Weighted);
        let p1 = PostId::new("1").unwrap();
        network.insert_edge(h("a"), h("b"), 3, vec![p1.clone()]);
        network.insert_edge(h("a"), h("b"), 2, vec![p1]);

        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.edge_weight(&h("a"), &h("b")), 5);
        assert_eq!(network.edges().next().unwrap().posts.len(), 1);
        assert_eq!(network.total_weight(), 5);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("multigraph".parse::<CollapsePolicy>(), Ok(CollapsePolicy::Multigraph));
        assert_eq!("drop".parse::<SelfLoopPolicy>(), Ok(SelfLoopPolicy::Drop));
        assert!("sideways".parse::<CollapsePolicy>().is_err());
    }
}
