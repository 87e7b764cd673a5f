//! Neighbor selection
//!
//! Classifies the nodes and edges one hop away from a node. Besides the plain
//! neighbor lists it reports what an exclusion set filtered out, which is how
//! the ripple engine notices two wavefronts touching.

use std::collections::HashSet;

use netripple_core::{EdgeKey, NetworkIndex, NodeKey};
use serde::{Deserialize, Serialize};

/// Which edges a traversal may follow out of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Incoming and outgoing edges
    #[default]
    Both,
    /// Outgoing edges only (`node.out`)
    Out,
    /// Incoming edges only (`node.in`)
    In,
}

impl FlowDirection {
    pub fn includes_in(self) -> bool {
        matches!(self, Self::Both | Self::In)
    }

    pub fn includes_out(self) -> bool {
        matches!(self, Self::Both | Self::Out)
    }
}

/// Options for [`neighbors`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborOptions<'a> {
    /// Nodes to leave out of the neighbor list
    pub exclude: Option<&'a HashSet<NodeKey>>,
    pub flow: FlowDirection,
    /// Surface a self-loop as a neighboring edge
    pub include_edge_for_circular_reference: bool,
    /// Record which excluded nodes were touched
    pub include_excluded_nodes: bool,
    /// Report edges that lead to an excluded node in `edge_to_exclusion`
    pub include_edge_to_excluded_node: bool,
}

impl<'a> NeighborOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding(mut self, exclude: &'a HashSet<NodeKey>) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_flow(mut self, flow: FlowDirection) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_circular_edges(mut self) -> Self {
        self.include_edge_for_circular_reference = true;
        self
    }

    pub fn with_excluded_nodes(mut self) -> Self {
        self.include_excluded_nodes = true;
        self
    }

    pub fn with_edges_to_excluded(mut self) -> Self {
        self.include_edge_to_excluded_node = true;
        self
    }
}

/// Outcome of a neighbor query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Neighbor nodes, one entry per connecting edge
    pub nodes: Vec<NodeKey>,
    /// The edges leading to `nodes`, plus any surfaced self-loop
    pub edges: Vec<EdgeKey>,
    /// Excluded nodes that were touched, when requested
    pub excluded: Option<HashSet<NodeKey>>,
    /// Edges leading to excluded nodes, when requested
    pub edge_to_exclusion: Option<Vec<EdgeKey>>,
}

/// Gather the neighbors of `node`
///
/// `node.in` is always scanned before `node.out`. A self-loop never produces
/// a neighbor node; when both directions are scanned it is surfaced once,
/// from the incoming pass. An unknown key has no neighbors.
pub fn neighbors<N, E>(
    network: &NetworkIndex<N, E>,
    node: NodeKey,
    options: &NeighborOptions<'_>,
) -> Neighbors {
    let mut result = Neighbors {
        excluded: options.include_excluded_nodes.then(HashSet::new),
        edge_to_exclusion: options.include_edge_to_excluded_node.then(Vec::new),
        ..Default::default()
    };

    let Some(target) = network.node(node) else {
        return result;
    };

    let include_in = options.flow.includes_in();
    let include_out = options.flow.includes_out();

    let passes = [
        (include_in, target.incoming(), true),
        (include_out, target.outgoing(), false),
    ];

    for (enabled, list, incoming) in passes {
        if !enabled {
            continue;
        }

        for &key in list {
            let Some(edge) = network.edge(key) else {
                continue;
            };

            if edge.is_circular() {
                // The incoming pass already saw it
                let seen = !incoming && include_in;
                if options.include_edge_for_circular_reference && !seen {
                    result.edges.push(key);
                }
                continue;
            }

            let other = if incoming { edge.a() } else { edge.b() };
            let excluded = options
                .exclude
                .map(|set| set.contains(&other))
                .unwrap_or(false);

            if !excluded {
                result.nodes.push(other);
                result.edges.push(key);
                continue;
            }

            if let Some(touched) = result.excluded.as_mut() {
                touched.insert(other);
            }
            if let Some(to_exclusion) = result.edge_to_exclusion.as_mut() {
                to_exclusion.push(key);
            }
        }
    }

    result
}
