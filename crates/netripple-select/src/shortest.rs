//! Shortest paths by meeting wavefronts
//!
//! Both endpoints splash at once. The first wave in which the two wavefronts
//! collide fixes the distance between them. Every node reached before that
//! wave is labeled with its depth and the endpoint it is nearest to, so the
//! halves of all shortest paths can be expanded back from each junction
//! through every equally near predecessor.

use std::collections::HashMap;
use std::sync::Arc;

use netripple_core::{EdgeKey, ElementKey, NetworkIndex, NodeKey};
use tracing::debug;

use crate::error::{SelectError, SelectResult};
use crate::path::{join_halves, NetworkPath};
use crate::ripple::{RippleResponse, RippleSelect, SplashOptions};

/// Depth and nearest endpoint of every node the splash reached
struct Labels {
    depth_of: HashMap<NodeKey, u32>,
    source: Arc<HashMap<NodeKey, NodeKey>>,
}

impl Labels {
    fn is(&self, node: NodeKey, depth: u32, origin: NodeKey) -> bool {
        self.depth_of.get(&node) == Some(&depth) && self.source.get(&node) == Some(&origin)
    }
}

/// The first colliding wave
struct Meeting {
    depth: u32,
    nodes: Vec<NodeKey>,
    edges: Vec<EdgeKey>,
}

/// Every shortest walk from `node`, `depth` hops away, back to `origin`
///
/// Each half starts at `node` and ends at `origin`.
fn halves_to<N, E>(
    network: &NetworkIndex<N, E>,
    labels: &Labels,
    node: NodeKey,
    depth: u32,
    origin: NodeKey,
) -> Vec<Vec<ElementKey>> {
    if depth == 0 {
        return if node == origin {
            vec![vec![ElementKey::Node(node)]]
        } else {
            Vec::new()
        };
    }

    let Some(record) = network.node(node) else {
        return Vec::new();
    };

    let mut halves = Vec::new();
    for &edge in record.incoming().iter().chain(record.outgoing()) {
        let Some(previous) = network.edge(edge).and_then(|e| e.other(node)) else {
            continue;
        };
        if !labels.is(previous, depth - 1, origin) {
            continue;
        }

        for rest in halves_to(network, labels, previous, depth - 1, origin) {
            let mut half = Vec::with_capacity(rest.len() + 2);
            half.push(ElementKey::Node(node));
            half.push(ElementKey::Edge(edge));
            half.extend(rest);
            halves.push(half);
        }
    }
    halves
}

/// Every shortest path from `a` to `b`, following edges in either direction
///
/// Paths are sorted, so the result does not depend on hashing order, and
/// `shortest_paths(b, a)` returns the same paths reversed. Returns an empty
/// list when `b` cannot be reached from `a`.
pub fn shortest_paths<N, E>(
    network: &NetworkIndex<N, E>,
    a: NodeKey,
    b: NodeKey,
) -> SelectResult<Vec<NetworkPath>> {
    for node in [a, b] {
        if !network.is_live_node(node) {
            return Err(SelectError::NodeNotFound(node));
        }
    }

    if a == b {
        return Ok(vec![NetworkPath {
            nodes: vec![a],
            edges: Vec::new(),
        }]);
    }

    let options = SplashOptions::new([a, b]).with_collisions().with_source();
    let mut depth_of: HashMap<NodeKey, u32> = HashMap::new();
    let mut met: Option<(Meeting, Arc<HashMap<NodeKey, NodeKey>>)> = None;

    RippleSelect::splash_blocking(network, options, |layer| {
        for node in &layer.nodes {
            depth_of.entry(*node).or_insert(layer.depth);
        }
        if met.is_some() {
            return RippleResponse::stop();
        }

        let nodes: Vec<NodeKey> = layer
            .node_collisions
            .map(|found| found.into_keys().collect())
            .unwrap_or_default();
        let edges: Vec<EdgeKey> = layer
            .edge_collisions
            .map(|found| found.into_iter().collect())
            .unwrap_or_default();

        if nodes.is_empty() && edges.is_empty() {
            return RippleResponse::proceed();
        }

        if let Some(source) = layer.source {
            let meeting = Meeting {
                depth: layer.depth,
                nodes,
                edges,
            };
            met = Some((meeting, source));
        }
        RippleResponse::stop()
    })?;

    let Some((meeting, source)) = met else {
        debug!("No path between {} and {}", a, b);
        return Ok(Vec::new());
    };
    let labels = Labels { depth_of, source };
    let depth = meeting.depth;
    let mut paths: Vec<NetworkPath> = Vec::new();

    // An edge crossing at depth d is one hop shorter than a node meeting at d
    if meeting.edges.is_empty() {
        for node in meeting.nodes {
            let toward_a = halves_to(network, &labels, node, depth, a);
            let toward_b = halves_to(network, &labels, node, depth, b);
            for half_a in &toward_a {
                for half_b in &toward_b {
                    paths.push(join_halves(half_a, half_b));
                }
            }
        }
    } else {
        for edge in meeting.edges {
            let Some((x, y)) = network.edge(edge).map(|e| (e.a(), e.b())) else {
                continue;
            };
            let (near_a, near_b) = if labels.source.get(&x) == Some(&a) {
                (x, y)
            } else {
                (y, x)
            };

            let crossing = |near: NodeKey, origin: NodeKey| -> Vec<Vec<ElementKey>> {
                halves_to(network, &labels, near, depth - 1, origin)
                    .into_iter()
                    .map(|rest| {
                        let mut half = vec![ElementKey::Edge(edge)];
                        half.extend(rest);
                        half
                    })
                    .collect()
            };
            let toward_a = crossing(near_a, a);
            let toward_b = crossing(near_b, b);
            for half_a in &toward_a {
                for half_b in &toward_b {
                    paths.push(join_halves(half_a, half_b));
                }
            }
        }
    }

    paths.sort();
    paths.dedup();

    debug!(
        "Found {} shortest paths between {} and {}",
        paths.len(),
        a,
        b
    );

    Ok(paths)
}
