//! Path replay over reverse-parent maps

use std::collections::{HashMap, HashSet};

use netripple_core::{EdgeKey, ElementKey, NetworkIndex, NodeKey};
use tracing::warn;

/// Node to the node that discovered it. Origins have no entry.
pub type ReversePathMap = HashMap<NodeKey, NodeKey>;

/// The element two wavefronts met at
pub type Collision = ElementKey;

/// How connecting edges are resolved while replaying a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeLookup {
    /// Probe the adjacency index in both directions
    #[default]
    Indexed,
    /// Scan the node's incoming and outgoing lists
    Scan,
}

fn connecting_edge<N, E>(
    network: &NetworkIndex<N, E>,
    a: NodeKey,
    b: NodeKey,
    lookup: EdgeLookup,
) -> Option<EdgeKey> {
    match lookup {
        EdgeLookup::Indexed => network.get_edge(a, b),
        EdgeLookup::Scan => network.find_edge_scan(a, b),
    }
}

/// Walk from `start` back to its origin through `path`
///
/// Nodes and edges are reported alternately with one step counter starting
/// at 0: `start` is step 0, the edge to its parent step 1, and so on until a
/// node without a parent. Returns `false` when the walk was abandoned because
/// two consecutive nodes have no connecting edge or the map loops.
pub fn travel_path<N, E, FN, FE>(
    network: &NetworkIndex<N, E>,
    start: NodeKey,
    path: &ReversePathMap,
    mut on_node: FN,
    mut on_edge: FE,
    lookup: EdgeLookup,
) -> bool
where
    FN: FnMut(NodeKey, usize),
    FE: FnMut(EdgeKey, usize),
{
    let mut step = 0;
    let mut seen = HashSet::new();
    let mut current = start;

    loop {
        if !seen.insert(current) {
            warn!("Reverse path from {} loops back through {}", start, current);
            return false;
        }

        on_node(current, step);
        step += 1;

        let Some(&parent) = path.get(&current) else {
            return true;
        };

        let Some(edge) = connecting_edge(network, parent, current, lookup) else {
            warn!(
                "Traveled a path with no connecting edge between {} and {}",
                parent, current
            );
            return false;
        };

        on_edge(edge, step);
        step += 1;
        current = parent;
    }
}

/// Walk every predecessor path of a collision back to its origin
///
/// For a node collision each of `sources` starts its own path: the collision
/// node is step 0, the edge from the source step 1, then the source's own
/// path. For an edge collision `sources` is ignored and the edge's two
/// endpoints are used; the edge is step 0. Callbacks receive
/// `(element, step, path_index)`. Returns whether each path reached its origin.
pub fn travel_collision_path<N, E, FN, FE>(
    network: &NetworkIndex<N, E>,
    collision: Collision,
    sources: &[NodeKey],
    path: &ReversePathMap,
    mut on_node: FN,
    mut on_edge: FE,
    lookup: EdgeLookup,
) -> Vec<bool>
where
    FN: FnMut(NodeKey, usize, usize),
    FE: FnMut(EdgeKey, usize, usize),
{
    let sources = match collision {
        ElementKey::Node(_) => sources.to_vec(),
        ElementKey::Edge(key) => match network.edge(key) {
            Some(edge) => vec![edge.a(), edge.b()],
            None => {
                warn!("Edge collision {} is not stored in the network", key);
                return Vec::new();
            }
        },
    };

    let mut completed = Vec::with_capacity(sources.len());

    for (index, &source) in sources.iter().enumerate() {
        let offset = match collision {
            ElementKey::Node(node) => {
                on_node(node, 0, index);
                let Some(edge) = connecting_edge(network, source, node, lookup) else {
                    warn!(
                        "No edge from collision source {} to the collision at {}",
                        source, node
                    );
                    completed.push(false);
                    continue;
                };
                on_edge(edge, 1, index);
                2
            }
            ElementKey::Edge(edge) => {
                on_edge(edge, 0, index);
                1
            }
        };

        completed.push(travel_path(
            network,
            source,
            path,
            |node, step| on_node(node, offset + step, index),
            |edge, step| on_edge(edge, offset + step, index),
            lookup,
        ));
    }

    completed
}

/// An ordered walk through the network
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct NetworkPath {
    pub nodes: Vec<NodeKey>,
    /// `edges[i]` connects `nodes[i]` and `nodes[i + 1]`
    pub edges: Vec<EdgeKey>,
}

impl NetworkPath {
    /// Number of hops
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Join a half ending at `a` with a half ending at `b` into an a→b path
pub(crate) fn join_halves(toward_a: &[ElementKey], toward_b: &[ElementKey]) -> NetworkPath {
    let mut path = NetworkPath::default();
    let joined = toward_a.iter().rev().chain(toward_b.iter().skip(1));

    for element in joined {
        match *element {
            ElementKey::Node(node) => path.nodes.push(node),
            ElementKey::Edge(edge) => path.edges.push(edge),
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 -> 2, 2 -> 3, 1 -> 4, 4 -> 3
    fn diamond() -> (NetworkIndex, Vec<NodeKey>, Vec<EdgeKey>) {
        let mut network = NetworkIndex::new();
        let nodes: Vec<NodeKey> = (1..=4).map(|i| network.create_node(i, 0.0, ())).collect();
        let edges = vec![
            network.create_edge(12, nodes[0], nodes[1], 1.0, 1.0, ()).unwrap(),
            network.create_edge(23, nodes[1], nodes[2], 1.0, 1.0, ()).unwrap(),
            network.create_edge(14, nodes[0], nodes[3], 1.0, 1.0, ()).unwrap(),
            network.create_edge(43, nodes[3], nodes[2], 1.0, 1.0, ()).unwrap(),
        ];
        network.add_nodes(&nodes);
        (network, nodes, edges)
    }

    #[test]
    fn test_travel_path_steps() {
        let (network, n, e) = diamond();
        let path: ReversePathMap = [(n[2], n[1]), (n[1], n[0])].into_iter().collect();

        for lookup in [EdgeLookup::Indexed, EdgeLookup::Scan] {
            let mut nodes = Vec::new();
            let mut edges = Vec::new();
            let done = travel_path(
                &network,
                n[2],
                &path,
                |node, step| nodes.push((node, step)),
                |edge, step| edges.push((edge, step)),
                lookup,
            );

            assert!(done);
            assert_eq!(nodes, vec![(n[2], 0), (n[1], 2), (n[0], 4)]);
            assert_eq!(edges, vec![(e[1], 1), (e[0], 3)]);
        }
    }

    #[test]
    fn test_travel_path_abandons_missing_edge() {
        let (network, n, _) = diamond();
        // 3 and 1 are not adjacent
        let path: ReversePathMap = [(n[2], n[0])].into_iter().collect();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let done = travel_path(
            &network,
            n[2],
            &path,
            |node, _| nodes.push(node),
            |edge, _| edges.push(edge),
            EdgeLookup::Indexed,
        );

        assert!(!done);
        assert_eq!(nodes, vec![n[2]]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_travel_path_abandons_cycle() {
        let (network, n, _) = diamond();
        let path: ReversePathMap = [(n[0], n[1]), (n[1], n[0])].into_iter().collect();
        let mut visits = 0;

        let done = travel_path(
            &network,
            n[0],
            &path,
            |_, _| visits += 1,
            |_, _| {},
            EdgeLookup::Indexed,
        );

        assert!(!done);
        assert_eq!(visits, 2);
    }

    #[test]
    fn test_travel_node_collision_path() {
        let (network, n, e) = diamond();
        // Origins 2 and 4 both reach 3 in one hop; 3 was first found from 2
        let path: ReversePathMap = [(n[2], n[1])].into_iter().collect();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let done = travel_collision_path(
            &network,
            ElementKey::Node(n[2]),
            &[n[3], n[1]],
            &path,
            |node, step, index| nodes.push((node, step, index)),
            |edge, step, index| edges.push((edge, step, index)),
            EdgeLookup::Scan,
        );

        assert_eq!(done, vec![true, true]);
        assert_eq!(
            nodes,
            vec![(n[2], 0, 0), (n[3], 2, 0), (n[2], 0, 1), (n[1], 2, 1)]
        );
        assert_eq!(edges, vec![(e[3], 1, 0), (e[1], 1, 1)]);
    }

    #[test]
    fn test_travel_edge_collision_path_uses_endpoints() {
        let (network, n, e) = diamond();
        let path: ReversePathMap = [(n[1], n[0])].into_iter().collect();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let done = travel_collision_path(
            &network,
            ElementKey::Edge(e[1]),
            &[],
            &path,
            |node, step, index| nodes.push((node, step, index)),
            |edge, step, index| edges.push((edge, step, index)),
            EdgeLookup::Indexed,
        );

        assert_eq!(done, vec![true, true]);
        assert_eq!(edges, vec![(e[1], 0, 0), (e[0], 2, 0), (e[1], 0, 1)]);
        assert_eq!(nodes, vec![(n[1], 1, 0), (n[0], 3, 0), (n[2], 1, 1)]);
    }

    #[test]
    fn test_join_halves() {
        let (_, n, e) = diamond();

        let toward_1 = vec![
            ElementKey::Node(n[1]),
            ElementKey::Edge(e[0]),
            ElementKey::Node(n[0]),
        ];
        let toward_3 = vec![
            ElementKey::Node(n[1]),
            ElementKey::Edge(e[1]),
            ElementKey::Node(n[2]),
        ];
        let joined = join_halves(&toward_1, &toward_3);

        assert_eq!(joined.nodes, vec![n[0], n[1], n[2]]);
        assert_eq!(joined.edges, vec![e[0], e[1]]);
        assert_eq!(joined.len(), 2);
    }
}
