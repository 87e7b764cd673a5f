//! Ripple selection
//!
//! A splash drops one or more origins into the network and lets wavefronts
//! spread from them one layer at a time. Every layer is handed to the caller,
//! and the next layer is only built once the caller has answered.
//!
//! Origins of one splash share the frontier and the visited sets, so two
//! wavefronts reaching the same node or edge in the same wave are reported as
//! collisions. Separate splashes never see each other.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use netripple_core::{EdgeKey, NetworkIndex, NodeKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::SelectResult;
use crate::handler::RippleHandler;
use crate::limits::{validate_splash_depth, validate_splash_origins, ValidationError};
use crate::neighbors::{neighbors, FlowDirection, NeighborOptions};
use crate::path::ReversePathMap;

/// Splash configuration (follows the builder pattern of the query types)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplashOptions {
    /// Nodes the splash starts from. Handles are process-local, so they are
    /// never part of a serialized configuration.
    #[serde(skip)]
    pub origins: Vec<NodeKey>,

    /// Which edges the wavefronts may follow
    #[serde(default)]
    pub flow: FlowDirection,

    /// Deepest layer to publish, origins being depth 0 (None = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Report nodes and edges reached by different origins in the same wave
    #[serde(default)]
    pub include_collisions: bool,

    /// Publish the reverse path map with each layer
    #[serde(default)]
    pub include_path: bool,

    /// Publish the node to origin map with each layer
    #[serde(default)]
    pub include_source: bool,

    /// Never publish an edge between two nodes of the same depth
    #[serde(default)]
    pub exclude_same_depth_edges: bool,
}

impl SplashOptions {
    /// Create options for a splash from the given origins
    pub fn new(origins: impl IntoIterator<Item = NodeKey>) -> Self {
        Self {
            origins: origins.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Replace the origins, e.g. after deserializing a configuration
    pub fn with_origins(mut self, origins: impl IntoIterator<Item = NodeKey>) -> Self {
        self.origins = origins.into_iter().collect();
        self
    }

    pub fn with_flow(mut self, flow: FlowDirection) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_collisions(mut self) -> Self {
        self.include_collisions = true;
        self
    }

    pub fn with_path(mut self) -> Self {
        self.include_path = true;
        self
    }

    pub fn with_source(mut self) -> Self {
        self.include_source = true;
        self
    }

    pub fn excluding_same_depth_edges(mut self) -> Self {
        self.exclude_same_depth_edges = true;
        self
    }

    /// Check the options against the splash limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_splash_origins(self.origins.len())?;
        if let Some(depth) = self.max_depth {
            validate_splash_depth(depth)?;
        }
        Ok(())
    }
}

/// One published layer of a splash
///
/// `nodes` and `edges` are always present. The optional parts follow the
/// splash options.
#[derive(Debug, Clone, Default)]
pub struct RippleResult {
    /// Distance from the nearest origin; the origins themselves are depth 0
    pub depth: u32,
    pub nodes: Vec<NodeKey>,
    pub edges: Vec<EdgeKey>,
    /// Collided node to the nodes that preceded it from each side
    pub node_collisions: Option<HashMap<NodeKey, Vec<NodeKey>>>,
    /// Edges crossed by two wavefronts at once
    pub edge_collisions: Option<HashSet<EdgeKey>>,
    /// Every discovered node to the node that discovered it
    pub path: Option<Arc<ReversePathMap>>,
    /// Every discovered node to the origin its wavefront started from
    pub source: Option<Arc<HashMap<NodeKey, NodeKey>>>,
}

/// The caller's answer to a published layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RippleResponse {
    /// End the splash
    pub stop: bool,
}

impl RippleResponse {
    pub fn proceed() -> Self {
        Self { stop: false }
    }

    pub fn stop() -> Self {
        Self { stop: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RippleState {
    Created,
    Alive,
    Dead,
}

/// Why a splash ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No unvisited node was left to reach
    Exhausted,
    /// The caller answered with `stop`
    Requested,
    /// The next layer would have been deeper than `max_depth`
    MaxDepth,
}

/// Splash statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashSummary {
    /// Depth of the last layer built
    pub depth: u32,
    pub nodes_visited: usize,
    pub edges_visited: usize,
    pub reason: StopReason,
}

/// The resumable state of one splash
///
/// `init` publishes depth 0 and `wave` each following layer. Every published
/// layer is answered through `respond`. The drivers in [`RippleSelect`] run
/// this loop; it can also be stepped by hand.
pub struct Ripples<'a, N, E> {
    network: &'a NetworkIndex<N, E>,
    options: SplashOptions,
    state: RippleState,
    reason: Option<StopReason>,
    depth: u32,
    front: Vec<NodeKey>,
    visited_nodes: HashSet<NodeKey>,
    visited_edges: HashSet<EdgeKey>,
    nodes_visited: usize,
    edges_visited: usize,
    source: Option<Arc<HashMap<NodeKey, NodeKey>>>,
    path: Option<Arc<ReversePathMap>>,
    unanswered: usize,
}

impl<'a, N, E> Ripples<'a, N, E> {
    /// Prepare a splash over `network`
    pub fn new(network: &'a NetworkIndex<N, E>, options: SplashOptions) -> SelectResult<Self> {
        options.validate()?;

        Ok(Self {
            network,
            options,
            state: RippleState::Created,
            reason: None,
            depth: 0,
            front: Vec::new(),
            visited_nodes: HashSet::new(),
            visited_edges: HashSet::new(),
            nodes_visited: 0,
            edges_visited: 0,
            source: None,
            path: None,
            unanswered: 0,
        })
    }

    pub fn state(&self) -> RippleState {
        self.state
    }

    /// Depth of the most recently built layer
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn summary(&self) -> SplashSummary {
        SplashSummary {
            depth: self.depth,
            nodes_visited: self.nodes_visited,
            edges_visited: self.edges_visited,
            reason: self.reason.unwrap_or(StopReason::Exhausted),
        }
    }

    /// Seed the frontier with the origins and build the depth-0 layer
    ///
    /// Duplicate origins and origins that are not live in the network are
    /// dropped. Returns `None` if the splash was already started.
    pub fn init(&mut self) -> Option<RippleResult> {
        if self.state != RippleState::Created {
            return None;
        }
        self.state = RippleState::Alive;

        for &origin in &self.options.origins {
            if !self.network.is_live_node(origin) {
                warn!("Splash origin {} is not in the network, skipping", origin);
                continue;
            }
            if !self.visited_nodes.insert(origin) {
                warn!("Duplicate splash origin {} stripped", origin);
                continue;
            }
            self.front.push(origin);
        }
        self.nodes_visited = self.front.len();

        if self.options.include_collisions || self.options.include_source {
            let origins = self.front.iter().map(|node| (*node, *node)).collect();
            self.source = Some(Arc::new(origins));
        }
        if self.options.include_path || self.options.include_collisions {
            self.path = Some(Arc::new(ReversePathMap::new()));
        }

        debug!(
            "Splash started: {} origins, flow={:?}, max_depth={:?}",
            self.front.len(),
            self.options.flow,
            self.options.max_depth
        );

        let collisions = self.options.include_collisions;
        Some(self.publish(
            Vec::new(),
            collisions.then(HashMap::new),
            collisions.then(HashSet::new),
        ))
    }

    /// Build the next layer
    ///
    /// Returns `None` once the splash is dead. Stepping past `max_depth`
    /// kills the splash without publishing anything.
    pub fn wave(&mut self) -> Option<RippleResult> {
        if self.state != RippleState::Alive || self.past_max_depth() {
            return None;
        }

        self.depth += 1;
        if self.past_max_depth() {
            self.depth -= 1;
            self.finish(StopReason::MaxDepth);
            return None;
        }

        let network = self.network;
        let flow = self.options.flow;
        let include_collisions = self.options.include_collisions;
        let exclude_same_depth = self.options.exclude_same_depth_edges;

        let mut next_front = Vec::new();
        let mut in_next = HashSet::new();
        let mut edges = Vec::new();
        let mut node_collisions: Option<HashMap<NodeKey, Vec<NodeKey>>> =
            include_collisions.then(HashMap::new);
        let mut edge_collisions: Option<HashSet<EdgeKey>> = include_collisions.then(HashSet::new);
        let mut edge_sightings = HashSet::new();

        let front = std::mem::take(&mut self.front);
        let same_depth: HashSet<NodeKey> = if exclude_same_depth {
            front.iter().copied().collect()
        } else {
            HashSet::new()
        };

        for &node in &front {
            let node_source = self.source.as_ref().and_then(|map| map.get(&node).copied());

            let options = NeighborOptions {
                exclude: Some(&self.visited_nodes),
                flow,
                include_edge_for_circular_reference: !exclude_same_depth,
                include_excluded_nodes: include_collisions,
                include_edge_to_excluded_node: true,
            };
            let siblings = neighbors(network, node, &options);

            for &child in &siblings.nodes {
                if in_next.insert(child) {
                    next_front.push(child);
                }
                if self.visited_nodes.insert(child) {
                    self.nodes_visited += 1;
                }
                if let (Some(map), Some(origin)) = (self.source.as_mut(), node_source) {
                    Arc::make_mut(map).insert(child, origin);
                }
                if let Some(map) = self.path.as_mut() {
                    Arc::make_mut(map).insert(child, node);
                }
            }

            // A touched node already in the next frontier was reached this
            // wave along another path
            if let (Some(origin), Some(collisions), Some(excluded)) = (
                node_source,
                node_collisions.as_mut(),
                siblings.excluded.as_ref(),
            ) {
                for &touched in excluded {
                    if !in_next.contains(&touched) {
                        continue;
                    }
                    if let Some(preceding) = collisions.get_mut(&touched) {
                        preceding.push(node);
                        continue;
                    }

                    let parent = self.path.as_ref().and_then(|map| map.get(&touched).copied());
                    let first = self.source.as_ref().and_then(|map| map.get(&touched).copied());
                    match (parent, first) {
                        (Some(parent), Some(first)) => {
                            if first != origin {
                                collisions.insert(touched, vec![node, parent]);
                            }
                        }
                        _ => warn!(
                            "Node collision at {} has no recorded parent or origin",
                            touched
                        ),
                    }
                }
            }

            for &edge in &siblings.edges {
                if self.visited_edges.insert(edge) {
                    self.edges_visited += 1;
                    edges.push(edge);
                }
            }

            let Some(to_exclusion) = siblings.edge_to_exclusion.as_ref() else {
                continue;
            };

            for &edge in to_exclusion {
                let level = exclude_same_depth
                    && network
                        .edge(edge)
                        .map(|e| same_depth.contains(&e.a()) && same_depth.contains(&e.b()))
                        .unwrap_or(false);
                if !level && self.visited_edges.insert(edge) {
                    self.edges_visited += 1;
                    edges.push(edge);
                }

                let Some(crossed) = edge_collisions.as_mut() else {
                    continue;
                };

                // Only two nodes of one frontier sighting each other reach
                // the same edge twice
                if !edge_sightings.insert(edge) && !crossed.contains(&edge) {
                    let origins = network.edge(edge).and_then(|e| {
                        let map = self.source.as_ref()?;
                        Some((map.get(&e.a()).copied()?, map.get(&e.b()).copied()?))
                    });
                    if let Some((from_a, from_b)) = origins {
                        if from_a != from_b {
                            crossed.insert(edge);
                        }
                    }
                }
            }
        }

        self.front = next_front;

        trace!(
            "Wave {}: {} nodes, {} edges",
            self.depth,
            self.front.len(),
            edges.len()
        );

        Some(self.publish(edges, node_collisions, edge_collisions))
    }

    /// Apply the caller's answer to the oldest unanswered layer
    ///
    /// A stop kills the splash at once. Once every published layer is
    /// answered, an empty frontier past depth 0 kills it as well.
    pub fn respond(&mut self, response: RippleResponse) -> RippleState {
        self.unanswered = self.unanswered.saturating_sub(1);

        if self.state != RippleState::Alive {
            return self.state;
        }

        if response.stop {
            self.finish(StopReason::Requested);
        } else if self.unanswered == 0 && self.depth > 0 && self.front.is_empty() {
            self.finish(StopReason::Exhausted);
        }

        self.state
    }

    fn past_max_depth(&self) -> bool {
        self.options
            .max_depth
            .map(|max| self.depth > max)
            .unwrap_or(false)
    }

    fn publish(
        &mut self,
        edges: Vec<EdgeKey>,
        node_collisions: Option<HashMap<NodeKey, Vec<NodeKey>>>,
        edge_collisions: Option<HashSet<EdgeKey>>,
    ) -> RippleResult {
        self.unanswered += 1;

        RippleResult {
            depth: self.depth,
            nodes: self.front.clone(),
            edges,
            node_collisions,
            edge_collisions,
            path: self.path.clone().filter(|_| self.options.include_path),
            source: self.source.clone().filter(|_| self.options.include_source),
        }
    }

    fn finish(&mut self, reason: StopReason) {
        self.state = RippleState::Dead;
        self.reason.get_or_insert(reason);

        // Counters survive for the summary
        self.front.clear();
        self.visited_nodes.clear();
        self.visited_edges.clear();
        self.source = None;
        self.path = None;

        debug!(
            "Splash finished at depth {} ({:?}): {} nodes, {} edges",
            self.depth, reason, self.nodes_visited, self.edges_visited
        );
    }
}

/// Splash drivers
pub struct RippleSelect;

impl RippleSelect {
    /// Run a splash, handing each layer to `handler`
    ///
    /// Both the depth-0 and the depth-1 layers are built before the answer
    /// to depth 0 is applied, so a stop at depth 0 still publishes depth 1.
    /// The handler is borrowed mutably, so its call for depth 1 starts only
    /// after its future for depth 0 has resolved; the two never overlap.
    /// The returned future resolves once the splash is dead.
    pub async fn splash<N, E, H>(
        network: &NetworkIndex<N, E>,
        options: SplashOptions,
        handler: &mut H,
    ) -> SelectResult<SplashSummary>
    where
        H: RippleHandler + ?Sized,
    {
        let mut ripples = Ripples::new(network, options)?;

        let primed = [ripples.init(), ripples.wave()];
        let mut responses = Vec::with_capacity(primed.len());
        for layer in primed.into_iter().flatten() {
            responses.push(handler.on_ripple(layer).await);
        }
        for response in responses {
            ripples.respond(response);
        }

        while let Some(layer) = ripples.wave() {
            let response = handler.on_ripple(layer).await;
            ripples.respond(response);
        }

        Ok(ripples.summary())
    }

    /// Run a splash to completion on the current thread
    ///
    /// Layers are published in the same order as [`RippleSelect::splash`].
    pub fn splash_blocking<N, E, F>(
        network: &NetworkIndex<N, E>,
        options: SplashOptions,
        mut handler: F,
    ) -> SelectResult<SplashSummary>
    where
        F: FnMut(RippleResult) -> RippleResponse,
    {
        let mut ripples = Ripples::new(network, options)?;

        let primed = [ripples.init(), ripples.wave()];
        let responses: Vec<RippleResponse> = primed
            .into_iter()
            .flatten()
            .map(&mut handler)
            .collect();
        for response in responses {
            ripples.respond(response);
        }

        while let Some(layer) = ripples.wave() {
            let response = handler(layer);
            ripples.respond(response);
        }

        Ok(ripples.summary())
    }
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

    fn collect_blocking(network: &NetworkIndex, options: SplashOptions) -> Vec<RippleResult> {
        let mut layers = Vec::new();
        RippleSelect::splash_blocking(network, options, |layer| {
            layers.push(layer);
            RippleResponse::proceed()
        })
        .unwrap();
        layers
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SplashOptions =
            serde_json::from_str(r#"{"flow": "out", "max_depth": 3, "include_path": true}"#)
                .unwrap();

        assert_eq!(options.flow, FlowDirection::Out);
        assert_eq!(options.max_depth, Some(3));
        assert!(options.include_path);
        assert!(!options.include_collisions);
        assert!(options.origins.is_empty());
    }

    #[test]
    fn test_options_validation() {
        let (network, nodes, _) = diamond();
        let options = SplashOptions::new([nodes[0]]).with_max_depth(u32::MAX);

        assert!(options.validate().is_err());
        assert!(Ripples::new(&network, options).is_err());
    }

    #[test]
    fn test_layers_by_depth() {
        let (network, n, e) = diamond();
        let layers = collect_blocking(&network, SplashOptions::new([n[0]]));

        let depths: Vec<u32> = layers.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
        assert_eq!(layers[0].nodes, vec![n[0]]);
        assert!(layers[0].edges.is_empty());

        let mut first: Vec<NodeKey> = layers[1].nodes.clone();
        first.sort();
        let mut expected = vec![n[1], n[3]];
        expected.sort();
        assert_eq!(first, expected);

        assert_eq!(layers[2].nodes, vec![n[2]]);
        // The second edge into 3 is a same-wave sighting of a visited node
        let mut second: Vec<EdgeKey> = layers[2].edges.clone();
        second.sort();
        let mut expected = vec![e[1], e[3]];
        expected.sort();
        assert_eq!(second, expected);

        assert!(layers[3].nodes.is_empty());
        assert!(layers[3].edges.is_empty());
    }

    #[test]
    fn test_flow_out_from_sink_stops_early() {
        let (network, n, _) = diamond();
        let layers = collect_blocking(
            &network,
            SplashOptions::new([n[2]]).with_flow(FlowDirection::Out),
        );

        assert_eq!(layers.len(), 2);
        assert!(layers[1].nodes.is_empty());
    }

    #[test]
    fn test_manual_stepping() {
        let (network, n, _) = diamond();
        let mut ripples = Ripples::new(&network, SplashOptions::new([n[0], n[0]])).unwrap();

        assert_eq!(ripples.state(), RippleState::Created);
        assert!(ripples.wave().is_none());

        let origin = ripples.init().unwrap();
        assert_eq!(origin.nodes, vec![n[0]]);
        assert!(ripples.init().is_none());
        assert_eq!(ripples.respond(RippleResponse::proceed()), RippleState::Alive);

        let first = ripples.wave().unwrap();
        assert_eq!(first.depth, 1);
        assert_eq!(ripples.respond(RippleResponse::stop()), RippleState::Dead);
        assert!(ripples.wave().is_none());

        let summary = ripples.summary();
        assert_eq!(summary.reason, StopReason::Requested);
        assert_eq!(summary.depth, 1);
        assert_eq!(summary.nodes_visited, 3);
        assert_eq!(summary.edges_visited, 2);
    }

    #[test]
    fn test_max_depth_zero_publishes_origins_only() {
        let (network, n, _) = diamond();
        let mut layers = Vec::new();

        let summary = RippleSelect::splash_blocking(
            &network,
            SplashOptions::new([n[0]]).with_max_depth(0),
            |layer| {
                layers.push(layer.depth);
                RippleResponse::proceed()
            },
        )
        .unwrap();

        assert_eq!(layers, vec![0]);
        assert_eq!(summary.reason, StopReason::MaxDepth);
        assert_eq!(summary.depth, 0);
    }

    #[test]
    fn test_path_and_source_follow_options() {
        let (network, n, _) = diamond();

        let bare = collect_blocking(&network, SplashOptions::new([n[0]]).with_collisions());
        assert!(bare.iter().all(|l| l.path.is_none() && l.source.is_none()));
        assert!(bare.iter().all(|l| l.node_collisions.is_some()));

        let full = collect_blocking(&network, SplashOptions::new([n[0]]).with_path().with_source());
        let last = full.last().unwrap();
        let source = last.source.as_ref().unwrap();
        assert!(n.iter().all(|node| source.get(node) == Some(&n[0])));
        let path = last.path.as_ref().unwrap();
        assert_eq!(path.get(&n[1]), Some(&n[0]));
        assert!(path.get(&n[0]).is_none());
    }

    /// Edges `i -> i + 1`, closed back to 0 when `closed`
    fn line(count: i64, closed: bool) -> (NetworkIndex, Vec<NodeKey>, Vec<EdgeKey>) {
        let mut network = NetworkIndex::new();
        let nodes: Vec<NodeKey> = (0..count).map(|i| network.create_node(i, 0.0, ())).collect();
        let links = if closed { nodes.len() } else { nodes.len() - 1 };
        let edges = (0..links)
            .map(|i| {
                let (a, b) = (nodes[i], nodes[(i + 1) % nodes.len()]);
                network.create_edge(i as i64, a, b, 1.0, 1.0, ()).unwrap()
            })
            .collect();
        network.add_nodes(&nodes);
        (network, nodes, edges)
    }

    #[test]
    fn test_reconverging_single_origin_is_not_a_node_collision() {
        let (network, n, _) = diamond();
        let layers = collect_blocking(&network, SplashOptions::new([n[0]]).with_collisions());

        // 3 is reached from both 2 and 4 in the same wave
        assert_eq!(layers[2].nodes, vec![n[2]]);
        for layer in &layers {
            assert!(layer.node_collisions.as_ref().unwrap().is_empty());
            assert!(layer.edge_collisions.as_ref().unwrap().is_empty());
        }
    }

    #[test]
    fn test_reconverging_single_origin_is_not_an_edge_collision() {
        let (network, n, _) = line(5, true);
        let layers = collect_blocking(&network, SplashOptions::new([n[0]]).with_collisions());

        // 2 and 3 share a frontier and see each other across one edge
        let mut second = layers[2].nodes.clone();
        second.sort();
        let mut expected = vec![n[2], n[3]];
        expected.sort();
        assert_eq!(second, expected);
        for layer in &layers {
            assert!(layer.edge_collisions.as_ref().unwrap().is_empty());
            assert!(layer.node_collisions.as_ref().unwrap().is_empty());
        }
    }

    #[test]
    fn test_two_origins_cross_on_an_edge() {
        let (network, n, e) = line(4, false);
        let layers = collect_blocking(&network, SplashOptions::new([n[0], n[3]]).with_collisions());

        let crossed: Vec<&HashSet<EdgeKey>> = layers
            .iter()
            .filter_map(|layer| layer.edge_collisions.as_ref())
            .filter(|found| !found.is_empty())
            .collect();
        assert_eq!(crossed.len(), 1);
        assert_eq!(crossed[0].iter().copied().collect::<Vec<_>>(), vec![e[1]]);
        assert_eq!(layers[2].edge_collisions.as_ref().unwrap().len(), 1);
        assert!(layers
            .iter()
            .all(|layer| layer.node_collisions.as_ref().unwrap().is_empty()));
    }

    #[test]
    fn test_invalid_origins_are_skipped() {
        let (mut network, n, _) = diamond();
        let detached = network.create_node(99, 0.0, ());
        let layers = collect_blocking(&network, SplashOptions::new([detached, n[0]]));

        assert_eq!(layers[0].nodes, vec![n[0]]);
    }
}
