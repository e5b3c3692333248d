//! Network Ensembles
//!
//! Topologies the voter models run on, and the factory that generates
//! ensembles of them.

pub mod lattice;
pub mod random;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::Hash;
use tracing::debug;
use voter_events::NetworkKind;

use crate::error::NetworkError;

/// Read access to an undirected graph.
///
/// Node identities are opaque to the engine; they are only ever translated
/// through a [`crate::model::NodeIndexMap`].
pub trait Topology {
    type Node: Copy + Eq + Hash;

    fn node_count(&self) -> usize;

    /// All nodes, in a stable order.
    fn nodes(&self) -> Vec<Self::Node>;

    fn neighbors(&self, node: Self::Node) -> Vec<Self::Node>;
}

/// Simple undirected graph backed by petgraph.
///
/// Self loops and parallel edges are never stored.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: UnGraph<usize, ()>,
}

impl Network {
    /// Creates a graph with `n` isolated nodes.
    pub fn with_nodes(n: usize) -> Self {
        let mut graph = UnGraph::with_capacity(n, 0);
        for i in 0..n {
            graph.add_node(i);
        }
        Self { graph }
    }

    /// Creates a graph with `n` nodes and the given edges between positions.
    ///
    /// Edges touching a position `>= n` are ignored.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut network = Self::with_nodes(n);
        for &(a, b) in edges {
            if a < n && b < n {
                network.connect(a, b);
            }
        }
        network
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of neighbors of the node at `position`.
    pub fn degree(&self, position: usize) -> usize {
        self.graph.neighbors(NodeIndex::new(position)).count()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.graph.contains_edge(NodeIndex::new(a), NodeIndex::new(b))
    }

    /// Neighbor positions of the node at `position`.
    pub fn neighbor_positions(&self, position: usize) -> Vec<usize> {
        self.graph
            .neighbors(NodeIndex::new(position))
            .map(|node| self.graph[node])
            .collect()
    }

    pub(crate) fn connect(&mut self, a: usize, b: usize) {
        if a != b {
            self.graph.update_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
    }

    pub(crate) fn disconnect(&mut self, a: usize, b: usize) {
        if let Some(edge) = self.graph.find_edge(NodeIndex::new(a), NodeIndex::new(b)) {
            self.graph.remove_edge(edge);
        }
    }
}

impl Topology for Network {
    type Node = NodeIndex;

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors(node).collect()
    }
}

/// Default parameters of the random network families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    /// Watts–Strogatz ring degree
    pub ws_k: usize,
    /// Watts–Strogatz rewiring probability
    pub ws_p: f64,
    /// Power-law cluster attachment count
    pub pl_m: usize,
    /// Power-law cluster triangle probability
    pub pl_p: f64,
    /// Erdős–Rényi edge probability
    pub er_p: f64,
    /// Barabási–Albert attachment count
    pub ba_m: usize,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            ws_k: 5,
            ws_p: 0.4,
            pl_m: 5,
            pl_p: 0.6,
            er_p: 0.1,
            ba_m: 5,
        }
    }
}

/// Maps a short network code to its kind.
pub fn parse_kind(code: &str) -> Result<NetworkKind, NetworkError> {
    code.parse()
        .map_err(|_| NetworkError::UnsupportedKind(code.to_string()))
}

/// Generates ensembles of networks of one family.
#[derive(Debug, Clone, Default)]
pub struct NetworkEnsembleFactory {
    params: NetworkParams,
}

impl NetworkEnsembleFactory {
    pub fn new(params: NetworkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Generates `ensemble_size` networks of `n` nodes, keyed `0..ensemble_size`.
    ///
    /// Non-variate kinds are built once and cloned for every member.
    pub fn make_ensemble(
        &self,
        n: usize,
        ensemble_size: usize,
        kind: NetworkKind,
        rng: &mut SmallRng,
    ) -> Result<BTreeMap<usize, Network>, NetworkError> {
        let mut ensemble = BTreeMap::new();
        if ensemble_size == 0 {
            return Ok(ensemble);
        }

        if kind.is_variate() {
            for member in 0..ensemble_size {
                ensemble.insert(member, self.make_network(n, kind, rng)?);
            }
        } else {
            let network = self.make_network(n, kind, rng)?;
            for member in 0..ensemble_size {
                ensemble.insert(member, network.clone());
            }
        }

        debug!(
            kind = %kind,
            n,
            members = ensemble.len(),
            "generated network ensemble"
        );
        Ok(ensemble)
    }

    /// Generates a single network of `n` nodes.
    pub fn make_network(
        &self,
        n: usize,
        kind: NetworkKind,
        rng: &mut SmallRng,
    ) -> Result<Network, NetworkError> {
        if n == 0 {
            return Err(NetworkError::InvalidSize {
                kind,
                n,
                reason: "a network needs at least one node".into(),
            });
        }

        let params = &self.params;
        match kind {
            NetworkKind::Lattice2dRectangle => lattice::rectangular(n),
            NetworkKind::Lattice2dTriangle => lattice::triangular(n),
            NetworkKind::Lattice2dHexagon => lattice::hexagonal(n),
            NetworkKind::Complete => Ok(lattice::complete(n)),
            NetworkKind::Hypercube => lattice::hypercube(n),
            NetworkKind::WattsStrogatz => random::watts_strogatz(n, params.ws_k, params.ws_p, rng),
            NetworkKind::PowerLaw => random::powerlaw_cluster(n, params.pl_m, params.pl_p, rng),
            NetworkKind::ErdosRenyi => random::erdos_renyi(n, params.er_p, rng),
            NetworkKind::BarabasiAlbert => random::barabasi_albert(n, params.ba_m, rng),
        }
    }
}

pub(crate) fn check_probability(
    kind: NetworkKind,
    name: &'static str,
    value: f64,
) -> Result<(), NetworkError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(NetworkError::InvalidParameter { kind, name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_from_edges_ignores_loops_and_duplicates() {
        let network = Network::from_edges(3, &[(0, 1), (1, 0), (2, 2), (1, 2), (0, 9)]);
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2);
        assert!(network.has_edge(1, 0));
        assert_eq!(network.degree(1), 2);
    }

    #[test]
    fn test_topology_nodes_are_stable() {
        let network = Network::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(network.nodes(), network.nodes());
        assert_eq!(network.nodes().len(), 4);

        let mut around_zero = network.neighbor_positions(0);
        around_zero.sort();
        assert_eq!(around_zero, vec![1, 3]);
    }

    #[test]
    fn test_disconnect() {
        let mut network = Network::from_edges(3, &[(0, 1), (1, 2)]);
        network.disconnect(1, 0);
        assert!(!network.has_edge(0, 1));
        assert_eq!(network.edge_count(), 1);
        network.disconnect(0, 2);
        assert_eq!(network.edge_count(), 1);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("ws").unwrap(), NetworkKind::WattsStrogatz);
        assert_eq!(
            parse_kind("torus").unwrap_err(),
            NetworkError::UnsupportedKind("torus".into())
        );
    }

    #[test]
    fn test_ensemble_has_requested_members() {
        let factory = NetworkEnsembleFactory::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for kind in NetworkKind::all() {
            let n = match kind {
                NetworkKind::Hypercube => 64,
                _ => 36,
            };
            let ensemble = factory.make_ensemble(n, 3, *kind, &mut rng).unwrap();
            assert_eq!(ensemble.len(), 3, "{}", kind);
            assert_eq!(ensemble.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
            for network in ensemble.values() {
                assert_eq!(network.node_count(), n, "{}", kind);
            }
        }
    }

    #[test]
    fn test_non_variate_members_identical() {
        let factory = NetworkEnsembleFactory::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let ensemble = factory
            .make_ensemble(16, 4, NetworkKind::Lattice2dRectangle, &mut rng)
            .unwrap();

        let first = &ensemble[&0];
        for network in ensemble.values() {
            assert_eq!(network.edge_count(), first.edge_count());
            for i in 0..16 {
                assert_eq!(network.neighbor_positions(i), first.neighbor_positions(i));
            }
        }
    }

    #[test]
    fn test_variate_members_differ() {
        let factory = NetworkEnsembleFactory::default();
        let mut rng = SmallRng::seed_from_u64(99);
        let ensemble = factory
            .make_ensemble(100, 2, NetworkKind::ErdosRenyi, &mut rng)
            .unwrap();

        let differs = (0..100)
            .any(|i| ensemble[&0].neighbor_positions(i) != ensemble[&1].neighbor_positions(i));
        assert!(differs);
    }

    #[test]
    fn test_zero_nodes_rejected() {
        let factory = NetworkEnsembleFactory::default();
        let mut rng = SmallRng::seed_from_u64(0);
        for kind in NetworkKind::all() {
            let err = factory.make_network(0, *kind, &mut rng).unwrap_err();
            assert!(matches!(err, NetworkError::InvalidSize { n: 0, .. }));
        }
    }

    #[test]
    fn test_empty_ensemble() {
        let factory = NetworkEnsembleFactory::default();
        let mut rng = SmallRng::seed_from_u64(0);
        let ensemble = factory
            .make_ensemble(10, 0, NetworkKind::Complete, &mut rng)
            .unwrap();
        assert!(ensemble.is_empty());
    }
}
