//! Node Index Map
//!
//! Bijection between agent indices `0..N` and a topology's native node
//! identities. Built once per topology and never mutated.

use std::collections::HashMap;
use std::hash::Hash;

use crate::network::Topology;

#[derive(Debug, Clone)]
pub struct NodeIndexMap<N> {
    nodes: Vec<N>,
    indices: HashMap<N, usize>,
}

impl<N: Copy + Eq + Hash> NodeIndexMap<N> {
    /// Assigns indices in the topology's stable node order.
    pub fn build<T: Topology<Node = N>>(topology: &T) -> Self {
        let nodes = topology.nodes();
        let indices = nodes
            .iter()
            .enumerate()
            .map(|(index, &node)| (node, index))
            .collect();
        Self { nodes, indices }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Native node for an agent index.
    pub fn node(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    /// Agent index for a native node.
    pub fn index(&self, node: N) -> Option<usize> {
        self.indices.get(&node).copied()
    }
}
