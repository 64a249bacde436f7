// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The parse graph proper: vertices, TLV vertices, and registered roots.

use crate::node::{NodeId, ParseNode, TlvNode, TlvNodeId};

/// A named entry point into the graph.
#[derive(Debug, Clone)]
pub struct Root {
    /// Parser name (`PARSER_ADD` first argument).
    pub name: String,
    /// Human-readable description.
    pub desc: String,
    /// Vertex the walk starts from.
    pub node: NodeId,
}

/// A built parse graph. Immutable once the builder hands it out; any
/// number of threads may walk it concurrently over disjoint inputs.
#[derive(Debug, Default)]
pub struct Graph<M> {
    nodes: Vec<ParseNode<M>>,
    tlv_nodes: Vec<TlvNode<M>>,
    roots: Vec<Root>,
}

impl<M> Graph<M> {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Graph<M> {
        Graph {
            nodes: Vec::new(),
            tlv_nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Append a vertex, returning its id.
    pub fn push_node(&mut self, node: ParseNode<M>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append a TLV vertex, returning its id.
    pub fn push_tlv_node(&mut self, node: TlvNode<M>) -> TlvNodeId {
        let id = TlvNodeId::new(self.tlv_nodes.len());
        self.tlv_nodes.push(node);
        id
    }

    /// Register a named root.
    pub fn add_root(&mut self, root: Root) {
        self.roots.push(root);
    }

    /// Vertex by id.
    ///
    /// # Panics
    ///
    /// Panics when `id` did not come from this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ParseNode<M> {
        &self.nodes[id.index()]
    }

    /// Mutable vertex access (used by the builder to attach tables).
    pub fn node_mut(&mut self, id: NodeId) -> &mut ParseNode<M> {
        &mut self.nodes[id.index()]
    }

    /// TLV vertex by id.
    ///
    /// # Panics
    ///
    /// Panics when `id` did not come from this graph.
    #[must_use]
    pub fn tlv_node(&self, id: TlvNodeId) -> &TlvNode<M> {
        &self.tlv_nodes[id.index()]
    }

    /// Number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of TLV vertices.
    #[must_use]
    pub fn tlv_node_count(&self) -> usize {
        self.tlv_nodes.len()
    }

    /// Iterate vertices in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ParseNode<M>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }

    /// Iterate TLV vertices in insertion order.
    pub fn tlv_nodes(&self) -> impl Iterator<Item = (TlvNodeId, &TlvNode<M>)> {
        self.tlv_nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (TlvNodeId::new(index), node))
    }

    /// Registered roots, in registration order.
    #[must_use]
    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Root by parser name.
    #[must_use]
    pub fn root_named(&self, name: &str) -> Option<&Root> {
        self.roots.iter().find(|root| root.name == name)
    }

    /// Vertex id by declared name.
    #[must_use]
    pub fn node_named(&self, sym: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.sym == sym)
            .map(NodeId::new)
    }
}
