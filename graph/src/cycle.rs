// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Back-edge detection over the dispatch edges of a parse graph.
//!
//! Tunneling protocols (IP-in-IP, GRE) make parse graphs legitimately
//! cyclic; back-edges are reported so callers can confirm the walk's
//! encapsulation budget bounds traversal, never to reject the graph.

use engine::{Graph, NodeId};

/// A dispatch edge closing a cycle, labeled with its table key
/// (`None` for the wildcard edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackEdge {
    /// Source vertex.
    pub from: NodeId,
    /// Target vertex (an ancestor of `from` in the DFS tree).
    pub to: NodeId,
    /// Table key labeling the edge; `None` for the wildcard.
    pub key: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Depth-first search from `root`, returning every back-edge in
/// first-encounter order.
#[must_use]
pub fn back_edges<M>(graph: &Graph<M>, root: NodeId) -> Vec<BackEdge> {
    let mut color = vec![Color::White; graph.node_count()];
    let mut found = Vec::new();
    // explicit stack: (vertex, next edge index to expand)
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    color[root.index()] = Color::Gray;
    while let Some((node, edge)) = stack.pop() {
        let out = out_edges(graph, node);
        match out.get(edge) {
            None => {
                color[node.index()] = Color::Black;
            }
            Some(&(key, target)) => {
                stack.push((node, edge + 1));
                match color[target.index()] {
                    Color::Gray => found.push(BackEdge {
                        from: node,
                        to: target,
                        key,
                    }),
                    Color::White => {
                        color[target.index()] = Color::Gray;
                        stack.push((target, 0));
                    }
                    Color::Black => {}
                }
            }
        }
    }
    found
}

fn out_edges<M>(graph: &Graph<M>, node: NodeId) -> Vec<(Option<u32>, NodeId)> {
    match &graph.node(node).table {
        None => Vec::new(),
        Some(table) => {
            let mut out: Vec<(Option<u32>, NodeId)> = table
                .entries
                .iter()
                .map(|(&key, &target)| (Some(key), target))
                .collect();
            if let Some(wildcard) = table.wildcard {
                out.push((None, wildcard));
            }
            out
        }
    }
}

#[cfg(test)]
mod test {
    use super::back_edges;
    use engine::{Graph, KeyWidth, NodeId, ParseNode, ProtoNode, Table, UnknownProto};
    use ordermap::OrderMap;

    static LINK: ProtoNode = ProtoNode {
        name: "link",
        min_len: 2,
        overlay: false,
        encap: false,
        key_width: Some(KeyWidth::U8),
        len: None,
        next_proto: Some(|hdr| u32::from(hdr[1])),
    };

    static LEAF: ProtoNode = ProtoNode {
        name: "leaf",
        min_len: 1,
        overlay: false,
        encap: false,
        key_width: None,
        len: None,
        next_proto: None,
    };

    fn node(sym: &str, proto: &'static ProtoNode) -> ParseNode<()> {
        ParseNode {
            sym: sym.to_string(),
            proto_sym: proto.name.to_string(),
            proto,
            extract: None,
            extract_sym: None,
            handler: None,
            handler_sym: None,
            table: None,
            tlvs: None,
            unknown_proto: UnknownProto::default(),
        }
    }

    fn table(entries: &[(u32, NodeId)]) -> Table {
        Table {
            sym: "t".to_string(),
            width: KeyWidth::U8,
            entries: entries.iter().copied().collect::<OrderMap<_, _>>(),
            wildcard: None,
        }
    }

    #[test]
    fn acyclic_chain_has_no_back_edges() {
        let mut graph: Graph<()> = Graph::new();
        let leaf = graph.push_node(node("c", &LEAF));
        let mid = graph.push_node(node("b", &LINK));
        let root = graph.push_node(node("a", &LINK));
        graph.node_mut(mid).table = Some(table(&[(1, leaf)]));
        graph.node_mut(root).table = Some(table(&[(1, mid), (2, leaf)]));
        assert!(back_edges(&graph, root).is_empty());
    }

    #[test]
    fn tunnel_cycle_is_reported_once() {
        // a -> b -> a (the IP-in-IP shape), plus a diamond edge to a leaf
        let mut graph: Graph<()> = Graph::new();
        let leaf = graph.push_node(node("leaf", &LEAF));
        let a = graph.push_node(node("a", &LINK));
        let b = graph.push_node(node("b", &LINK));
        graph.node_mut(a).table = Some(table(&[(1, b), (2, leaf)]));
        graph.node_mut(b).table = Some(table(&[(1, a), (2, leaf)]));
        let edges = back_edges(&graph, a);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, b);
        assert_eq!(edges[0].to, a);
        assert_eq!(edges[0].key, Some(1));
    }

    #[test]
    fn self_loop_is_a_back_edge() {
        let mut graph: Graph<()> = Graph::new();
        let a = graph.push_node(node("a", &LINK));
        graph.node_mut(a).table = Some(table(&[(1, a)]));
        let edges = back_edges(&graph, a);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, a);
        assert_eq!(edges[0].to, a);
    }
}
