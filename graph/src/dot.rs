// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Graphviz rendering of the subgraph reachable from a root.

use crate::cycle::BackEdge;
use core::fmt::Write;
use engine::{Graph, KeyWidth, NodeId};

/// Render the vertices and dispatch edges reachable from `root` as a
/// `digraph`. Edges are labeled with their table keys (width-formatted);
/// back-edges are dashed and red; TLV side graphs hang off their owning
/// node with dotted edges.
#[must_use]
pub fn dotify<M>(graph: &Graph<M>, root: NodeId, back_edges: &[BackEdge]) -> String {
    let mut reachable = vec![false; graph.node_count()];
    let mut stack = vec![root];
    reachable[root.index()] = true;
    while let Some(node) = stack.pop() {
        if let Some(table) = &graph.node(node).table {
            for target in table
                .entries
                .values()
                .copied()
                .chain(table.wildcard)
            {
                if !reachable[target.index()] {
                    reachable[target.index()] = true;
                    stack.push(target);
                }
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "digraph parse_graph {{");
    let _ = writeln!(out, "    rankdir=LR;");
    let _ = writeln!(out, "    node [shape=box];");
    for (id, node) in graph.nodes() {
        if !reachable[id.index()] {
            continue;
        }
        let _ = writeln!(
            out,
            "    \"{sym}\" [label=\"{sym}\\n({proto})\"];",
            sym = node.sym,
            proto = node.proto.name,
        );
    }
    for (id, node) in graph.nodes() {
        if !reachable[id.index()] {
            continue;
        }
        if let Some(table) = &node.table {
            for (&key, &target) in &table.entries {
                let _ = writeln!(
                    out,
                    "    \"{from}\" -> \"{to}\" [label=\"{label}\"{style}];",
                    from = node.sym,
                    to = graph.node(target).sym,
                    label = format_key(table.width, key),
                    style = edge_style(back_edges, id, target, Some(key)),
                );
            }
            if let Some(wildcard) = table.wildcard {
                let _ = writeln!(
                    out,
                    "    \"{from}\" -> \"{to}\" [label=\"*\"{style}];",
                    from = node.sym,
                    to = graph.node(wildcard).sym,
                    style = edge_style(back_edges, id, wildcard, None),
                );
            }
        }
        if let Some(tlvs) = &node.tlvs {
            for (&key, &target) in &tlvs.table.entries {
                let _ = writeln!(
                    out,
                    "    \"{from}\" -> \"{to}\" [label=\"tlv {key}\", style=dotted];",
                    from = node.sym,
                    to = graph.tlv_node(target).sym,
                );
            }
            if let Some(wildcard) = tlvs.table.wildcard {
                let _ = writeln!(
                    out,
                    "    \"{from}\" -> \"{to}\" [label=\"tlv *\", style=dotted];",
                    from = node.sym,
                    to = graph.tlv_node(wildcard).sym,
                );
            }
        }
    }
    let _ = writeln!(out, "}}");
    out
}

fn format_key(width: KeyWidth, key: u32) -> String {
    match width {
        KeyWidth::U8 => format!("{key}"),
        KeyWidth::U16 => format!("{key:#06x}"),
        KeyWidth::U32 => format!("{key:#x}"),
    }
}

fn edge_style(back_edges: &[BackEdge], from: NodeId, to: NodeId, key: Option<u32>) -> &'static str {
    let is_back = back_edges
        .iter()
        .any(|edge| edge.from == from && edge.to == to && edge.key == key);
    if is_back {
        ", style=dashed, color=red"
    } else {
        ""
    }
}

#[cfg(test)]
mod test {
    use super::dotify;
    use crate::cycle::back_edges;
    use engine::{Graph, KeyWidth, ParseNode, ProtoNode, Table, UnknownProto};
    use ordermap::OrderMap;

    static LINK: ProtoNode = ProtoNode {
        name: "link",
        min_len: 2,
        overlay: false,
        encap: false,
        key_width: Some(KeyWidth::U16),
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

    #[test]
    fn dump_contains_reachable_edges_and_styles_back_edges() {
        let mut graph: Graph<()> = Graph::new();
        let leaf = graph.push_node(node("leaf_node", &LEAF));
        let root = graph.push_node(node("link_node", &LINK));
        let _island = graph.push_node(node("island_node", &LEAF));
        graph.node_mut(root).table = Some(Table {
            sym: "link_table".to_string(),
            width: KeyWidth::U16,
            entries: [(0x0800u32, leaf), (0x1234u32, root)]
                .into_iter()
                .collect::<OrderMap<_, _>>(),
            wildcard: None,
        });
        let cycles = back_edges(&graph, root);
        let dot = dotify(&graph, root, &cycles);
        assert!(dot.starts_with("digraph parse_graph {"));
        assert!(dot.contains("\"link_node\" -> \"leaf_node\" [label=\"0x0800\"];"));
        assert!(
            dot.contains("\"link_node\" -> \"link_node\" [label=\"0x1234\", style=dashed, color=red];")
        );
        assert!(!dot.contains("island_node"));
    }
}
