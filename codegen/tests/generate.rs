// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Shape and determinism of the emitted walker.

use codegen::{GenConfig, GenError};
use engine::Graph;
use graph::{Decl, DeclRecord, TableKey};
use net::MetaAll;
use pretty_assertions::assert_eq;

fn big_graph() -> Graph<MetaAll> {
    net::parsers::big::build().unwrap().graph
}

fn cfg() -> GenConfig {
    GenConfig {
        meta_type: "crate::MetaAll".to_string(),
        helpers: "crate::helpers".to_string(),
        engine_path: "engine".to_string(),
        source: "builtin declarations".to_string(),
        ..GenConfig::default()
    }
}

#[test]
fn emits_entry_points_and_dispatch() {
    let code = codegen::generate(&big_graph(), &cfg()).unwrap();
    assert!(code.starts_with("// @generated by pgc from builtin declarations; do not edit."));
    assert!(code.contains("pub fn parse_big_ether(pkt: &[u8], frames: &mut [Meta]) -> Stop {"));
    assert!(code.contains("pub fn parse_big_ip(pkt: &[u8], frames: &mut [Meta]) -> Stop {"));
    // dispatch tables are lowered to literal matches
    assert!(code.contains("        0x0800 => Vertex::Ipv4CheckNode,"));
    assert!(code.contains("        47 => Vertex::GreBaseNode,"));
    assert!(code.contains("        _ => return Step::Halt(Stop::UnknownProto),"));
    // the TLV sub-walk is inlined
    assert!(code.contains("fn tcp_node_tlvs(hdr: &[u8], frame: &mut Meta, ctrl: Ctrl)"));
    assert!(code.contains("        2u8 => {"));
    // budgets are baked in
    assert!(code.contains("const MAX_ENCAPS: usize = 4;"));
    // overlays and encaps keep their semantics
    assert!(code.contains("overlay: true,"));
    assert!(code.contains("encap: true,"));
}

#[test]
fn generation_is_deterministic() {
    let first = codegen::generate(&big_graph(), &cfg()).unwrap();
    let second = codegen::generate(&big_graph(), &cfg()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rootless_graph_is_rejected() {
    let graph: Graph<MetaAll> = Graph::new();
    assert!(matches!(
        codegen::generate(&graph, &cfg()),
        Err(GenError::NoRoots)
    ));
}

#[test]
fn wildcard_edges_become_fallback_arms() {
    let records: Vec<DeclRecord> = [
        Decl::MakeProtoTable {
            name: "t".to_string(),
            entries: vec![
                (TableKey::Key(0x0800), "ports_node".to_string()),
                (TableKey::Wildcard, "ports_node".to_string()),
            ],
        },
        Decl::MakeParseNode {
            name: "ether_node".to_string(),
            proto: "ether".to_string(),
            metadata: None,
            handler: None,
            table: "t".to_string(),
        },
        Decl::MakeLeafParseNode {
            name: "ports_node".to_string(),
            proto: "ports".to_string(),
            metadata: Some("ports_metadata".to_string()),
            handler: None,
        },
        Decl::ParserAdd {
            name: "tiny".to_string(),
            desc: "tiny parser".to_string(),
            root: "ether_node".to_string(),
        },
    ]
    .into_iter()
    .map(DeclRecord::builtin)
    .collect();
    let built = graph::build(&net::registry(), &records).unwrap();
    let code = codegen::generate(&built.graph, &cfg()).unwrap();
    assert!(code.contains("        _ => Vertex::PortsNode,"));
    assert!(code.contains("pub fn parse_tiny"));
}
