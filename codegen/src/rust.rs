// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The Rust emitter.

use core::fmt::Write;
use engine::{Graph, KeyWidth, Limits, NodeId, ParseNode, TlvNode, Tlvs, UnknownProto};

/// Paths and budgets baked into the generated module.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Path of the metadata frame type, e.g. `crate::MetaAll`.
    pub meta_type: String,
    /// Path of the helper module carrying the protocol callbacks.
    pub helpers: String,
    /// Path of the engine crate (for `Stop`, `Ctrl`, `Frames`).
    pub engine_path: String,
    /// Traversal budgets, emitted as constants.
    pub limits: Limits,
    /// Provenance string for the `@generated` header.
    pub source: String,
}

impl Default for GenConfig {
    fn default() -> GenConfig {
        GenConfig {
            meta_type: "net::MetaAll".to_string(),
            helpers: "net::helpers".to_string(),
            engine_path: "engine".to_string(),
            limits: Limits::default(),
            source: "declarations".to_string(),
        }
    }
}

/// Generation failure.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Nothing to emit without a registered root.
    #[error("graph has no registered roots")]
    NoRoots,
}

/// Emit a self-contained walker module for every root of `graph`.
///
/// Output is deterministic: vertices are emitted in graph order,
/// filtered to those reachable from the registered roots.
///
/// # Errors
///
/// [`GenError::NoRoots`] when the graph has no registered parsers.
pub fn generate<M>(graph: &Graph<M>, cfg: &GenConfig) -> Result<String, GenError> {
    if graph.roots().is_empty() {
        return Err(GenError::NoRoots);
    }
    let reachable = reachable_set(graph);
    let mut out = String::new();
    preamble(&mut out, graph, cfg);
    vertex_enum(&mut out, graph, &reachable);
    step_enum(&mut out);
    for root in graph.roots() {
        entry_fn(&mut out, graph, root);
    }
    run_fn(&mut out, graph, &reachable);
    for (id, node) in graph.nodes() {
        if !reachable[id.index()] {
            continue;
        }
        node_fn(&mut out, graph, node);
        if let Some(tlvs) = &node.tlvs {
            tlv_walk_fn(&mut out, node, tlvs);
            tlv_dispatch_fn(&mut out, graph, node, tlvs);
            tlv_promote_fn(&mut out, graph, node, tlvs);
        }
    }
    Ok(out)
}

fn reachable_set<M>(graph: &Graph<M>) -> Vec<bool> {
    let mut reachable = vec![false; graph.node_count()];
    let mut stack: Vec<NodeId> = Vec::new();
    for root in graph.roots() {
        if !reachable[root.node.index()] {
            reachable[root.node.index()] = true;
            stack.push(root.node);
        }
    }
    while let Some(node) = stack.pop() {
        if let Some(table) = &graph.node(node).table {
            for target in table.entries.values().copied().chain(table.wildcard) {
                if !reachable[target.index()] {
                    reachable[target.index()] = true;
                    stack.push(target);
                }
            }
        }
    }
    reachable
}

/// `ether_node` -> `EtherNode`.
fn camel(sym: &str) -> String {
    let mut out = String::new();
    for part in sym.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn key_literal(width: KeyWidth, key: u32) -> String {
    match width {
        KeyWidth::U8 => format!("{key}"),
        KeyWidth::U16 => format!("{key:#06x}"),
        KeyWidth::U32 => format!("{key:#x}"),
    }
}

fn preamble<M>(out: &mut String, graph: &Graph<M>, cfg: &GenConfig) {
    let parsers = graph
        .roots()
        .iter()
        .map(|root| root.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "// @generated by pgc from {}; do not edit.", cfg.source);
    let _ = writeln!(out, "//");
    let _ = writeln!(out, "// Specialized walker for: {parsers}.");
    let _ = writeln!(out, "#![allow(clippy::all, clippy::pedantic)]");
    let _ = writeln!(out, "#![allow(unused_variables, unused_mut, unreachable_patterns)]");
    let _ = writeln!(out);
    let _ = writeln!(out, "use {}::{{Ctrl, Frames, Stop}};", cfg.engine_path);
    let _ = writeln!(out, "use {} as helpers;", cfg.helpers);
    let _ = writeln!(out, "use {} as Meta;", cfg.meta_type);
    let _ = writeln!(out);
    let _ = writeln!(out, "const MAX_ENCAPS: usize = {};", cfg.limits.max_encaps);
    let _ = writeln!(out, "const MAX_TLVS: usize = {};", cfg.limits.max_tlvs);
    let _ = writeln!(
        out,
        "const MAX_TLV_NESTING: usize = {};",
        cfg.limits.max_tlv_nesting
    );
    let _ = writeln!(
        out,
        "const MAX_OVERLAY_CHAIN: usize = {};",
        cfg.limits.max_overlay_chain
    );
    let _ = writeln!(out);
}

fn vertex_enum<M>(out: &mut String, graph: &Graph<M>, reachable: &[bool]) {
    let _ = writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
    let _ = writeln!(out, "enum Vertex {{");
    for (id, node) in graph.nodes() {
        if reachable[id.index()] {
            let _ = writeln!(out, "    {},", camel(&node.sym));
        }
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn step_enum(out: &mut String) {
    let _ = writeln!(out, "enum Step {{");
    let _ = writeln!(out, "    Next {{");
    let _ = writeln!(out, "        target: Vertex,");
    let _ = writeln!(out, "        hlen: usize,");
    let _ = writeln!(out, "        overlay: bool,");
    let _ = writeln!(out, "        encap: bool,");
    let _ = writeln!(out, "    }},");
    let _ = writeln!(out, "    Halt(Stop),");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn entry_fn<M>(out: &mut String, graph: &Graph<M>, root: &engine::Root) {
    let _ = writeln!(out, "/// {}.", root.desc);
    let _ = writeln!(
        out,
        "pub fn parse_{}(pkt: &[u8], frames: &mut [Meta]) -> Stop {{",
        root.name
    );
    let _ = writeln!(
        out,
        "    run(Vertex::{}, pkt, frames)",
        camel(&graph.node(root.node).sym)
    );
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn run_fn<M>(out: &mut String, graph: &Graph<M>, reachable: &[bool]) {
    let _ = writeln!(out, "fn run(root: Vertex, pkt: &[u8], frames: &mut [Meta]) -> Stop {{");
    let _ = writeln!(out, "    if frames.is_empty() {{");
    let _ = writeln!(out, "        return Stop::Fail;");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    let mut frames = Frames::new(frames);");
    let _ = writeln!(out, "    let mut vertex = root;");
    let _ = writeln!(out, "    let mut off = 0usize;");
    let _ = writeln!(out, "    let mut encaps = 0usize;");
    let _ = writeln!(out, "    let mut overlay_run = 0usize;");
    let _ = writeln!(out, "    loop {{");
    let _ = writeln!(out, "        let step = match vertex {{");
    for (id, node) in graph.nodes() {
        if reachable[id.index()] {
            let _ = writeln!(
                out,
                "            Vertex::{} => {}(pkt, off, frames.current(), encaps),",
                camel(&node.sym),
                node.sym
            );
        }
    }
    let _ = writeln!(out, "        }};");
    let _ = writeln!(out, "        match step {{");
    let _ = writeln!(out, "            Step::Halt(stop) => return stop,");
    let _ = writeln!(out, "            Step::Next {{");
    let _ = writeln!(out, "                target,");
    let _ = writeln!(out, "                hlen,");
    let _ = writeln!(out, "                overlay,");
    let _ = writeln!(out, "                encap,");
    let _ = writeln!(out, "            }} => {{");
    let _ = writeln!(out, "                if encap {{");
    let _ = writeln!(out, "                    encaps += 1;");
    let _ = writeln!(out, "                    if encaps > MAX_ENCAPS {{");
    let _ = writeln!(out, "                        return Stop::EncapDepth;");
    let _ = writeln!(out, "                    }}");
    let _ = writeln!(out, "                    frames.rotate();");
    let _ = writeln!(out, "                }}");
    let _ = writeln!(out, "                if overlay || hlen == 0 {{");
    let _ = writeln!(out, "                    overlay_run += 1;");
    let _ = writeln!(out, "                    if overlay_run > MAX_OVERLAY_CHAIN {{");
    let _ = writeln!(out, "                        return Stop::Fail;");
    let _ = writeln!(out, "                    }}");
    let _ = writeln!(out, "                }} else {{");
    let _ = writeln!(out, "                    off += hlen;");
    let _ = writeln!(out, "                    overlay_run = 0;");
    let _ = writeln!(out, "                }}");
    let _ = writeln!(out, "                vertex = target;");
    let _ = writeln!(out, "            }}");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

#[allow(clippy::too_many_lines)]
fn node_fn<M>(out: &mut String, graph: &Graph<M>, node: &ParseNode<M>) {
    let proto = node.proto;
    let _ = writeln!(out, "#[inline(always)]");
    let _ = writeln!(
        out,
        "fn {}(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {{",
        node.sym
    );
    let _ = writeln!(out, "    let rem = pkt.len() - off;");
    if proto.min_len > 0 {
        let _ = writeln!(out, "    if rem < {} {{", proto.min_len);
        let _ = writeln!(out, "        return Step::Halt(Stop::Length);");
        let _ = writeln!(out, "    }}");
    }
    if proto.len.is_some() {
        let _ = writeln!(
            out,
            "    let hlen = match helpers::{}_len(&pkt[off..]) {{",
            node.proto_sym
        );
        if proto.min_len > 0 {
            let _ = writeln!(out, "        Ok(0) => {},", proto.min_len);
            let _ = writeln!(
                out,
                "        Ok(hlen) if hlen < {} => return Step::Halt(Stop::Length),",
                proto.min_len
            );
        }
        let _ = writeln!(out, "        Ok(hlen) => hlen,");
        let _ = writeln!(out, "        Err(stop) => return Step::Halt(stop),");
        let _ = writeln!(out, "    }};");
        let _ = writeln!(out, "    if rem < hlen {{");
        let _ = writeln!(out, "        return Step::Halt(Stop::Length);");
        let _ = writeln!(out, "    }}");
    } else {
        let _ = writeln!(out, "    let hlen = {}usize;", proto.min_len);
    }
    let _ = writeln!(out, "    let hdr = &pkt[off..off + hlen];");
    let _ = writeln!(out, "    let ctrl = Ctrl {{");
    let _ = writeln!(out, "        hdr_len: hlen,");
    let _ = writeln!(out, "        encaps,");
    let _ = writeln!(out, "    }};");
    if let Some(extract) = &node.extract_sym {
        let _ = writeln!(out, "    helpers::{extract}(hdr, frame, ctrl);");
    }
    if let Some(handler) = &node.handler_sym {
        let _ = writeln!(
            out,
            "    if let Err(stop) = helpers::{handler}(hdr, frame, ctrl) {{"
        );
        let _ = writeln!(out, "        return Step::Halt(stop);");
        let _ = writeln!(out, "    }}");
    }
    if let Some(tlvs) = &node.tlvs {
        let _ = writeln!(
            out,
            "    if let Err(stop) = {}_tlvs(hdr, frame, ctrl) {{",
            node.sym
        );
        let _ = writeln!(out, "        return Step::Halt(stop);");
        let _ = writeln!(out, "    }}");
        if let Some(post) = &tlvs.post_sym {
            let _ = writeln!(
                out,
                "    if let Err(stop) = helpers::{post}(hdr, frame, ctrl) {{"
            );
            let _ = writeln!(out, "        return Step::Halt(stop);");
            let _ = writeln!(out, "    }}");
        }
    }
    match (&node.table, proto.next_proto.is_some()) {
        (Some(table), true) => {
            let _ = writeln!(
                out,
                "    let target = match helpers::{}_next_proto(hdr) {{",
                node.proto_sym
            );
            for (&key, &target) in &table.entries {
                let _ = writeln!(
                    out,
                    "        {} => Vertex::{},",
                    key_literal(table.width, key),
                    camel(&graph.node(target).sym)
                );
            }
            match table.wildcard {
                Some(wildcard) => {
                    let _ = writeln!(
                        out,
                        "        _ => Vertex::{},",
                        camel(&graph.node(wildcard).sym)
                    );
                }
                None => {
                    let miss = match node.unknown_proto {
                        UnknownProto::Reject => "Stop::UnknownProto",
                        UnknownProto::StopOkay | UnknownProto::Leaf => "Stop::Okay",
                    };
                    let _ = writeln!(out, "        _ => return Step::Halt({miss}),");
                }
            }
            let _ = writeln!(out, "    }};");
            let _ = writeln!(out, "    Step::Next {{");
            let _ = writeln!(out, "        target,");
            let _ = writeln!(out, "        hlen,");
            let _ = writeln!(out, "        overlay: {},", proto.overlay);
            let _ = writeln!(out, "        encap: {},", proto.encap);
            let _ = writeln!(out, "    }}");
        }
        _ => {
            let _ = writeln!(out, "    Step::Halt(Stop::Okay)");
        }
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn tlv_walk_fn<M>(out: &mut String, node: &ParseNode<M>, tlvs: &Tlvs<M>) {
    let layout = tlvs.layout;
    let _ = writeln!(
        out,
        "fn {}_tlvs(hdr: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {{",
        node.sym
    );
    let _ = writeln!(out, "    let mut off = {}usize;", layout.start_offset);
    let _ = writeln!(out, "    let mut count = 0usize;");
    let _ = writeln!(out, "    while off < hdr.len() {{");
    let _ = writeln!(out, "        let rest = &hdr[off..];");
    let _ = writeln!(out, "        let kind = rest[0];");
    if let Some(eol) = layout.eol {
        let _ = writeln!(out, "        if kind == {eol}u8 {{");
        let _ = writeln!(out, "            break;");
        let _ = writeln!(out, "        }}");
    }
    if let Some(pad1) = layout.pad1 {
        let _ = writeln!(out, "        if kind == {pad1}u8 {{");
        let _ = writeln!(out, "            off += 1;");
        let _ = writeln!(out, "            continue;");
        let _ = writeln!(out, "        }}");
    }
    let _ = writeln!(out, "        if rest.len() < 2 {{");
    let _ = writeln!(out, "            return Err(Stop::TlvLength);");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(
        out,
        "        let len = helpers::{}_tlv_len(rest);",
        node.proto_sym
    );
    let _ = writeln!(out, "        if len < 2 || len > rest.len() {{");
    let _ = writeln!(out, "            return Err(Stop::TlvLength);");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "        count += 1;");
    let _ = writeln!(out, "        if count > MAX_TLVS {{");
    let _ = writeln!(out, "            return Err(Stop::TlvLength);");
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "        let tlv = &rest[..len];");
    let _ = writeln!(out, "        let tlv_ctrl = Ctrl {{");
    let _ = writeln!(out, "            hdr_len: len,");
    let _ = writeln!(out, "            encaps: ctrl.encaps,");
    let _ = writeln!(out, "        }};");
    let _ = writeln!(
        out,
        "        {}_dispatch(kind, tlv, frame, tlv_ctrl)?;",
        node.sym
    );
    let _ = writeln!(out, "        off += len;");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    Ok(())");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn tlv_node_body<M>(out: &mut String, tlv_node: &TlvNode<M>, indent: &str) {
    if let Some(check) = &tlv_node.check_sym {
        let _ = writeln!(
            out,
            "{indent}if helpers::{check}(tlv, frame).is_err() {{"
        );
        let _ = writeln!(out, "{indent}    depth += 1;");
        let _ = writeln!(out, "{indent}    return promote(depth, tlv, frame, ctrl);");
        let _ = writeln!(out, "{indent}}}");
    }
    if let Some(extract) = &tlv_node.extract_sym {
        let _ = writeln!(out, "{indent}helpers::{extract}(tlv, frame, ctrl);");
    }
    if let Some(handler) = &tlv_node.handler_sym {
        let _ = writeln!(out, "{indent}helpers::{handler}(tlv, frame, ctrl)?;");
    }
    let _ = writeln!(out, "{indent}Ok(())");
}

fn tlv_dispatch_fn<M>(out: &mut String, graph: &Graph<M>, node: &ParseNode<M>, tlvs: &Tlvs<M>) {
    let _ = writeln!(
        out,
        "fn {}_dispatch(kind: u8, tlv: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {{",
        node.sym
    );
    let _ = writeln!(out, "    let mut depth = 0usize;");
    let _ = writeln!(out, "    let promote = {}_promote;", node.sym);
    let _ = writeln!(out, "    match kind {{");
    for (&key, &target) in &tlvs.table.entries {
        let tlv_node = graph.tlv_node(target);
        let _ = writeln!(out, "        {key}u8 => {{");
        tlv_node_body(out, tlv_node, "            ");
        let _ = writeln!(out, "        }}");
    }
    let _ = writeln!(out, "        _ => promote(depth, tlv, frame, ctrl),");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn tlv_promote_fn<M>(out: &mut String, graph: &Graph<M>, node: &ParseNode<M>, tlvs: &Tlvs<M>) {
    match tlvs.table.wildcard {
        None => {
            let _ = writeln!(
                out,
                "fn {}_promote(depth: usize, tlv: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {{",
                node.sym
            );
            let _ = writeln!(out, "    if depth > MAX_TLV_NESTING {{");
            let _ = writeln!(out, "        return Err(Stop::TlvLength);");
            let _ = writeln!(out, "    }}");
            match tlvs.unknown_tlv {
                None => {
                    let _ = writeln!(out, "    Ok(())");
                }
                Some(stop) => {
                    let _ = writeln!(out, "    Err(Stop::{stop:?})");
                }
            }
            let _ = writeln!(out, "}}");
        }
        Some(wildcard) => {
            let tlv_node = graph.tlv_node(wildcard);
            let _ = writeln!(
                out,
                "fn {}_promote(mut depth: usize, tlv: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {{",
                node.sym
            );
            let _ = writeln!(out, "    loop {{");
            let _ = writeln!(out, "        if depth > MAX_TLV_NESTING {{");
            let _ = writeln!(out, "            return Err(Stop::TlvLength);");
            let _ = writeln!(out, "        }}");
            if let Some(check) = &tlv_node.check_sym {
                let _ = writeln!(
                    out,
                    "        if helpers::{check}(tlv, frame).is_err() {{"
                );
                let _ = writeln!(out, "            depth += 1;");
                let _ = writeln!(out, "            continue;");
                let _ = writeln!(out, "        }}");
            }
            if let Some(extract) = &tlv_node.extract_sym {
                let _ = writeln!(out, "        helpers::{extract}(tlv, frame, ctrl);");
            }
            if let Some(handler) = &tlv_node.handler_sym {
                let _ = writeln!(out, "        helpers::{handler}(tlv, frame, ctrl)?;");
            }
            let _ = writeln!(out, "        return Ok(());");
            let _ = writeln!(out, "    }}");
            let _ = writeln!(out, "}}");
        }
    }
    let _ = writeln!(out);
}
