// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The generic walk interpreter.
//!
//! Iterative on purpose: deeply tunneled packets must not consume stack.
//! Termination holds because every non-overlay step strictly shrinks the
//! remaining bytes, overlay runs are bounded by `max_overlay_chain`, and
//! encapsulations are bounded by `max_encaps`.

use crate::frame::{Ctrl, Frames};
use crate::graph::Graph;
use crate::node::{NodeId, TlvNodeId, Tlvs};
use crate::stop::Stop;
use tracing::trace;

/// Traversal budgets. All of them exist to bound work on adversarial
/// input; none are hit by well-formed packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Encapsulation layers allowed past the outermost one.
    pub max_encaps: usize,
    /// TLVs processed per header.
    pub max_tlvs: usize,
    /// Wildcard-promotion depth inside the TLV sub-walk.
    pub max_tlv_nesting: usize,
    /// Consecutive steps that re-parse the same byte position.
    pub max_overlay_chain: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_encaps: 4,
            max_tlvs: 64,
            max_tlv_nesting: 2,
            max_overlay_chain: 8,
        }
    }
}

/// Walk `pkt` through `graph` starting at `root`, extracting metadata
/// into `frames` (slot 0 first, rotating on encapsulation).
///
/// Returns [`Stop::Fail`] immediately when `frames` is empty.
pub fn parse<M>(
    graph: &Graph<M>,
    root: NodeId,
    pkt: &[u8],
    frames: &mut [M],
    limits: &Limits,
) -> Stop {
    if frames.is_empty() {
        return Stop::Fail;
    }
    let mut frames = Frames::new(frames);
    let mut node_id = root;
    let mut off = 0usize;
    let mut encaps = 0usize;
    let mut overlay_run = 0usize;
    loop {
        let node = graph.node(node_id);
        let proto = node.proto;
        let rem = pkt.len() - off;
        trace!(node = node.sym.as_str(), off, rem, "visit");
        if rem < proto.min_len {
            return Stop::Length;
        }
        let mut hlen = proto.min_len;
        if let Some(len) = proto.len {
            match len(&pkt[off..]) {
                Ok(0) => {}
                Ok(actual) if actual < proto.min_len => return Stop::Length,
                Ok(actual) => hlen = actual,
                Err(stop) => return stop,
            }
            if rem < hlen {
                return Stop::Length;
            }
        }
        let hdr = &pkt[off..off + hlen];
        let ctrl = Ctrl {
            hdr_len: hlen,
            encaps,
        };
        if let Some(extract) = node.extract {
            extract(hdr, frames.current(), ctrl);
        }
        if let Some(handler) = node.handler {
            if let Err(stop) = handler(hdr, frames.current(), ctrl) {
                return stop;
            }
        }
        if let Some(tlvs) = &node.tlvs {
            if let Err(stop) = walk_tlvs(graph, tlvs, hdr, frames.current(), ctrl, limits) {
                return stop;
            }
            if let Some(post) = tlvs.post {
                if let Err(stop) = post(hdr, frames.current(), ctrl) {
                    return stop;
                }
            }
        }
        let (Some(next_proto), Some(table)) = (proto.next_proto, node.table.as_ref()) else {
            return Stop::Okay;
        };
        let key = next_proto(hdr);
        let Some(target) = table.lookup(key) else {
            trace!(node = node.sym.as_str(), key, "dispatch miss");
            return node.unknown_proto.verdict();
        };
        if proto.encap {
            encaps += 1;
            if encaps > limits.max_encaps {
                return Stop::EncapDepth;
            }
            frames.rotate();
        }
        if proto.overlay || hlen == 0 {
            // same byte position again; budget the run so pathological
            // graphs cannot spin
            overlay_run += 1;
            if overlay_run > limits.max_overlay_chain {
                return Stop::Fail;
            }
        } else {
            off += hlen;
            overlay_run = 0;
        }
        node_id = target;
    }
}

fn walk_tlvs<M>(
    graph: &Graph<M>,
    tlvs: &Tlvs<M>,
    hdr: &[u8],
    frame: &mut M,
    ctrl: Ctrl,
    limits: &Limits,
) -> Result<(), Stop> {
    let layout = tlvs.layout;
    let mut off = layout.start_offset;
    let mut count = 0usize;
    while off < hdr.len() {
        let rest = &hdr[off..];
        let kind = rest[0];
        if layout.eol == Some(kind) {
            break;
        }
        if layout.pad1 == Some(kind) {
            off += 1;
            continue;
        }
        if rest.len() < 2 {
            return Err(Stop::TlvLength);
        }
        let len = (layout.len)(rest);
        if len < 2 || len > rest.len() {
            return Err(Stop::TlvLength);
        }
        count += 1;
        if count > limits.max_tlvs {
            return Err(Stop::TlvLength);
        }
        let tlv = &rest[..len];
        let tlv_ctrl = Ctrl {
            hdr_len: len,
            encaps: ctrl.encaps,
        };
        match tlvs.table.entries.get(&u32::from(kind)).copied() {
            Some(id) => run_tlv(graph, tlvs, id, tlv, frame, tlv_ctrl, limits, 0)?,
            None => promote(graph, tlvs, tlv, frame, tlv_ctrl, limits, 0)?,
        }
        off += len;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_tlv<M>(
    graph: &Graph<M>,
    tlvs: &Tlvs<M>,
    id: TlvNodeId,
    tlv: &[u8],
    frame: &mut M,
    ctrl: Ctrl,
    limits: &Limits,
    depth: usize,
) -> Result<(), Stop> {
    let node = graph.tlv_node(id);
    if let Some(check) = node.check {
        if check(tlv, frame).is_err() {
            return promote(graph, tlvs, tlv, frame, ctrl, limits, depth + 1);
        }
    }
    if let Some(extract) = node.extract {
        extract(tlv, frame, ctrl);
    }
    if let Some(handler) = node.handler {
        handler(tlv, frame, ctrl)?;
    }
    Ok(())
}

fn promote<M>(
    graph: &Graph<M>,
    tlvs: &Tlvs<M>,
    tlv: &[u8],
    frame: &mut M,
    ctrl: Ctrl,
    limits: &Limits,
    depth: usize,
) -> Result<(), Stop> {
    if depth > limits.max_tlv_nesting {
        return Err(Stop::TlvLength);
    }
    match tlvs.table.wildcard {
        Some(wildcard) => run_tlv(graph, tlvs, wildcard, tlv, frame, ctrl, limits, depth),
        None => match tlvs.unknown_tlv {
            None => Ok(()),
            Some(stop) => Err(stop),
        },
    }
}
