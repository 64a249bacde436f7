// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MPLS label stacks.

use crate::meta::{MetaAll, MplsMeta};
use engine::wire::be32;
use engine::{Ctrl, ProtoNode, Stop};

/// One label stack entry.
pub const LSE_LEN: usize = 4;

const BOS_BIT: u32 = 0x100;

/// MPLS is a leaf: the walk ends once the stack is measured.
pub static MPLS: ProtoNode = ProtoNode {
    name: "mpls",
    min_len: LSE_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: Some(len),
    next_proto: None,
};

/// Walk the shim stack to the bottom-of-stack bit.
///
/// A stack that runs off the buffer comes back longer than the remaining
/// bytes and the engine rejects it as a length error.
///
/// # Errors
///
/// None; the signature matches the length-callback contract.
pub fn len(hdr: &[u8]) -> Result<usize, Stop> {
    let mut off = 0;
    loop {
        if off + LSE_LEN > hdr.len() {
            return Ok(off + LSE_LEN);
        }
        let entry = be32(hdr, off);
        off += LSE_LEN;
        if entry & BOS_BIT != 0 {
            return Ok(off);
        }
    }
}

/// Record the top label entry.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let entry = be32(hdr, 0);
    meta.mpls = Some(MplsMeta {
        label: entry >> 12,
        tc: ((entry >> 9) & 0x7) as u8,
        bos: entry & BOS_BIT != 0,
        ttl: (entry & 0xff) as u8,
    });
}
