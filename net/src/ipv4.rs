// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv4.

use crate::meta::{AddrPair, MetaAll};
use engine::wire::be16;
use engine::{Ctrl, KeyWidth, ProtoNode, Stop};
use std::net::Ipv4Addr;

/// Length of an option-less IPv4 header.
pub const MIN_LEN: usize = 20;

const MORE_FRAGMENTS: u16 = 0x2000;
const FRAG_OFFSET_MASK: u16 = 0x1fff;

/// IPv4 protocol description: IHL-derived length, dispatches on the
/// protocol byte.
pub static IPV4: ProtoNode = ProtoNode {
    name: "ipv4",
    min_len: MIN_LEN,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U8),
    len: Some(len),
    next_proto: Some(next_proto),
};

/// `IHL * 4` after checking the version nibble.
///
/// # Errors
///
/// [`Stop::Fail`] when the version nibble is not 4. An IHL below 5 comes
/// back smaller than [`MIN_LEN`] and the engine rejects it as a length
/// error.
pub fn len(hdr: &[u8]) -> Result<usize, Stop> {
    if hdr[0] >> 4 != 4 {
        return Err(Stop::Fail);
    }
    Ok(usize::from(hdr[0] & 0x0f) * 4)
}

/// The protocol byte.
#[must_use]
pub fn next_proto(hdr: &[u8]) -> u32 {
    u32::from(hdr[9])
}

/// Record addresses, protocol, and fragment bits.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.addrs = Some(AddrPair::V4 {
        source: Ipv4Addr::new(hdr[12], hdr[13], hdr[14], hdr[15]),
        destination: Ipv4Addr::new(hdr[16], hdr[17], hdr[18], hdr[19]),
    });
    meta.ip_proto = Some(hdr[9]);
    let frag = be16(hdr, 6);
    let offset = frag & FRAG_OFFSET_MASK;
    meta.is_fragment = offset != 0 || frag & MORE_FRAGMENTS != 0;
    meta.first_fragment = meta.is_fragment && offset == 0;
}
