// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv6, extension headers, and the fragment header.

use crate::meta::{AddrPair, MetaAll};
use engine::wire::{be16, be32};
use engine::{Ctrl, KeyWidth, ProtoNode, Stop};
use std::net::Ipv6Addr;

/// Fixed IPv6 header length.
pub const HDR_LEN: usize = 40;

/// Extension header length unit.
const EH_UNIT: usize = 8;

const FLOW_LABEL_MASK: u32 = 0x000f_ffff;
const FRAG_OFFSET_MASK: u16 = 0xfff8;

/// IPv6 protocol description: fixed 40 bytes, dispatches on next-header.
pub static IPV6: ProtoNode = ProtoNode {
    name: "ipv6",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U8),
    len: None,
    next_proto: Some(next_proto),
};

/// Hop-by-hop / routing / destination options extension header.
pub static IPV6_EH: ProtoNode = ProtoNode {
    name: "ipv6_eh",
    min_len: EH_UNIT,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U8),
    len: Some(eh_len),
    next_proto: Some(eh_next_proto),
};

/// Fragment extension header: fixed 8 bytes.
pub static IPV6_FRAG_EH: ProtoNode = ProtoNode {
    name: "ipv6_frag_eh",
    min_len: EH_UNIT,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U8),
    len: None,
    next_proto: Some(eh_next_proto),
};

/// The next-header byte.
#[must_use]
pub fn next_proto(hdr: &[u8]) -> u32 {
    u32::from(hdr[6])
}

/// `(hdrlen + 1) * 8` per RFC 8200.
///
/// # Errors
///
/// None; the signature matches the length-callback contract.
pub fn eh_len(hdr: &[u8]) -> Result<usize, Stop> {
    Ok((usize::from(hdr[1]) + 1) * EH_UNIT)
}

/// Next-header byte of an extension header.
#[must_use]
pub fn eh_next_proto(hdr: &[u8]) -> u32 {
    u32::from(hdr[0])
}

/// Record addresses, next-header, and the flow label.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let mut source = [0u8; 16];
    source.copy_from_slice(&hdr[8..24]);
    let mut destination = [0u8; 16];
    destination.copy_from_slice(&hdr[24..40]);
    meta.addrs = Some(AddrPair::V6 {
        source: Ipv6Addr::from(source),
        destination: Ipv6Addr::from(destination),
    });
    meta.ip_proto = Some(hdr[6]);
    meta.flow_label = Some(be32(hdr, 0) & FLOW_LABEL_MASK);
}

/// Track the effective transport protocol across extension headers.
pub fn eh_extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.ip_proto = Some(hdr[0]);
}

/// Record fragment bits (offset is in the second header word).
pub fn frag_extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.ip_proto = Some(hdr[0]);
    meta.is_fragment = true;
    meta.first_fragment = be16(hdr, 2) & FRAG_OFFSET_MASK == 0;
}

/// Stop-flowlabel variant: a nonzero flow label means the flow is
/// already dissected; end the walk successfully after the IPv6 node.
///
/// # Errors
///
/// [`Stop::Okay`] (an early successful stop) on a nonzero flow label.
pub fn stop_flowlabel(hdr: &[u8], _meta: &mut MetaAll, _ctrl: Ctrl) -> Result<(), Stop> {
    if be32(hdr, 0) & FLOW_LABEL_MASK != 0 {
        return Err(Stop::Okay);
    }
    Ok(())
}

/// Non-first fragments carry no parsable payload; stop at the fragment
/// header as if it were a leaf.
///
/// # Errors
///
/// [`Stop::Okay`] when the fragment offset is nonzero.
pub fn frag_stop_nonfirst(hdr: &[u8], _meta: &mut MetaAll, _ctrl: Ctrl) -> Result<(), Stop> {
    if be16(hdr, 2) & FRAG_OFFSET_MASK != 0 {
        return Err(Stop::Okay);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{
        eh_len, eh_next_proto, extract_metadata, frag_extract_metadata, frag_stop_nonfirst,
        next_proto, stop_flowlabel,
    };
    use crate::meta::{AddrPair, MetaAll};
    use engine::{Ctrl, Stop};

    const CTRL: Ctrl = Ctrl {
        hdr_len: 40,
        encaps: 0,
    };

    fn header(next: u8, flow: u32) -> [u8; 40] {
        let mut hdr = [0u8; 40];
        hdr[0..4].copy_from_slice(&(0x6000_0000u32 | flow).to_be_bytes());
        hdr[6] = next;
        hdr[8..24].copy_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        hdr[24..40].copy_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        hdr
    }

    #[test]
    fn extracts_addrs_and_flow_label() {
        let mut meta = MetaAll::new();
        extract_metadata(&header(17, 0x12345), &mut meta, CTRL);
        match meta.addrs {
            Some(AddrPair::V6 {
                source,
                destination,
            }) => {
                assert_eq!(source.segments()[7], 1);
                assert_eq!(destination.segments()[7], 2);
            }
            other => panic!("wrong addrs: {other:?}"),
        }
        assert_eq!(meta.ip_proto, Some(17));
        assert_eq!(meta.flow_label, Some(0x12345));
        assert_eq!(next_proto(&header(17, 0)), 17);
    }

    #[test]
    fn flow_label_stops_when_nonzero() {
        let mut meta = MetaAll::new();
        assert_eq!(stop_flowlabel(&header(6, 0), &mut meta, CTRL), Ok(()));
        assert_eq!(
            stop_flowlabel(&header(6, 1), &mut meta, CTRL),
            Err(Stop::Okay)
        );
    }

    #[test]
    fn extension_header_length() {
        let mut eh = [0u8; 24];
        eh[0] = 6; // next: TCP
        eh[1] = 2; // (2 + 1) * 8 = 24
        assert_eq!(eh_len(&eh), Ok(24));
        assert_eq!(eh_next_proto(&eh), 6);
    }

    #[test]
    fn fragment_header_semantics() {
        let ctrl = Ctrl {
            hdr_len: 8,
            encaps: 0,
        };
        // first fragment: offset 0, M bit set
        let first: [u8; 8] = [17, 0, 0x00, 0x01, 0, 0, 0, 1];
        let mut meta = MetaAll::new();
        frag_extract_metadata(&first, &mut meta, ctrl);
        assert!(meta.is_fragment);
        assert!(meta.first_fragment);
        assert_eq!(frag_stop_nonfirst(&first, &mut meta, ctrl), Ok(()));

        // later fragment: offset 185
        let later: [u8; 8] = [17, 0, 0x05, 0xc9, 0, 0, 0, 1];
        let mut meta = MetaAll::new();
        frag_extract_metadata(&later, &mut meta, ctrl);
        assert!(meta.is_fragment);
        assert!(!meta.first_fragment);
        assert_eq!(
            frag_stop_nonfirst(&later, &mut meta, ctrl),
            Err(Stop::Okay)
        );
    }
}
