// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! ICMPv4 and ICMPv6 leaves.

use crate::meta::{IcmpMeta, MetaAll};
use engine::wire::be16;
use engine::{Ctrl, ProtoNode};

/// Common ICMP header length.
pub const HDR_LEN: usize = 8;

const V4_ECHO_REPLY: u8 = 0;
const V4_ECHO_REQUEST: u8 = 8;
const V6_ECHO_REQUEST: u8 = 128;
const V6_ECHO_REPLY: u8 = 129;

/// ICMPv4 leaf.
pub static ICMPV4: ProtoNode = ProtoNode {
    name: "icmpv4",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// ICMPv6 leaf.
pub static ICMPV6: ProtoNode = ProtoNode {
    name: "icmpv6",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// Record type and code; echo messages also carry an identifier.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let kind = hdr[0];
    let id = match kind {
        V4_ECHO_REPLY | V4_ECHO_REQUEST | V6_ECHO_REQUEST | V6_ECHO_REPLY => {
            Some(be16(hdr, 4))
        }
        _ => None,
    };
    meta.icmp = Some(IcmpMeta {
        kind,
        code: hdr[1],
        id,
    });
}

#[cfg(test)]
mod test {
    use super::extract_metadata;
    use crate::meta::MetaAll;
    use engine::Ctrl;

    const CTRL: Ctrl = Ctrl {
        hdr_len: 8,
        encaps: 0,
    };

    #[test]
    fn echo_request_has_id() {
        let hdr = [8, 0, 0xab, 0xcd, 0x12, 0x34, 0x00, 0x01];
        let mut meta = MetaAll::new();
        extract_metadata(&hdr, &mut meta, CTRL);
        let icmp = meta.icmp.unwrap();
        assert_eq!(icmp.kind, 8);
        assert_eq!(icmp.code, 0);
        assert_eq!(icmp.id, Some(0x1234));
    }

    #[test]
    fn unreachable_has_no_id() {
        let hdr = [3, 1, 0, 0, 0, 0, 0, 0];
        let mut meta = MetaAll::new();
        extract_metadata(&hdr, &mut meta, CTRL);
        assert_eq!(meta.icmp.unwrap().id, None);
    }
}
