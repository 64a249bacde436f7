// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! ARP and RARP leaves.

use crate::meta::{ArpMeta, MetaAll};
use engine::wire::be16;
use engine::{Ctrl, ProtoNode};
use std::net::Ipv4Addr;
use tracing::trace;

/// Ethernet/IPv4 ARP packet length.
pub const HDR_LEN: usize = 28;

const HTYPE_ETHER: u16 = 1;
const PTYPE_IPV4: u16 = 0x0800;

/// ARP leaf.
pub static ARP: ProtoNode = ProtoNode {
    name: "arp",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// RARP leaf (same layout, different EtherType).
pub static RARP: ProtoNode = ProtoNode {
    name: "rarp",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// Record sender/target pairs for Ethernet/IPv4 ARP; other combinations
/// are left alone.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    if be16(hdr, 0) != HTYPE_ETHER || be16(hdr, 2) != PTYPE_IPV4 || hdr[4] != 6 || hdr[5] != 4 {
        trace!("not an ethernet/ipv4 arp packet");
        return;
    }
    let mut sender_hw = [0u8; 6];
    sender_hw.copy_from_slice(&hdr[8..14]);
    let mut target_hw = [0u8; 6];
    target_hw.copy_from_slice(&hdr[18..24]);
    meta.arp = Some(ArpMeta {
        op: be16(hdr, 6),
        sender_hw,
        sender_ip: Ipv4Addr::new(hdr[14], hdr[15], hdr[16], hdr[17]),
        target_hw,
        target_ip: Ipv4Addr::new(hdr[24], hdr[25], hdr[26], hdr[27]),
    });
}

#[cfg(test)]
mod test {
    use super::extract_metadata;
    use crate::meta::MetaAll;
    use engine::Ctrl;
    use std::net::Ipv4Addr;

    const CTRL: Ctrl = Ctrl {
        hdr_len: 28,
        encaps: 0,
    };

    #[test]
    fn ethernet_ipv4_request() {
        let mut hdr = [0u8; 28];
        hdr[0..8].copy_from_slice(&[0, 1, 0x08, 0x00, 6, 4, 0, 1]);
        hdr[8..14].copy_from_slice(&[2, 0, 0, 0, 0, 1]);
        hdr[14..18].copy_from_slice(&[192, 168, 0, 1]);
        hdr[24..28].copy_from_slice(&[192, 168, 0, 2]);
        let mut meta = MetaAll::new();
        extract_metadata(&hdr, &mut meta, CTRL);
        let arp = meta.arp.unwrap();
        assert_eq!(arp.op, 1);
        assert_eq!(arp.sender_ip, Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(arp.target_ip, Ipv4Addr::new(192, 168, 0, 2));
        assert_eq!(arp.sender_hw, [2, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn foreign_hardware_type_is_skipped() {
        let mut hdr = [0u8; 28];
        hdr[0..8].copy_from_slice(&[0, 6, 0x08, 0x00, 16, 4, 0, 1]);
        let mut meta = MetaAll::new();
        extract_metadata(&hdr, &mut meta, CTRL);
        assert!(meta.arp.is_none());
    }
}
