// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet II.

use crate::meta::{EtherMeta, MetaAll};
use engine::wire::be16;
use engine::{Ctrl, KeyWidth, ProtoNode};

/// Ethernet header length.
pub const HDR_LEN: usize = 14;

/// IPv4.
pub const ETH_P_IP: u32 = 0x0800;
/// ARP.
pub const ETH_P_ARP: u32 = 0x0806;
/// RARP.
pub const ETH_P_RARP: u32 = 0x8035;
/// 802.1Q VLAN.
pub const ETH_P_8021Q: u32 = 0x8100;
/// Transparent Ethernet bridging (GRE TEB).
pub const ETH_P_TEB: u32 = 0x6558;
/// IPv6.
pub const ETH_P_IPV6: u32 = 0x86dd;
/// MPLS unicast.
pub const ETH_P_MPLS_UC: u32 = 0x8847;
/// MPLS multicast.
pub const ETH_P_MPLS_MC: u32 = 0x8848;
/// 802.1AD provider bridging.
pub const ETH_P_8021AD: u32 = 0x88a8;
/// TIPC.
pub const ETH_P_TIPC: u32 = 0x88ca;
/// FCoE.
pub const ETH_P_FCOE: u32 = 0x8906;
/// B.A.T.M.A.N. advanced.
pub const ETH_P_BATMAN: u32 = 0x4305;

/// Ethernet protocol description: fixed 14 bytes, dispatches on the
/// EtherType.
pub static ETHER: ProtoNode = ProtoNode {
    name: "ether",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U16),
    len: None,
    next_proto: Some(next_proto),
};

/// EtherType at offset 12.
#[must_use]
pub fn next_proto(hdr: &[u8]) -> u32 {
    u32::from(be16(hdr, 12))
}

/// Record both MACs and the EtherType.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let mut destination = [0u8; 6];
    destination.copy_from_slice(&hdr[0..6]);
    let mut source = [0u8; 6];
    source.copy_from_slice(&hdr[6..12]);
    meta.ether = Some(EtherMeta {
        destination,
        source,
    });
    meta.eth_proto = Some(be16(hdr, 12));
}

#[cfg(test)]
mod test {
    use super::{ETH_P_IP, ETHER, extract_metadata, next_proto};
    use crate::meta::MetaAll;
    use engine::Ctrl;

    const FRAME: [u8; 14] = [
        0x02, 0x00, 0x00, 0x00, 0x00, 0x01, // dst
        0x02, 0x00, 0x00, 0x00, 0x00, 0x02, // src
        0x08, 0x00, // IPv4
    ];

    #[test]
    fn dispatches_on_ethertype() {
        assert_eq!(next_proto(&FRAME), ETH_P_IP);
        assert_eq!(ETHER.min_len, 14);
    }

    #[test]
    fn extracts_macs() {
        let mut meta = MetaAll::new();
        extract_metadata(
            &FRAME,
            &mut meta,
            Ctrl {
                hdr_len: 14,
                encaps: 0,
            },
        );
        let ether = meta.ether.unwrap();
        assert_eq!(ether.destination, [0x02, 0, 0, 0, 0, 0x01]);
        assert_eq!(ether.source, [0x02, 0, 0, 0, 0, 0x02]);
        assert_eq!(meta.eth_proto, Some(0x0800));
    }
}
