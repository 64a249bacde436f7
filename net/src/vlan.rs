// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! 802.1Q / 802.1AD VLAN tags.

use crate::meta::{MetaAll, VlanMeta};
use engine::wire::be16;
use engine::{Ctrl, KeyWidth, ProtoNode};
use tracing::debug;

/// Tag length.
pub const HDR_LEN: usize = 4;

const VID_MASK: u16 = 0x0fff;
const DEI_MASK: u16 = 0x1000;

/// One description serves both the Q and AD parse nodes; the EtherType
/// that led here is what distinguishes them.
pub static VLAN: ProtoNode = ProtoNode {
    name: "vlan",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U16),
    len: None,
    next_proto: Some(next_proto),
};

/// The inner EtherType.
#[must_use]
pub fn next_proto(hdr: &[u8]) -> u32 {
    u32::from(be16(hdr, 2))
}

/// Push the tag onto the frame's VLAN stack (outermost first); tags past
/// the stack bound are parsed but not recorded.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let tci = be16(hdr, 0);
    let tag = VlanMeta {
        vid: tci & VID_MASK,
        pcp: (tci >> 13) as u8,
        dei: tci & DEI_MASK != 0,
    };
    if meta.vlans.try_push(tag).is_err() {
        debug!(vid = tag.vid, "vlan stack full, tag not recorded");
    }
}

#[cfg(test)]
mod test {
    use super::{extract_metadata, next_proto};
    use crate::meta::{MAX_VLANS, MetaAll};
    use engine::Ctrl;

    const CTRL: Ctrl = Ctrl {
        hdr_len: 4,
        encaps: 0,
    };

    #[test]
    fn splits_the_tci() {
        // pcp 5, dei, vid 0x123, inner ipv4
        let hdr = [0xb1, 0x23, 0x08, 0x00];
        let mut meta = MetaAll::new();
        extract_metadata(&hdr, &mut meta, CTRL);
        assert_eq!(meta.vlans.len(), 1);
        assert_eq!(meta.vlans[0].vid, 0x123);
        assert_eq!(meta.vlans[0].pcp, 5);
        assert!(meta.vlans[0].dei);
        assert_eq!(next_proto(&hdr), 0x0800);
    }

    #[test]
    fn stack_overflow_is_ignored() {
        let hdr = [0x00, 0x02, 0x08, 0x00];
        let mut meta = MetaAll::new();
        for _ in 0..MAX_VLANS + 2 {
            extract_metadata(&hdr, &mut meta, CTRL);
        }
        assert_eq!(meta.vlans.len(), MAX_VLANS);
    }
}
