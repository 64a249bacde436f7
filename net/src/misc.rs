// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Small leaves (TIPC, FCoE, IGMP) and batman-adv encapsulation.

use crate::eth::HDR_LEN as ETH_HLEN;
use engine::wire::be16;
use engine::{KeyWidth, ProtoNode, Stop};

/// TIPC basic header.
pub const TIPC_HDR_LEN: usize = 16;
/// FCoE header (version + reserved + SOF).
pub const FCOE_HDR_LEN: usize = 14;
/// IGMP header.
pub const IGMP_HDR_LEN: usize = 8;
/// batman-adv unicast packet header.
pub const BATADV_HDR_LEN: usize = 10;

const BATADV_UNICAST: u8 = 0x40;
const BATADV_COMPAT_VERSION: u8 = 15;

/// TIPC leaf.
pub static TIPC: ProtoNode = ProtoNode {
    name: "tipc",
    min_len: TIPC_HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// FCoE leaf.
pub static FCOE: ProtoNode = ProtoNode {
    name: "fcoe",
    min_len: FCOE_HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// IGMP leaf.
pub static IGMP: ProtoNode = ProtoNode {
    name: "igmp",
    min_len: IGMP_HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// batman-adv unicast: the batadv header plus the tunneled Ethernet
/// header, dispatching on the inner EtherType.
pub static BATMAN: ProtoNode = ProtoNode {
    name: "batman",
    min_len: BATADV_HDR_LEN + ETH_HLEN,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U16),
    len: Some(batman_len),
    next_proto: Some(batman_next_proto),
};

/// Only v15 unicast packets carry a parsable inner frame.
///
/// # Errors
///
/// [`Stop::Fail`] for other packet types or compat versions.
pub fn batman_len(hdr: &[u8]) -> Result<usize, Stop> {
    if hdr[0] != BATADV_UNICAST || hdr[1] != BATADV_COMPAT_VERSION {
        return Err(Stop::Fail);
    }
    Ok(BATADV_HDR_LEN + ETH_HLEN)
}

/// EtherType of the tunneled frame.
#[must_use]
pub fn batman_next_proto(hdr: &[u8]) -> u32 {
    u32::from(be16(hdr, BATADV_HDR_LEN + 12))
}

#[cfg(test)]
mod test {
    use super::{batman_len, batman_next_proto};
    use engine::Stop;

    #[test]
    fn batman_gates_on_type_and_version() {
        let mut hdr = [0u8; 24];
        hdr[0] = 0x40;
        hdr[1] = 15;
        hdr[22] = 0x08;
        assert_eq!(batman_len(&hdr), Ok(24));
        assert_eq!(batman_next_proto(&hdr), 0x0800);

        hdr[0] = 0x01; // broadcast
        assert_eq!(batman_len(&hdr), Err(Stop::Fail));
        hdr[0] = 0x40;
        hdr[1] = 14;
        assert_eq!(batman_len(&hdr), Err(Stop::Fail));
    }
}
