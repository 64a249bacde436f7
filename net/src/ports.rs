// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Port-pair leaf shared by UDP, SCTP, and DCCP (and reused for the TCP
//! node's port extraction).

use crate::meta::{MetaAll, PortsMeta};
use engine::wire::be16;
use engine::{Ctrl, ProtoNode};

/// Source and destination port pair.
pub const HDR_LEN: usize = 4;

/// Ports leaf.
pub static PORTS: ProtoNode = ProtoNode {
    name: "ports",
    min_len: HDR_LEN,
    overlay: false,
    encap: false,
    key_width: None,
    len: None,
    next_proto: None,
};

/// Record the port pair.
pub fn extract_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.ports = Some(PortsMeta {
        source: be16(hdr, 0),
        destination: be16(hdr, 2),
    });
}

#[cfg(test)]
mod test {
    use super::extract_metadata;
    use crate::meta::MetaAll;
    use engine::Ctrl;

    #[test]
    fn extracts_port_pair() {
        let hdr = [0xea, 0x60, 0x00, 0x35, 0x00, 0x00, 0x00, 0x00];
        let mut meta = MetaAll::new();
        extract_metadata(
            &hdr,
            &mut meta,
            Ctrl {
                hdr_len: 8,
                encaps: 0,
            },
        );
        let ports = meta.ports.unwrap();
        assert_eq!(ports.source, 60000);
        assert_eq!(ports.destination, 53);
    }
}
