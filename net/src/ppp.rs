// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! PPP, as carried inside GRE v1 (PPTP).
//!
//! Tunneled PPP usually omits the address/control bytes; when the 0xff
//! marker is present the header grows to four bytes and the protocol
//! field moves accordingly.

use engine::wire::be16;
use engine::{KeyWidth, ProtoNode, Stop};

/// IPv4 over PPP.
pub const PPP_IP: u32 = 0x0021;
/// IPv6 over PPP.
pub const PPP_IPV6: u32 = 0x0057;

const ADDRESS_MARKER: u8 = 0xff;

/// PPP protocol description.
pub static PPP: ProtoNode = ProtoNode {
    name: "ppp",
    min_len: 2,
    overlay: false,
    encap: false,
    key_width: Some(KeyWidth::U16),
    len: Some(len),
    next_proto: Some(next_proto),
};

/// Two bytes bare, four with address/control in front.
///
/// # Errors
///
/// None; the signature matches the length-callback contract.
pub fn len(hdr: &[u8]) -> Result<usize, Stop> {
    if hdr[0] == ADDRESS_MARKER {
        Ok(4)
    } else {
        Ok(2)
    }
}

/// The PPP protocol field.
#[must_use]
pub fn next_proto(hdr: &[u8]) -> u32 {
    if hdr[0] == ADDRESS_MARKER {
        u32::from(be16(hdr, 2))
    } else {
        u32::from(be16(hdr, 0))
    }
}

#[cfg(test)]
mod test {
    use super::{PPP_IP, len, next_proto};

    #[test]
    fn bare_protocol_field() {
        let hdr = [0x00, 0x21];
        assert_eq!(len(&hdr), Ok(2));
        assert_eq!(next_proto(&hdr), PPP_IP);
    }

    #[test]
    fn address_control_prefix() {
        let hdr = [0xff, 0x03, 0x00, 0x57];
        assert_eq!(len(&hdr), Ok(4));
        assert_eq!(next_proto(&hdr), 0x0057);
    }
}
