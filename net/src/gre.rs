// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! GRE (RFC 2784) and PPTP-flavor GRE v1 (RFC 2637).
//!
//! The base node is an overlay that only reads the version bits; the
//! version nodes consume the header plus whatever optional fields the
//! flag word announces.

use crate::meta::MetaAll;
use bitflags::bitflags;
use engine::wire::{FlagField, FlagFields, be16, be32};
use engine::{Ctrl, KeyWidth, ProtoNode, Stop};

/// Fixed part of the GRE header.
pub const HDR_LEN: usize = 4;

/// PPP carried in GRE v1.
pub const PROTO_PPP: u32 = 0x880b;

/// GRE v1 keys the low 16 bits of the key field (the PPTP call id).
pub const PPTP_KEY_MASK: u32 = 0xffff;

bitflags! {
    /// The GRE flag word (big-endian on the wire).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GreFlags: u16 {
        /// Checksum present.
        const CSUM = 0x8000;
        /// Routing present (not supported; stops the walk).
        const ROUTING = 0x4000;
        /// Key present.
        const KEY = 0x2000;
        /// Sequence number present.
        const SEQ = 0x1000;
        /// Acknowledgment number present (v1 only).
        const ACK = 0x0080;
    }
}

/// Low three bits of the flag word.
pub const VERSION_MASK: u16 = 0x0007;

const KEY_IDX: usize = 1;

/// Optional fields of a v0 header, in wire order.
static V0_FIELDS: FlagFields = FlagFields::new(&[
    FlagField {
        flag: GreFlags::CSUM.bits(),
        size: 4,
    },
    FlagField {
        flag: GreFlags::KEY.bits(),
        size: 4,
    },
    FlagField {
        flag: GreFlags::SEQ.bits(),
        size: 4,
    },
]);

/// Optional fields of a v1 (PPTP) header, in wire order.
static PPTP_FIELDS: FlagFields = FlagFields::new(&[
    FlagField {
        flag: GreFlags::CSUM.bits(),
        size: 4,
    },
    FlagField {
        flag: GreFlags::KEY.bits(),
        size: 4,
    },
    FlagField {
        flag: GreFlags::SEQ.bits(),
        size: 4,
    },
    FlagField {
        flag: GreFlags::ACK.bits(),
        size: 4,
    },
]);

/// Version dispatch overlay.
pub static GRE_BASE: ProtoNode = ProtoNode {
    name: "gre_base",
    min_len: HDR_LEN,
    overlay: true,
    encap: false,
    key_width: Some(KeyWidth::U8),
    len: Some(base_len),
    next_proto: Some(base_next_proto),
};

/// GRE version 0: a new tunnel layer keyed by the embedded EtherType.
pub static GRE_V0: ProtoNode = ProtoNode {
    name: "gre_v0",
    min_len: HDR_LEN,
    overlay: false,
    encap: true,
    key_width: Some(KeyWidth::U16),
    len: Some(v0_len),
    next_proto: Some(v0_next_proto),
};

/// GRE version 1 (PPTP): only valid carrying PPP with a key.
pub static GRE_V1: ProtoNode = ProtoNode {
    name: "gre_v1",
    min_len: HDR_LEN,
    overlay: false,
    encap: true,
    key_width: Some(KeyWidth::U8),
    len: Some(v1_len),
    next_proto: Some(v1_next_proto),
};

/// Routed GRE is unsupported: stop successfully without looking inside.
///
/// # Errors
///
/// [`Stop::Okay`] when the routing flag is set.
pub fn base_len(hdr: &[u8]) -> Result<usize, Stop> {
    let flags = GreFlags::from_bits_truncate(be16(hdr, 0));
    if flags.contains(GreFlags::ROUTING) {
        return Err(Stop::Okay);
    }
    Ok(HDR_LEN)
}

/// The 3-bit version field.
#[must_use]
pub fn base_next_proto(hdr: &[u8]) -> u32 {
    u32::from(be16(hdr, 0) & VERSION_MASK)
}

/// Fixed header plus the flag-controlled optional fields.
///
/// # Errors
///
/// None; the signature matches the length-callback contract.
pub fn v0_len(hdr: &[u8]) -> Result<usize, Stop> {
    Ok(HDR_LEN + V0_FIELDS.length(be16(hdr, 0)))
}

/// The embedded EtherType.
#[must_use]
pub fn v0_next_proto(hdr: &[u8]) -> u32 {
    u32::from(be16(hdr, 2))
}

/// Record the tunnel key when present.
pub fn v0_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let flags = be16(hdr, 0);
    if let Some(offset) = V0_FIELDS.offset_of(KEY_IDX, flags) {
        meta.keyid = Some(be32(hdr, HDR_LEN + offset));
    }
}

/// Version 1 must carry PPP and a key, per RFC 2637; anything else ends
/// the walk at this header.
///
/// # Errors
///
/// [`Stop::Okay`] unless `protocol == PPP` and the key flag is set.
pub fn v1_len(hdr: &[u8]) -> Result<usize, Stop> {
    let flags = be16(hdr, 0);
    let proto = u32::from(be16(hdr, 2));
    if proto != PROTO_PPP || flags & GreFlags::KEY.bits() == 0 {
        return Err(Stop::Okay);
    }
    Ok(HDR_LEN + PPTP_FIELDS.length(flags))
}

/// Protocol was already checked in [`v1_len`]; the single table edge
/// carries the PPP marker.
#[must_use]
pub fn v1_next_proto(_hdr: &[u8]) -> u32 {
    0
}

/// Record the PPTP call id (low half of the key field).
pub fn v1_metadata(hdr: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let flags = be16(hdr, 0);
    if let Some(offset) = PPTP_FIELDS.offset_of(KEY_IDX, flags) {
        meta.keyid = Some(be32(hdr, HDR_LEN + offset) & PPTP_KEY_MASK);
    }
}

#[cfg(test)]
mod test {
    use super::{
        base_len, base_next_proto, v0_len, v0_metadata, v0_next_proto, v1_len, v1_metadata,
    };
    use crate::meta::MetaAll;
    use engine::{Ctrl, Stop};

    fn ctrl(hdr_len: usize) -> Ctrl {
        Ctrl {
            hdr_len,
            encaps: 0,
        }
    }

    #[test]
    fn base_rejects_routing_successfully() {
        // flags: routing set, version 0
        let hdr = [0x40, 0x00, 0x08, 0x00];
        assert_eq!(base_len(&hdr), Err(Stop::Okay));
        let hdr = [0x00, 0x00, 0x08, 0x00];
        assert_eq!(base_len(&hdr), Ok(4));
        assert_eq!(base_next_proto(&hdr), 0);
        let hdr = [0x20, 0x01, 0x88, 0x0b];
        assert_eq!(base_next_proto(&hdr), 1);
    }

    #[test]
    fn v0_length_counts_flag_fields() {
        // no optional fields
        assert_eq!(v0_len(&[0x00, 0x00, 0x08, 0x00]), Ok(4));
        // csum + key + seq
        assert_eq!(v0_len(&[0xb0, 0x00, 0x08, 0x00]), Ok(16));
        // key only
        assert_eq!(v0_len(&[0x20, 0x00, 0x08, 0x00]), Ok(8));
        assert_eq!(v0_next_proto(&[0x00, 0x00, 0x08, 0x00]), 0x0800);
    }

    #[test]
    fn v0_key_lands_after_checksum() {
        // csum + key: key field is the second optional word
        let hdr = [
            0xa0, 0x00, 0x08, 0x00, // flags, proto
            0xde, 0xad, 0x00, 0x00, // csum + reserved
            0x00, 0x00, 0xbe, 0xef, // key
        ];
        let mut meta = MetaAll::new();
        v0_metadata(&hdr, &mut meta, ctrl(hdr.len()));
        assert_eq!(meta.keyid, Some(0xbeef));

        // no key flag: nothing recorded
        let mut meta = MetaAll::new();
        v0_metadata(&[0x00, 0x00, 0x08, 0x00], &mut meta, ctrl(4));
        assert_eq!(meta.keyid, None);
    }

    #[test]
    fn v1_demands_ppp_and_key() {
        // key set, proto PPP
        assert_eq!(v1_len(&[0x20, 0x01, 0x88, 0x0b]), Ok(8));
        // key set, wrong proto
        assert_eq!(v1_len(&[0x20, 0x01, 0x08, 0x00]), Err(Stop::Okay));
        // PPP without key
        assert_eq!(v1_len(&[0x00, 0x01, 0x88, 0x0b]), Err(Stop::Okay));
    }

    #[test]
    fn v1_key_masks_call_id() {
        let hdr = [
            0x20, 0x01, 0x88, 0x0b, // flags (key), proto PPP
            0x12, 0x34, 0x56, 0x78, // key: payload len | call id
        ];
        let mut meta = MetaAll::new();
        v1_metadata(&hdr, &mut meta, ctrl(hdr.len()));
        assert_eq!(meta.keyid, Some(0x5678));
    }
}
