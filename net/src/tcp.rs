// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! TCP and its option TLVs.

use crate::meta::{MetaAll, SackBlock, TcpTimestamp};
use engine::wire::{be16, be32};
use engine::{Ctrl, ProtoNode, Stop, TlvLayout, TlvsProtoNode};

/// Option-less TCP header length.
pub const MIN_LEN: usize = 20;

/// End of option list.
pub const OPT_EOL: u8 = 0;
/// No-operation padding.
pub const OPT_NOP: u8 = 1;
/// Maximum segment size.
pub const OPT_MSS: u8 = 2;
/// Window scale.
pub const OPT_WINDOW: u8 = 3;
/// Selective acknowledgment blocks.
pub const OPT_SACK: u8 = 5;
/// Timestamps.
pub const OPT_TIMESTAMP: u8 = 8;

/// TCP as a TLV-bearing leaf: data-offset length, options iterated as
/// TLVs from byte 20.
pub static TCP_TLVS: TlvsProtoNode = TlvsProtoNode {
    proto: ProtoNode {
        name: "tcp_tlvs",
        min_len: MIN_LEN,
        overlay: false,
        encap: false,
        key_width: None,
        len: Some(len),
        next_proto: None,
    },
    layout: TlvLayout {
        start_offset: MIN_LEN,
        pad1: Some(OPT_NOP),
        eol: Some(OPT_EOL),
        len: tlv_len,
    },
};

/// `data offset * 4`; an offset below 5 falls under the minimum and the
/// engine rejects it.
///
/// # Errors
///
/// None; the signature matches the length-callback contract.
pub fn len(hdr: &[u8]) -> Result<usize, Stop> {
    Ok(usize::from(hdr[12] >> 4) * 4)
}

/// Options carry their total length in the second byte.
#[must_use]
pub fn tlv_len(tlv: &[u8]) -> usize {
    usize::from(tlv[1])
}

/// MSS is always 4 bytes.
///
/// # Errors
///
/// [`Stop::TlvLength`] on any other length.
pub fn mss_check(tlv: &[u8], _meta: &mut MetaAll) -> Result<(), Stop> {
    if tlv.len() == 4 {
        Ok(())
    } else {
        Err(Stop::TlvLength)
    }
}

/// Record the maximum segment size.
pub fn mss_metadata(tlv: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.tcp_options.mss = Some(be16(tlv, 2));
}

/// Window scale is always 3 bytes.
///
/// # Errors
///
/// [`Stop::TlvLength`] on any other length.
pub fn window_scaling_check(tlv: &[u8], _meta: &mut MetaAll) -> Result<(), Stop> {
    if tlv.len() == 3 {
        Ok(())
    } else {
        Err(Stop::TlvLength)
    }
}

/// Record the window scale shift.
pub fn window_scaling_metadata(tlv: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.tcp_options.window_scaling = Some(tlv[2]);
}

/// Timestamps are always 10 bytes.
///
/// # Errors
///
/// [`Stop::TlvLength`] on any other length.
pub fn timestamp_check(tlv: &[u8], _meta: &mut MetaAll) -> Result<(), Stop> {
    if tlv.len() == 10 {
        Ok(())
    } else {
        Err(Stop::TlvLength)
    }
}

/// Record TSval / TSecr.
pub fn timestamp_metadata(tlv: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    meta.tcp_options.timestamp = Some(TcpTimestamp {
        value: be32(tlv, 2),
        echo: be32(tlv, 6),
    });
}

/// SACK holds one to four 8-byte blocks after the 2-byte option header.
///
/// # Errors
///
/// [`Stop::TlvLength`] when the length is not `2 + 8·n`, `1 ≤ n ≤ 4`.
pub fn sack_check(tlv: &[u8], _meta: &mut MetaAll) -> Result<(), Stop> {
    let len = tlv.len();
    if (10..=34).contains(&len) && (len - 2) % 8 == 0 {
        Ok(())
    } else {
        Err(Stop::TlvLength)
    }
}

/// Record the SACK blocks in option order.
pub fn sack_metadata(tlv: &[u8], meta: &mut MetaAll, _ctrl: Ctrl) {
    let mut off = 2;
    while off + 8 <= tlv.len() {
        let block = SackBlock {
            left: be32(tlv, off),
            right: be32(tlv, off + 4),
        };
        if meta.tcp_options.sack.try_push(block).is_err() {
            break;
        }
        off += 8;
    }
}

#[cfg(test)]
mod test {
    use super::{
        len, mss_check, mss_metadata, sack_check, sack_metadata, timestamp_check,
        timestamp_metadata, tlv_len, window_scaling_check,
    };
    use crate::meta::MetaAll;
    use engine::{Ctrl, Stop};

    const CTRL: Ctrl = Ctrl {
        hdr_len: 0,
        encaps: 0,
    };

    #[test]
    fn data_offset_length() {
        let mut hdr = [0u8; 20];
        hdr[12] = 5 << 4;
        assert_eq!(len(&hdr), Ok(20));
        hdr[12] = 8 << 4;
        assert_eq!(len(&hdr), Ok(32));
        // below minimum: the engine turns this into a length stop
        hdr[12] = 4 << 4;
        assert_eq!(len(&hdr), Ok(16));
    }

    #[test]
    fn option_lengths() {
        let mut meta = MetaAll::new();
        assert_eq!(mss_check(&[2, 4, 0x05, 0xb4], &mut meta), Ok(()));
        assert_eq!(
            mss_check(&[2, 3, 0x05], &mut meta),
            Err(Stop::TlvLength)
        );
        assert_eq!(window_scaling_check(&[3, 3, 7], &mut meta), Ok(()));
        assert_eq!(
            timestamp_check(&[8, 10, 0, 0, 0, 1, 0, 0, 0, 2], &mut meta),
            Ok(())
        );
        assert_eq!(sack_check(&[5, 10, 0, 0, 0, 1, 0, 0, 0, 2], &mut meta), Ok(()));
        assert_eq!(
            sack_check(&[5, 12, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0], &mut meta),
            Err(Stop::TlvLength)
        );
        assert_eq!(tlv_len(&[2, 4, 0, 0]), 4);
    }

    #[test]
    fn option_values() {
        let mut meta = MetaAll::new();
        mss_metadata(&[2, 4, 0x05, 0xb4], &mut meta, CTRL);
        assert_eq!(meta.tcp_options.mss, Some(1460));

        timestamp_metadata(
            &[8, 10, 0, 0, 0, 1, 0, 0, 0, 2],
            &mut meta,
            CTRL,
        );
        let ts = meta.tcp_options.timestamp.unwrap();
        assert_eq!(ts.value, 1);
        assert_eq!(ts.echo, 2);

        sack_metadata(
            &[
                5, 18, //
                0, 0, 0, 1, 0, 0, 0, 2, // block 1
                0, 0, 0, 3, 0, 0, 0, 4, // block 2
            ],
            &mut meta,
            CTRL,
        );
        assert_eq!(meta.tcp_options.sack.len(), 2);
        assert_eq!(meta.tcp_options.sack[1].left, 3);
        assert_eq!(meta.tcp_options.sack[1].right, 4);
    }
}
