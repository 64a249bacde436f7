// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The canned metadata template populated by the node library.
//!
//! Callers that want a different layout can supply their own frame type;
//! the engine only sees the generic parameter. [`MetaAll`] covers every
//! field the full node set extracts, one value per encapsulation layer.

use arrayvec::ArrayVec;
use std::net::{Ipv4Addr, Ipv6Addr};

/// VLAN tags remembered per frame.
pub const MAX_VLANS: usize = 2;

/// SACK blocks remembered per frame (the TCP option carries at most 4).
pub const MAX_SACK_BLOCKS: usize = 4;

/// Ethernet addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtherMeta {
    /// Destination MAC.
    pub destination: [u8; 6],
    /// Source MAC.
    pub source: [u8; 6],
}

/// Network-layer address pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrPair {
    /// IPv4 source and destination.
    V4 {
        /// Source address.
        source: Ipv4Addr,
        /// Destination address.
        destination: Ipv4Addr,
    },
    /// IPv6 source and destination.
    V6 {
        /// Source address.
        source: Ipv6Addr,
        /// Destination address.
        destination: Ipv6Addr,
    },
}

/// One VLAN tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanMeta {
    /// VLAN identifier (12 bits).
    pub vid: u16,
    /// Priority code point.
    pub pcp: u8,
    /// Drop eligibility indicator.
    pub dei: bool,
}

/// Transport ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortsMeta {
    /// Source port.
    pub source: u16,
    /// Destination port.
    pub destination: u16,
}

/// TCP timestamp option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpTimestamp {
    /// TSval.
    pub value: u32,
    /// TSecr.
    pub echo: u32,
}

/// One SACK block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SackBlock {
    /// Left edge.
    pub left: u32,
    /// Right edge.
    pub right: u32,
}

/// Values gathered from the TCP option TLVs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpOptionsMeta {
    /// Maximum segment size.
    pub mss: Option<u16>,
    /// Window scale shift.
    pub window_scaling: Option<u8>,
    /// Timestamp pair.
    pub timestamp: Option<TcpTimestamp>,
    /// SACK blocks, in option order.
    pub sack: ArrayVec<SackBlock, MAX_SACK_BLOCKS>,
}

/// First MPLS label stack entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MplsMeta {
    /// Label value (20 bits).
    pub label: u32,
    /// Traffic class (3 bits).
    pub tc: u8,
    /// Bottom-of-stack bit.
    pub bos: bool,
    /// Time to live.
    pub ttl: u8,
}

/// ARP/RARP fields for Ethernet/IPv4 requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMeta {
    /// Operation code.
    pub op: u16,
    /// Sender hardware address.
    pub sender_hw: [u8; 6],
    /// Sender protocol address.
    pub sender_ip: Ipv4Addr,
    /// Target hardware address.
    pub target_hw: [u8; 6],
    /// Target protocol address.
    pub target_ip: Ipv4Addr,
}

/// ICMP type, code, and echo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpMeta {
    /// ICMP type.
    pub kind: u8,
    /// ICMP code.
    pub code: u8,
    /// Echo identifier for echo request/reply, else `None`.
    pub id: Option<u16>,
}

/// One metadata frame: everything extracted for one encapsulation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaAll {
    /// Ethernet addresses.
    pub ether: Option<EtherMeta>,
    /// Outer EtherType.
    pub eth_proto: Option<u16>,
    /// VLAN stack, outermost first.
    pub vlans: ArrayVec<VlanMeta, MAX_VLANS>,
    /// Network-layer addresses.
    pub addrs: Option<AddrPair>,
    /// IP protocol / next-header reaching the transport layer.
    pub ip_proto: Option<u8>,
    /// IPv6 flow label.
    pub flow_label: Option<u32>,
    /// Packet is a fragment.
    pub is_fragment: bool,
    /// Packet is the first fragment.
    pub first_fragment: bool,
    /// Transport ports.
    pub ports: Option<PortsMeta>,
    /// Tunnel key (GRE key, PPTP call id).
    pub keyid: Option<u32>,
    /// TCP option values.
    pub tcp_options: TcpOptionsMeta,
    /// First MPLS label entry.
    pub mpls: Option<MplsMeta>,
    /// ARP/RARP fields.
    pub arp: Option<ArpMeta>,
    /// ICMP fields.
    pub icmp: Option<IcmpMeta>,
}

impl MetaAll {
    /// A zeroed frame.
    #[must_use]
    pub fn new() -> MetaAll {
        MetaAll::default()
    }
}
