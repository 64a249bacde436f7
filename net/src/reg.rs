// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Name registration for the whole node library.
//!
//! The names here are the vocabulary of the declaration surface: a
//! declaration file binds nodes by these strings, and generated walkers
//! call the same functions through [`helpers`] under the same names.

use crate::meta::MetaAll;
use crate::{arp, eth, gre, icmp, ip, ipv4, ipv6, misc, mpls, ports, ppp, tcp, vlan};
use graph::Registry;

/// The full protocol library, ready for the builder.
#[must_use]
pub fn registry() -> Registry<MetaAll> {
    let mut registry = Registry::new();
    registry
        .proto("ether", &eth::ETHER)
        .proto("ip", &ip::IP)
        .proto("ipv4", &ipv4::IPV4)
        .proto("ipv6", &ipv6::IPV6)
        .proto("ipv6_eh", &ipv6::IPV6_EH)
        .proto("ipv6_frag_eh", &ipv6::IPV6_FRAG_EH)
        .proto("ipv4ip", &ip::IPV4IP)
        .proto("ipv6ip", &ip::IPV6IP)
        .proto("gre_base", &gre::GRE_BASE)
        .proto("gre_v0", &gre::GRE_V0)
        .proto("gre_v1", &gre::GRE_V1)
        .proto("ppp", &ppp::PPP)
        .proto("vlan", &vlan::VLAN)
        .proto("mpls", &mpls::MPLS)
        .proto("ports", &ports::PORTS)
        .proto("icmpv4", &icmp::ICMPV4)
        .proto("icmpv6", &icmp::ICMPV6)
        .proto("arp", &arp::ARP)
        .proto("rarp", &arp::RARP)
        .proto("tipc", &misc::TIPC)
        .proto("fcoe", &misc::FCOE)
        .proto("igmp", &misc::IGMP)
        .proto("batman", &misc::BATMAN)
        .tlvs_proto("tcp_tlvs", &tcp::TCP_TLVS);
    registry
        .extractor("ether_metadata", eth::extract_metadata)
        .extractor("vlan_metadata", vlan::extract_metadata)
        .extractor("ipv4_metadata", ipv4::extract_metadata)
        .extractor("ipv6_metadata", ipv6::extract_metadata)
        .extractor("ipv6_eh_metadata", ipv6::eh_extract_metadata)
        .extractor("ipv6_frag_metadata", ipv6::frag_extract_metadata)
        .extractor("ports_metadata", ports::extract_metadata)
        .extractor("gre_v0_metadata", gre::v0_metadata)
        .extractor("gre_v1_metadata", gre::v1_metadata)
        .extractor("icmp_metadata", icmp::extract_metadata)
        .extractor("mpls_metadata", mpls::extract_metadata)
        .extractor("arp_rarp_metadata", arp::extract_metadata)
        .extractor("tcp_opt_mss_metadata", tcp::mss_metadata)
        .extractor("tcp_opt_window_scaling_metadata", tcp::window_scaling_metadata)
        .extractor("tcp_opt_timestamp_metadata", tcp::timestamp_metadata)
        .extractor("tcp_opt_sack_metadata", tcp::sack_metadata);
    registry
        .handler("ipv6_stop_flowlabel", ipv6::stop_flowlabel)
        .handler("ipv6_frag_stop_nonfirst", ipv6::frag_stop_nonfirst);
    registry
        .tlv_check("tcp_opt_mss_check", tcp::mss_check)
        .tlv_check("tcp_opt_window_scaling_check", tcp::window_scaling_check)
        .tlv_check("tcp_opt_timestamp_check", tcp::timestamp_check)
        .tlv_check("tcp_opt_sack_check", tcp::sack_check);
    registry
}

/// Flat aliases for generated walkers.
///
/// The code generator resolves a protocol's length callback as
/// `<proto>_len`, its discriminator as `<proto>_next_proto`, its TLV
/// length rule as `<proto>_tlv_len`, and every declared callback under
/// its registered name.
pub mod helpers {
    pub use crate::arp::extract_metadata as arp_rarp_metadata;
    pub use crate::eth::{extract_metadata as ether_metadata, next_proto as ether_next_proto};
    pub use crate::gre::{
        base_len as gre_base_len, base_next_proto as gre_base_next_proto, v0_len as gre_v0_len,
        v0_metadata as gre_v0_metadata, v0_next_proto as gre_v0_next_proto,
        v1_len as gre_v1_len, v1_metadata as gre_v1_metadata,
        v1_next_proto as gre_v1_next_proto,
    };
    pub use crate::icmp::extract_metadata as icmp_metadata;
    pub use crate::ip::{
        next_proto as ip_next_proto, zero_proto as ipv4ip_next_proto,
        zero_proto as ipv6ip_next_proto,
    };
    pub use crate::ipv4::{
        extract_metadata as ipv4_metadata, len as ipv4_len, next_proto as ipv4_next_proto,
    };
    pub use crate::ipv6::{
        eh_extract_metadata as ipv6_eh_metadata, eh_len as ipv6_eh_len,
        eh_next_proto as ipv6_eh_next_proto, eh_next_proto as ipv6_frag_eh_next_proto,
        extract_metadata as ipv6_metadata, frag_extract_metadata as ipv6_frag_metadata,
        frag_stop_nonfirst as ipv6_frag_stop_nonfirst, next_proto as ipv6_next_proto,
        stop_flowlabel as ipv6_stop_flowlabel,
    };
    pub use crate::misc::{batman_len, batman_next_proto};
    pub use crate::mpls::{extract_metadata as mpls_metadata, len as mpls_len};
    pub use crate::ports::extract_metadata as ports_metadata;
    pub use crate::ppp::{len as ppp_len, next_proto as ppp_next_proto};
    pub use crate::tcp::{
        len as tcp_tlvs_len, mss_check as tcp_opt_mss_check, mss_metadata as tcp_opt_mss_metadata,
        sack_check as tcp_opt_sack_check, sack_metadata as tcp_opt_sack_metadata,
        timestamp_check as tcp_opt_timestamp_check,
        timestamp_metadata as tcp_opt_timestamp_metadata, tlv_len as tcp_tlvs_tlv_len,
        window_scaling_check as tcp_opt_window_scaling_check,
        window_scaling_metadata as tcp_opt_window_scaling_metadata,
    };
    pub use crate::vlan::{extract_metadata as vlan_metadata, next_proto as vlan_next_proto};
}
