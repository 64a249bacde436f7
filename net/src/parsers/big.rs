// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The "big parser": a flow-dissector-style graph over the whole node
//! library, with one root starting at Ethernet and one at the IP version
//! overlay.

use crate::meta::MetaAll;
use crate::reg::registry;
use crate::{eth, ip, ppp, tcp};
use graph::{BuildError, Built, Decl, DeclRecord, TableKey};

/// Name of the Ethernet-rooted parser.
pub const ETHER_PARSER: &str = "big_ether";
/// Name of the IP-rooted parser.
pub const IP_PARSER: &str = "big_ip";

fn make(name: &str, proto: &str, metadata: Option<&str>, handler: Option<&str>, table: &str) -> Decl {
    Decl::MakeParseNode {
        name: name.to_string(),
        proto: proto.to_string(),
        metadata: metadata.map(str::to_string),
        handler: handler.map(str::to_string),
        table: table.to_string(),
    }
}

fn leaf(name: &str, proto: &str, metadata: Option<&str>) -> Decl {
    Decl::MakeLeafParseNode {
        name: name.to_string(),
        proto: proto.to_string(),
        metadata: metadata.map(str::to_string),
        handler: None,
    }
}

fn tlv(name: &str, check: &str, metadata: &str) -> Decl {
    Decl::MakeTlvParseNode {
        name: name.to_string(),
        check: Some(check.to_string()),
        metadata: Some(metadata.to_string()),
        handler: None,
    }
}

fn table(name: &str, entries: &[(u32, &str)]) -> Decl {
    Decl::MakeProtoTable {
        name: name.to_string(),
        entries: entries
            .iter()
            .map(|&(key, target)| (TableKey::Key(key), target.to_string()))
            .collect(),
    }
}

fn tlv_table(name: &str, entries: &[(u32, &str)]) -> Decl {
    Decl::MakeTlvTable {
        name: name.to_string(),
        entries: entries
            .iter()
            .map(|&(key, target)| (TableKey::Key(key), target.to_string()))
            .collect(),
    }
}

fn parser(name: &str, desc: &str, root: &str) -> Decl {
    Decl::ParserAdd {
        name: name.to_string(),
        desc: desc.to_string(),
        root: root.to_string(),
    }
}

/// The big parser's declaration records. The `pgc` front-end produces an
/// isomorphic set from the equivalent declaration file.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn decls() -> Vec<DeclRecord> {
    let records = vec![
        // parse nodes
        make("ether_node", "ether", Some("ether_metadata"), None, "ether_table"),
        make("ipv4_check_node", "ip", None, None, "ipv4_check_table"),
        make("ipv4_node", "ipv4", Some("ipv4_metadata"), None, "ipv4_table"),
        make("ipv6_check_node", "ip", None, None, "ipv6_check_table"),
        make(
            "ipv6_node",
            "ipv6",
            Some("ipv6_metadata"),
            Some("ipv6_stop_flowlabel"),
            "ipv6_table",
        ),
        make("ip_overlay_node", "ip", None, None, "ip_table"),
        make(
            "ipv6_eh_node",
            "ipv6_eh",
            Some("ipv6_eh_metadata"),
            None,
            "ipv6_table",
        ),
        make(
            "ipv6_frag_node",
            "ipv6_frag_eh",
            Some("ipv6_frag_metadata"),
            Some("ipv6_frag_stop_nonfirst"),
            "ipv6_table",
        ),
        make("gre_base_node", "gre_base", None, None, "gre_base_table"),
        make(
            "gre_v0_node",
            "gre_v0",
            Some("gre_v0_metadata"),
            None,
            "gre_v0_table",
        ),
        make(
            "gre_v1_node",
            "gre_v1",
            Some("gre_v1_metadata"),
            None,
            "gre_v1_table",
        ),
        make(
            "e8021ad_node",
            "vlan",
            Some("vlan_metadata"),
            None,
            "ether_table",
        ),
        make(
            "e8021q_node",
            "vlan",
            Some("vlan_metadata"),
            None,
            "ether_table",
        ),
        make("ppp_node", "ppp", None, None, "ppp_table"),
        make("ipv4ip_node", "ipv4ip", None, None, "ipv4ip_table"),
        make("ipv6ip_node", "ipv6ip", None, None, "ipv6ip_table"),
        make("batman_node", "batman", None, None, "ether_table"),
        // leaves
        leaf("ports_node", "ports", Some("ports_metadata")),
        leaf("icmpv4_node", "icmpv4", Some("icmp_metadata")),
        leaf("icmpv6_node", "icmpv6", Some("icmp_metadata")),
        leaf("mpls_node", "mpls", Some("mpls_metadata")),
        leaf("arp_node", "arp", Some("arp_rarp_metadata")),
        leaf("rarp_node", "rarp", Some("arp_rarp_metadata")),
        leaf("tipc_node", "tipc", None),
        leaf("fcoe_node", "fcoe", None),
        leaf("igmp_node", "igmp", None),
        Decl::MakeLeafTlvsParseNode {
            name: "tcp_node".to_string(),
            proto: "tcp_tlvs".to_string(),
            metadata: Some("ports_metadata".to_string()),
            handler: None,
            post: None,
            tlv_table: "tcp_tlv_table".to_string(),
        },
        // TCP option sub-parsers
        tlv("tcp_opt_mss_node", "tcp_opt_mss_check", "tcp_opt_mss_metadata"),
        tlv(
            "tcp_opt_window_scaling_node",
            "tcp_opt_window_scaling_check",
            "tcp_opt_window_scaling_metadata",
        ),
        tlv(
            "tcp_opt_timestamp_node",
            "tcp_opt_timestamp_check",
            "tcp_opt_timestamp_metadata",
        ),
        tlv("tcp_opt_sack_node", "tcp_opt_sack_check", "tcp_opt_sack_metadata"),
        // parsers
        parser(ETHER_PARSER, "Big parser for Ethernet", "ether_node"),
        parser(IP_PARSER, "Big parser for IP", "ip_overlay_node"),
        // protocol tables
        table(
            "ether_table",
            &[
                (eth::ETH_P_IP, "ipv4_check_node"),
                (eth::ETH_P_IPV6, "ipv6_check_node"),
                (eth::ETH_P_8021AD, "e8021ad_node"),
                (eth::ETH_P_8021Q, "e8021q_node"),
                (eth::ETH_P_MPLS_UC, "mpls_node"),
                (eth::ETH_P_MPLS_MC, "mpls_node"),
                (eth::ETH_P_ARP, "arp_node"),
                (eth::ETH_P_RARP, "rarp_node"),
                (eth::ETH_P_TIPC, "tipc_node"),
                (eth::ETH_P_BATMAN, "batman_node"),
                (eth::ETH_P_FCOE, "fcoe_node"),
            ],
        ),
        table("ipv4_check_table", &[(4, "ipv4_node")]),
        table(
            "ipv4_table",
            &[
                (ip::IPPROTO_TCP, "tcp_node"),
                (ip::IPPROTO_UDP, "ports_node"),
                (ip::IPPROTO_SCTP, "ports_node"),
                (ip::IPPROTO_DCCP, "ports_node"),
                (ip::IPPROTO_GRE, "gre_base_node"),
                (ip::IPPROTO_ICMP, "icmpv4_node"),
                (ip::IPPROTO_IGMP, "igmp_node"),
                (ip::IPPROTO_MPLS, "mpls_node"),
                (ip::IPPROTO_IPIP, "ipv4ip_node"),
                (ip::IPPROTO_IPV6, "ipv6ip_node"),
            ],
        ),
        table("ipv6_check_table", &[(6, "ipv6_node")]),
        table(
            "ipv6_table",
            &[
                (ip::IPPROTO_HOPOPTS, "ipv6_eh_node"),
                (ip::IPPROTO_ROUTING, "ipv6_eh_node"),
                (ip::IPPROTO_DSTOPTS, "ipv6_eh_node"),
                (ip::IPPROTO_FRAGMENT, "ipv6_frag_node"),
                (ip::IPPROTO_TCP, "tcp_node"),
                (ip::IPPROTO_UDP, "ports_node"),
                (ip::IPPROTO_SCTP, "ports_node"),
                (ip::IPPROTO_DCCP, "ports_node"),
                (ip::IPPROTO_GRE, "gre_base_node"),
                (ip::IPPROTO_ICMPV6, "icmpv6_node"),
                (ip::IPPROTO_IGMP, "igmp_node"),
                (ip::IPPROTO_MPLS, "mpls_node"),
            ],
        ),
        table("ip_table", &[(4, "ipv4_node"), (6, "ipv6_node")]),
        table("ipv4ip_table", &[(0, "ipv4_node")]),
        table("ipv6ip_table", &[(0, "ipv6_node")]),
        table("gre_base_table", &[(0, "gre_v0_node"), (1, "gre_v1_node")]),
        table(
            "gre_v0_table",
            &[
                (eth::ETH_P_IP, "ipv4_check_node"),
                (eth::ETH_P_IPV6, "ipv6_check_node"),
                (eth::ETH_P_TEB, "ether_node"),
            ],
        ),
        table("gre_v1_table", &[(0, "ppp_node")]),
        table(
            "ppp_table",
            &[
                (ppp::PPP_IP, "ipv4_check_node"),
                (ppp::PPP_IPV6, "ipv6_check_node"),
            ],
        ),
        tlv_table(
            "tcp_tlv_table",
            &[
                (u32::from(tcp::OPT_MSS), "tcp_opt_mss_node"),
                (u32::from(tcp::OPT_WINDOW), "tcp_opt_window_scaling_node"),
                (u32::from(tcp::OPT_TIMESTAMP), "tcp_opt_timestamp_node"),
                (u32::from(tcp::OPT_SACK), "tcp_opt_sack_node"),
            ],
        ),
    ];
    records.into_iter().map(DeclRecord::builtin).collect()
}

/// Build the big parser against the library registry.
///
/// # Errors
///
/// Propagates [`BuildError`]; the builtin declarations only fail if the
/// library and the declaration set drift apart.
pub fn build() -> Result<Built<MetaAll>, BuildError> {
    graph::build(&registry(), &decls())
}
