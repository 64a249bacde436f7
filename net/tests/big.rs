// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! End-to-end walks of the big parser, interpreted and generated.

use engine::{Limits, Stop};
use etherparse::PacketBuilder;
use net::meta::AddrPair;
use net::parsers::big;
use net::parsers::big_gen::{parse_big_ether, parse_big_ip};
use net::MetaAll;
use pretty_assertions::assert_eq;
use std::net::Ipv4Addr;

const DST_MAC: [u8; 6] = [0x02, 0, 0, 0, 0, 0x01];
const SRC_MAC: [u8; 6] = [0x02, 0, 0, 0, 0, 0x02];

fn interpret(pkt: &[u8], frames: &mut [MetaAll]) -> Stop {
    let built = big::build().unwrap();
    let root = built.graph.root_named(big::ETHER_PARSER).unwrap().node;
    engine::parse(&built.graph, root, pkt, frames, &Limits::default())
}

fn interpret_ip(pkt: &[u8], frames: &mut [MetaAll]) -> Stop {
    let built = big::build().unwrap();
    let root = built.graph.root_named(big::IP_PARSER).unwrap().node;
    engine::parse(&built.graph, root, pkt, frames, &Limits::default())
}

/// Both walkers must agree on the stop code and on every frame byte.
fn parse_both(pkt: &[u8]) -> (Stop, [MetaAll; 3]) {
    let mut interpreted = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
    let stop = interpret(pkt, &mut interpreted);
    let mut generated = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
    let stop_gen = parse_big_ether(pkt, &mut generated);
    assert_eq!(stop, stop_gen, "stop codes diverge");
    assert_eq!(interpreted, generated, "frames diverge");
    (stop, interpreted)
}

fn eth_hdr(ethertype: u16) -> Vec<u8> {
    let mut hdr = Vec::with_capacity(14);
    hdr.extend_from_slice(&DST_MAC);
    hdr.extend_from_slice(&SRC_MAC);
    hdr.extend_from_slice(&ethertype.to_be_bytes());
    hdr
}

fn ipv4_hdr(proto: u8, src: [u8; 4], dst: [u8; 4]) -> Vec<u8> {
    let mut hdr = vec![0u8; 20];
    hdr[0] = 0x45;
    hdr[8] = 64;
    hdr[9] = proto;
    hdr[12..16].copy_from_slice(&src);
    hdr[16..20].copy_from_slice(&dst);
    hdr
}

fn icmp_echo(id: u16) -> Vec<u8> {
    let mut hdr = vec![8, 0, 0, 0, 0, 0, 0, 1];
    hdr[4..6].copy_from_slice(&id.to_be_bytes());
    hdr
}

#[test]
fn ethernet_ipv4_tcp() {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
        .tcp(8080, 54321, 1, 4096);
    let mut pkt = Vec::new();
    builder.write(&mut pkt, &[]).unwrap();

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    let frame = &frames[0];
    assert_eq!(frame.ether.unwrap().destination, DST_MAC);
    assert_eq!(frame.ether.unwrap().source, SRC_MAC);
    assert_eq!(
        frame.addrs,
        Some(AddrPair::V4 {
            source: Ipv4Addr::new(10, 0, 0, 1),
            destination: Ipv4Addr::new(10, 0, 0, 2),
        })
    );
    assert_eq!(frame.ip_proto, Some(6));
    let ports = frame.ports.unwrap();
    assert_eq!(ports.source, 8080);
    assert_eq!(ports.destination, 54321);
    // nothing spilled into the other frames
    assert_eq!(frames[1], MetaAll::new());
}

#[test]
fn ethernet_ipv6_udp() {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv6(
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2],
            64,
        )
        .udp(60000, 53);
    let mut pkt = Vec::new();
    builder.write(&mut pkt, &[]).unwrap();

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    let frame = &frames[0];
    match frame.addrs {
        Some(AddrPair::V6 {
            source,
            destination,
        }) => {
            assert_eq!(source.segments()[7], 1);
            assert_eq!(destination.segments()[7], 2);
        }
        other => panic!("wrong addrs: {other:?}"),
    }
    assert_eq!(frame.ip_proto, Some(17));
    let ports = frame.ports.unwrap();
    assert_eq!(ports.source, 60000);
    assert_eq!(ports.destination, 53);
}

#[test]
fn tcp_options_are_collected() {
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(6, [10, 0, 0, 1], [10, 0, 0, 2]));
    // TCP with data offset 8: 20 bytes + 12 option bytes
    let mut tcp = vec![0u8; 32];
    tcp[0..2].copy_from_slice(&8080u16.to_be_bytes());
    tcp[2..4].copy_from_slice(&443u16.to_be_bytes());
    tcp[12] = 8 << 4;
    tcp[20..32].copy_from_slice(&[
        2, 4, 0x05, 0xb4, // mss 1460
        1, // nop
        3, 3, 7, // window scale 7
        1, 1, // nop nop
        0, 0, // eol + slack
    ]);
    pkt.extend_from_slice(&tcp);

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].tcp_options.mss, Some(1460));
    assert_eq!(frames[0].tcp_options.window_scaling, Some(7));
    assert_eq!(frames[0].tcp_options.timestamp, None);
}

#[test]
fn tunneled_ping_rotates_frames() {
    // Ethernet / IPv4 / GRE v0 / IPv4 / ICMP echo
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(47, [192, 168, 0, 1], [192, 168, 0, 2]));
    pkt.extend_from_slice(&[0x00, 0x00, 0x08, 0x00]); // GRE: no flags, v0, IPv4
    pkt.extend_from_slice(&ipv4_hdr(1, [10, 0, 0, 1], [10, 0, 0, 2]));
    pkt.extend_from_slice(&icmp_echo(0x1234));

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    // outer layer in frame 0
    assert_eq!(
        frames[0].addrs,
        Some(AddrPair::V4 {
            source: Ipv4Addr::new(192, 168, 0, 1),
            destination: Ipv4Addr::new(192, 168, 0, 2),
        })
    );
    assert_eq!(frames[0].ip_proto, Some(47));
    // inner layer in frame 1
    assert_eq!(
        frames[1].addrs,
        Some(AddrPair::V4 {
            source: Ipv4Addr::new(10, 0, 0, 1),
            destination: Ipv4Addr::new(10, 0, 0, 2),
        })
    );
    let icmp = frames[1].icmp.unwrap();
    assert_eq!(icmp.kind, 8);
    assert_eq!(icmp.id, Some(0x1234));
    assert!(frames[0].icmp.is_none());
}

#[test]
fn pptp_tunnel() {
    // Ethernet / IPv4 / GRE v1 (key) / PPP / IPv4 / ICMP
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(47, [192, 168, 0, 1], [192, 168, 0, 2]));
    pkt.extend_from_slice(&[0x20, 0x01, 0x88, 0x0b]); // key flag, version 1, PPP
    pkt.extend_from_slice(&[0x00, 0x40, 0xab, 0xcd]); // key: len | call id
    pkt.extend_from_slice(&[0x00, 0x21]); // PPP: IPv4
    pkt.extend_from_slice(&ipv4_hdr(1, [10, 0, 0, 1], [10, 0, 0, 2]));
    pkt.extend_from_slice(&icmp_echo(7));

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].keyid, Some(0xabcd));
    assert!(frames[1].icmp.is_some());
}

#[test]
fn gre_v1_gating() {
    // version 1 without the key flag stops cleanly at the GRE header
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(47, [192, 168, 0, 1], [192, 168, 0, 2]));
    pkt.extend_from_slice(&[0x00, 0x01, 0x88, 0x0b]);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert!(frames[1].addrs.is_none());

    // version 1 with key but a non-PPP protocol stops too
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(47, [192, 168, 0, 1], [192, 168, 0, 2]));
    pkt.extend_from_slice(&[0x20, 0x01, 0x08, 0x00, 0, 0, 0, 0]);
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
}

#[test]
fn routed_gre_stops_without_inner_parse() {
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(47, [192, 168, 0, 1], [192, 168, 0, 2]));
    pkt.extend_from_slice(&[0x40, 0x00, 0x08, 0x00]); // routing flag
    pkt.extend_from_slice(&ipv4_hdr(1, [10, 0, 0, 1], [10, 0, 0, 2]));

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].ip_proto, Some(47));
    // no inner fields set anywhere
    assert_eq!(frames[1], MetaAll::new());
    assert_eq!(frames[2], MetaAll::new());
}

#[test]
fn short_ihl_is_a_length_error() {
    let mut pkt = eth_hdr(0x0800);
    let mut bad = ipv4_hdr(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    bad[0] = 0x44; // IHL 4
    pkt.extend_from_slice(&bad);
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::Length);
}

#[test]
fn zero_length_input() {
    let (stop, _) = parse_both(&[]);
    assert_eq!(stop, Stop::Length);
}

#[test]
fn unknown_ethertype() {
    let pkt = eth_hdr(0x1234);
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::UnknownProto);
}

#[test]
fn nonzero_flow_label_stops_after_ipv6() {
    let mut pkt = eth_hdr(0x86dd);
    let mut v6 = vec![0u8; 40];
    v6[0..4].copy_from_slice(&(0x6000_0000u32 | 0xbeef).to_be_bytes());
    v6[6] = 17;
    pkt.extend_from_slice(&v6);
    pkt.extend_from_slice(&[0xea, 0x60, 0x00, 0x35, 0, 0, 0, 0]);

    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].flow_label, Some(0xbeef));
    // the walk ended before the UDP header
    assert!(frames[0].ports.is_none());
}

#[test]
fn ipv6_fragment_chain() {
    // first fragment: headers keep parsing into the UDP ports
    let mut pkt = eth_hdr(0x86dd);
    let mut v6 = vec![0u8; 40];
    v6[0] = 0x60;
    v6[6] = 44; // fragment header
    pkt.extend_from_slice(&v6);
    pkt.extend_from_slice(&[17, 0, 0x00, 0x01, 0, 0, 0, 1]); // offset 0, M
    pkt.extend_from_slice(&[0xea, 0x60, 0x00, 0x35, 0, 0, 0, 0]);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert!(frames[0].is_fragment);
    assert!(frames[0].first_fragment);
    assert_eq!(frames[0].ports.unwrap().destination, 53);

    // non-first fragment: treated as a leaf
    let mut pkt = eth_hdr(0x86dd);
    let mut v6 = vec![0u8; 40];
    v6[0] = 0x60;
    v6[6] = 44;
    pkt.extend_from_slice(&v6);
    pkt.extend_from_slice(&[17, 0, 0x05, 0xc8, 0, 0, 0, 1]); // offset 185
    pkt.extend_from_slice(&[0xea, 0x60, 0x00, 0x35, 0, 0, 0, 0]);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert!(frames[0].is_fragment);
    assert!(!frames[0].first_fragment);
    assert!(frames[0].ports.is_none());
}

#[test]
fn malformed_tcp_option_stops() {
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(6, [10, 0, 0, 1], [10, 0, 0, 2]));
    let mut tcp = vec![0u8; 24];
    tcp[0..2].copy_from_slice(&8080u16.to_be_bytes());
    tcp[2..4].copy_from_slice(&443u16.to_be_bytes());
    tcp[12] = 6 << 4;
    tcp[20..24].copy_from_slice(&[2, 0, 0, 0]); // mss with length 0
    pkt.extend_from_slice(&tcp);
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::TlvLength);

    // option overrunning the header
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(6, [10, 0, 0, 1], [10, 0, 0, 2]));
    let mut tcp = vec![0u8; 24];
    tcp[12] = 6 << 4;
    tcp[20..24].copy_from_slice(&[2, 12, 0, 0]);
    pkt.extend_from_slice(&tcp);
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::TlvLength);
}

#[test]
fn bad_mss_length_is_skipped_not_fatal() {
    // a 6-byte "mss" fails its check-length; with no wildcard the node
    // skips it and the walk succeeds
    let mut pkt = eth_hdr(0x0800);
    pkt.extend_from_slice(&ipv4_hdr(6, [10, 0, 0, 1], [10, 0, 0, 2]));
    let mut tcp = vec![0u8; 28];
    tcp[12] = 7 << 4;
    tcp[20..28].copy_from_slice(&[2, 6, 0, 0, 0, 0, 1, 0]);
    pkt.extend_from_slice(&tcp);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].tcp_options.mss, None);
}

#[test]
fn ip_in_ip_depth_budget() {
    let mut pkt = eth_hdr(0x0800);
    for _ in 0..5 {
        pkt.extend_from_slice(&ipv4_hdr(4, [10, 0, 0, 1], [10, 0, 0, 2]));
    }
    let (stop, _) = parse_both(&pkt);
    assert_eq!(stop, Stop::EncapDepth);

    // one layer fewer fits the budget
    let mut pkt = eth_hdr(0x0800);
    for _ in 0..4 {
        pkt.extend_from_slice(&ipv4_hdr(4, [10, 0, 0, 1], [10, 0, 0, 2]));
    }
    pkt.extend_from_slice(&ipv4_hdr(17, [10, 0, 0, 1], [10, 0, 0, 2]));
    pkt.extend_from_slice(&[0x1f, 0x90, 0xd4, 0x31, 0, 0, 0, 0]);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    // frames exhausted: the innermost layers overwrote the last slot
    assert_eq!(frames[2].ports.unwrap().source, 8080);
}

#[test]
fn vlan_stack() {
    let mut pkt = eth_hdr(0x8100);
    pkt.extend_from_slice(&[0x20, 0x64, 0x08, 0x00]); // pcp 1, vid 100
    pkt.extend_from_slice(&ipv4_hdr(17, [10, 0, 0, 1], [10, 0, 0, 2]));
    pkt.extend_from_slice(&[0x1f, 0x90, 0x00, 0x35, 0, 0, 0, 0]);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].vlans.len(), 1);
    assert_eq!(frames[0].vlans[0].vid, 100);
    assert_eq!(frames[0].ports.unwrap().destination, 53);
}

#[test]
fn mpls_and_arp_leaves() {
    let mut pkt = eth_hdr(0x8847);
    pkt.extend_from_slice(&[0x00, 0x01, 0x51, 0x40]); // label 21, S, ttl 64
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].mpls.unwrap().label, 21);

    let mut pkt = eth_hdr(0x0806);
    let mut arp = vec![0u8; 28];
    arp[0..8].copy_from_slice(&[0, 1, 0x08, 0x00, 6, 4, 0, 2]);
    arp[14..18].copy_from_slice(&[192, 168, 0, 1]);
    arp[24..28].copy_from_slice(&[192, 168, 0, 2]);
    pkt.extend_from_slice(&arp);
    let (stop, frames) = parse_both(&pkt);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(frames[0].arp.unwrap().op, 2);
}

#[test]
fn ip_rooted_parser() {
    let mut pkt = ipv4_hdr(17, [10, 0, 0, 1], [10, 0, 0, 2]);
    pkt.extend_from_slice(&[0x1f, 0x90, 0x00, 0x35, 0, 0, 0, 0]);

    let mut interpreted = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
    let stop = interpret_ip(&pkt, &mut interpreted);
    let mut generated = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
    let stop_gen = parse_big_ip(&pkt, &mut generated);
    assert_eq!(stop, Stop::Okay);
    assert_eq!(stop, stop_gen);
    assert_eq!(interpreted, generated);
    assert_eq!(interpreted[0].ports.unwrap().source, 8080);
}

#[test]
fn interpreter_matches_generated_on_noise() {
    let built = big::build().unwrap();
    let root = built.graph.root_named(big::ETHER_PARSER).unwrap().node;
    bolero::check!().with_type().for_each(|data: &Vec<u8>| {
        let mut interpreted = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
        let stop = engine::parse(&built.graph, root, data, &mut interpreted, &Limits::default());
        let mut generated = [MetaAll::new(), MetaAll::new(), MetaAll::new()];
        let stop_gen = parse_big_ether(data, &mut generated);
        assert_eq!(stop, stop_gen);
        assert_eq!(interpreted, generated);
    });
}
