// @generated by pgc from builtin declarations; do not edit.
//
// Specialized walker for: big_ether, big_ip.
#![allow(clippy::all, clippy::pedantic)]
#![allow(unused_variables, unused_mut, unreachable_patterns)]

use engine::{Ctrl, Frames, Stop};
use crate::helpers as helpers;
use crate::MetaAll as Meta;

const MAX_ENCAPS: usize = 4;
const MAX_TLVS: usize = 64;
const MAX_TLV_NESTING: usize = 2;
const MAX_OVERLAY_CHAIN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertex {
    EtherNode,
    Ipv4CheckNode,
    Ipv4Node,
    Ipv6CheckNode,
    Ipv6Node,
    IpOverlayNode,
    Ipv6EhNode,
    Ipv6FragNode,
    GreBaseNode,
    GreV0Node,
    GreV1Node,
    E8021adNode,
    E8021qNode,
    PppNode,
    Ipv4ipNode,
    Ipv6ipNode,
    BatmanNode,
    PortsNode,
    Icmpv4Node,
    Icmpv6Node,
    MplsNode,
    ArpNode,
    RarpNode,
    TipcNode,
    FcoeNode,
    IgmpNode,
    TcpNode,
}

enum Step {
    Next {
        target: Vertex,
        hlen: usize,
        overlay: bool,
        encap: bool,
    },
    Halt(Stop),
}

/// Big parser for Ethernet.
pub fn parse_big_ether(pkt: &[u8], frames: &mut [Meta]) -> Stop {
    run(Vertex::EtherNode, pkt, frames)
}

/// Big parser for IP.
pub fn parse_big_ip(pkt: &[u8], frames: &mut [Meta]) -> Stop {
    run(Vertex::IpOverlayNode, pkt, frames)
}

fn run(root: Vertex, pkt: &[u8], frames: &mut [Meta]) -> Stop {
    if frames.is_empty() {
        return Stop::Fail;
    }
    let mut frames = Frames::new(frames);
    let mut vertex = root;
    let mut off = 0usize;
    let mut encaps = 0usize;
    let mut overlay_run = 0usize;
    loop {
        let step = match vertex {
            Vertex::EtherNode => ether_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv4CheckNode => ipv4_check_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv4Node => ipv4_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv6CheckNode => ipv6_check_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv6Node => ipv6_node(pkt, off, frames.current(), encaps),
            Vertex::IpOverlayNode => ip_overlay_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv6EhNode => ipv6_eh_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv6FragNode => ipv6_frag_node(pkt, off, frames.current(), encaps),
            Vertex::GreBaseNode => gre_base_node(pkt, off, frames.current(), encaps),
            Vertex::GreV0Node => gre_v0_node(pkt, off, frames.current(), encaps),
            Vertex::GreV1Node => gre_v1_node(pkt, off, frames.current(), encaps),
            Vertex::E8021adNode => e8021ad_node(pkt, off, frames.current(), encaps),
            Vertex::E8021qNode => e8021q_node(pkt, off, frames.current(), encaps),
            Vertex::PppNode => ppp_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv4ipNode => ipv4ip_node(pkt, off, frames.current(), encaps),
            Vertex::Ipv6ipNode => ipv6ip_node(pkt, off, frames.current(), encaps),
            Vertex::BatmanNode => batman_node(pkt, off, frames.current(), encaps),
            Vertex::PortsNode => ports_node(pkt, off, frames.current(), encaps),
            Vertex::Icmpv4Node => icmpv4_node(pkt, off, frames.current(), encaps),
            Vertex::Icmpv6Node => icmpv6_node(pkt, off, frames.current(), encaps),
            Vertex::MplsNode => mpls_node(pkt, off, frames.current(), encaps),
            Vertex::ArpNode => arp_node(pkt, off, frames.current(), encaps),
            Vertex::RarpNode => rarp_node(pkt, off, frames.current(), encaps),
            Vertex::TipcNode => tipc_node(pkt, off, frames.current(), encaps),
            Vertex::FcoeNode => fcoe_node(pkt, off, frames.current(), encaps),
            Vertex::IgmpNode => igmp_node(pkt, off, frames.current(), encaps),
            Vertex::TcpNode => tcp_node(pkt, off, frames.current(), encaps),
        };
        match step {
            Step::Halt(stop) => return stop,
            Step::Next {
                target,
                hlen,
                overlay,
                encap,
            } => {
                if encap {
                    encaps += 1;
                    if encaps > MAX_ENCAPS {
                        return Stop::EncapDepth;
                    }
                    frames.rotate();
                }
                if overlay || hlen == 0 {
                    overlay_run += 1;
                    if overlay_run > MAX_OVERLAY_CHAIN {
                        return Stop::Fail;
                    }
                } else {
                    off += hlen;
                    overlay_run = 0;
                }
                vertex = target;
            }
        }
    }
}

#[inline(always)]
fn ether_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 14 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 14usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ether_metadata(hdr, frame, ctrl);
    let target = match helpers::ether_next_proto(hdr) {
        0x0800 => Vertex::Ipv4CheckNode,
        0x86dd => Vertex::Ipv6CheckNode,
        0x88a8 => Vertex::E8021adNode,
        0x8100 => Vertex::E8021qNode,
        0x8847 => Vertex::MplsNode,
        0x8848 => Vertex::MplsNode,
        0x0806 => Vertex::ArpNode,
        0x8035 => Vertex::RarpNode,
        0x88ca => Vertex::TipcNode,
        0x4305 => Vertex::BatmanNode,
        0x8906 => Vertex::FcoeNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ipv4_check_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 1 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 1usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ip_next_proto(hdr) {
        4 => Vertex::Ipv4Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: false,
    }
}

#[inline(always)]
fn ipv4_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 20 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::ipv4_len(&pkt[off..]) {
        Ok(0) => 20,
        Ok(hlen) if hlen < 20 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ipv4_metadata(hdr, frame, ctrl);
    let target = match helpers::ipv4_next_proto(hdr) {
        6 => Vertex::TcpNode,
        17 => Vertex::PortsNode,
        132 => Vertex::PortsNode,
        33 => Vertex::PortsNode,
        47 => Vertex::GreBaseNode,
        1 => Vertex::Icmpv4Node,
        2 => Vertex::IgmpNode,
        137 => Vertex::MplsNode,
        4 => Vertex::Ipv4ipNode,
        41 => Vertex::Ipv6ipNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ipv6_check_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 1 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 1usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ip_next_proto(hdr) {
        6 => Vertex::Ipv6Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: false,
    }
}

#[inline(always)]
fn ipv6_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 40 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 40usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ipv6_metadata(hdr, frame, ctrl);
    if let Err(stop) = helpers::ipv6_stop_flowlabel(hdr, frame, ctrl) {
        return Step::Halt(stop);
    }
    let target = match helpers::ipv6_next_proto(hdr) {
        0 => Vertex::Ipv6EhNode,
        43 => Vertex::Ipv6EhNode,
        60 => Vertex::Ipv6EhNode,
        44 => Vertex::Ipv6FragNode,
        6 => Vertex::TcpNode,
        17 => Vertex::PortsNode,
        132 => Vertex::PortsNode,
        33 => Vertex::PortsNode,
        47 => Vertex::GreBaseNode,
        58 => Vertex::Icmpv6Node,
        2 => Vertex::IgmpNode,
        137 => Vertex::MplsNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ip_overlay_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 1 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 1usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ip_next_proto(hdr) {
        4 => Vertex::Ipv4Node,
        6 => Vertex::Ipv6Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: false,
    }
}

#[inline(always)]
fn ipv6_eh_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 8 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::ipv6_eh_len(&pkt[off..]) {
        Ok(0) => 8,
        Ok(hlen) if hlen < 8 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ipv6_eh_metadata(hdr, frame, ctrl);
    let target = match helpers::ipv6_eh_next_proto(hdr) {
        0 => Vertex::Ipv6EhNode,
        43 => Vertex::Ipv6EhNode,
        60 => Vertex::Ipv6EhNode,
        44 => Vertex::Ipv6FragNode,
        6 => Vertex::TcpNode,
        17 => Vertex::PortsNode,
        132 => Vertex::PortsNode,
        33 => Vertex::PortsNode,
        47 => Vertex::GreBaseNode,
        58 => Vertex::Icmpv6Node,
        2 => Vertex::IgmpNode,
        137 => Vertex::MplsNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ipv6_frag_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 8 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 8usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ipv6_frag_metadata(hdr, frame, ctrl);
    if let Err(stop) = helpers::ipv6_frag_stop_nonfirst(hdr, frame, ctrl) {
        return Step::Halt(stop);
    }
    let target = match helpers::ipv6_frag_eh_next_proto(hdr) {
        0 => Vertex::Ipv6EhNode,
        43 => Vertex::Ipv6EhNode,
        60 => Vertex::Ipv6EhNode,
        44 => Vertex::Ipv6FragNode,
        6 => Vertex::TcpNode,
        17 => Vertex::PortsNode,
        132 => Vertex::PortsNode,
        33 => Vertex::PortsNode,
        47 => Vertex::GreBaseNode,
        58 => Vertex::Icmpv6Node,
        2 => Vertex::IgmpNode,
        137 => Vertex::MplsNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn gre_base_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::gre_base_len(&pkt[off..]) {
        Ok(0) => 4,
        Ok(hlen) if hlen < 4 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::gre_base_next_proto(hdr) {
        0 => Vertex::GreV0Node,
        1 => Vertex::GreV1Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: false,
    }
}

#[inline(always)]
fn gre_v0_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::gre_v0_len(&pkt[off..]) {
        Ok(0) => 4,
        Ok(hlen) if hlen < 4 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::gre_v0_metadata(hdr, frame, ctrl);
    let target = match helpers::gre_v0_next_proto(hdr) {
        0x0800 => Vertex::Ipv4CheckNode,
        0x86dd => Vertex::Ipv6CheckNode,
        0x6558 => Vertex::EtherNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: true,
    }
}

#[inline(always)]
fn gre_v1_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::gre_v1_len(&pkt[off..]) {
        Ok(0) => 4,
        Ok(hlen) if hlen < 4 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::gre_v1_metadata(hdr, frame, ctrl);
    let target = match helpers::gre_v1_next_proto(hdr) {
        0 => Vertex::PppNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: true,
    }
}

#[inline(always)]
fn e8021ad_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 4usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::vlan_metadata(hdr, frame, ctrl);
    let target = match helpers::vlan_next_proto(hdr) {
        0x0800 => Vertex::Ipv4CheckNode,
        0x86dd => Vertex::Ipv6CheckNode,
        0x88a8 => Vertex::E8021adNode,
        0x8100 => Vertex::E8021qNode,
        0x8847 => Vertex::MplsNode,
        0x8848 => Vertex::MplsNode,
        0x0806 => Vertex::ArpNode,
        0x8035 => Vertex::RarpNode,
        0x88ca => Vertex::TipcNode,
        0x4305 => Vertex::BatmanNode,
        0x8906 => Vertex::FcoeNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn e8021q_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 4usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::vlan_metadata(hdr, frame, ctrl);
    let target = match helpers::vlan_next_proto(hdr) {
        0x0800 => Vertex::Ipv4CheckNode,
        0x86dd => Vertex::Ipv6CheckNode,
        0x88a8 => Vertex::E8021adNode,
        0x8100 => Vertex::E8021qNode,
        0x8847 => Vertex::MplsNode,
        0x8848 => Vertex::MplsNode,
        0x0806 => Vertex::ArpNode,
        0x8035 => Vertex::RarpNode,
        0x88ca => Vertex::TipcNode,
        0x4305 => Vertex::BatmanNode,
        0x8906 => Vertex::FcoeNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ppp_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 2 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::ppp_len(&pkt[off..]) {
        Ok(0) => 2,
        Ok(hlen) if hlen < 2 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ppp_next_proto(hdr) {
        0x0021 => Vertex::Ipv4CheckNode,
        0x0057 => Vertex::Ipv6CheckNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ipv4ip_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    let hlen = 0usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ipv4ip_next_proto(hdr) {
        0 => Vertex::Ipv4Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: true,
    }
}

#[inline(always)]
fn ipv6ip_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    let hlen = 0usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::ipv6ip_next_proto(hdr) {
        0 => Vertex::Ipv6Node,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: true,
        encap: true,
    }
}

#[inline(always)]
fn batman_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 24 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::batman_len(&pkt[off..]) {
        Ok(0) => 24,
        Ok(hlen) if hlen < 24 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    let target = match helpers::batman_next_proto(hdr) {
        0x0800 => Vertex::Ipv4CheckNode,
        0x86dd => Vertex::Ipv6CheckNode,
        0x88a8 => Vertex::E8021adNode,
        0x8100 => Vertex::E8021qNode,
        0x8847 => Vertex::MplsNode,
        0x8848 => Vertex::MplsNode,
        0x0806 => Vertex::ArpNode,
        0x8035 => Vertex::RarpNode,
        0x88ca => Vertex::TipcNode,
        0x4305 => Vertex::BatmanNode,
        0x8906 => Vertex::FcoeNode,
        _ => return Step::Halt(Stop::UnknownProto),
    };
    Step::Next {
        target,
        hlen,
        overlay: false,
        encap: false,
    }
}

#[inline(always)]
fn ports_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 4usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ports_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn icmpv4_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 8 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 8usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::icmp_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn icmpv6_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 8 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 8usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::icmp_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn mpls_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 4 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::mpls_len(&pkt[off..]) {
        Ok(0) => 4,
        Ok(hlen) if hlen < 4 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::mpls_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn arp_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 28 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 28usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::arp_rarp_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn rarp_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 28 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 28usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::arp_rarp_metadata(hdr, frame, ctrl);
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn tipc_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 16 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 16usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn fcoe_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 14 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 14usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn igmp_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 8 {
        return Step::Halt(Stop::Length);
    }
    let hlen = 8usize;
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    Step::Halt(Stop::Okay)
}

#[inline(always)]
fn tcp_node(pkt: &[u8], off: usize, frame: &mut Meta, encaps: usize) -> Step {
    let rem = pkt.len() - off;
    if rem < 20 {
        return Step::Halt(Stop::Length);
    }
    let hlen = match helpers::tcp_tlvs_len(&pkt[off..]) {
        Ok(0) => 20,
        Ok(hlen) if hlen < 20 => return Step::Halt(Stop::Length),
        Ok(hlen) => hlen,
        Err(stop) => return Step::Halt(stop),
    };
    if rem < hlen {
        return Step::Halt(Stop::Length);
    }
    let hdr = &pkt[off..off + hlen];
    let ctrl = Ctrl {
        hdr_len: hlen,
        encaps,
    };
    helpers::ports_metadata(hdr, frame, ctrl);
    if let Err(stop) = tcp_node_tlvs(hdr, frame, ctrl) {
        return Step::Halt(stop);
    }
    Step::Halt(Stop::Okay)
}

fn tcp_node_tlvs(hdr: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {
    let mut off = 20usize;
    let mut count = 0usize;
    while off < hdr.len() {
        let rest = &hdr[off..];
        let kind = rest[0];
        if kind == 0u8 {
            break;
        }
        if kind == 1u8 {
            off += 1;
            continue;
        }
        if rest.len() < 2 {
            return Err(Stop::TlvLength);
        }
        let len = helpers::tcp_tlvs_tlv_len(rest);
        if len < 2 || len > rest.len() {
            return Err(Stop::TlvLength);
        }
        count += 1;
        if count > MAX_TLVS {
            return Err(Stop::TlvLength);
        }
        let tlv = &rest[..len];
        let tlv_ctrl = Ctrl {
            hdr_len: len,
            encaps: ctrl.encaps,
        };
        tcp_node_dispatch(kind, tlv, frame, tlv_ctrl)?;
        off += len;
    }
    Ok(())
}

fn tcp_node_dispatch(kind: u8, tlv: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {
    let mut depth = 0usize;
    let promote = tcp_node_promote;
    match kind {
        2u8 => {
            if helpers::tcp_opt_mss_check(tlv, frame).is_err() {
                depth += 1;
                return promote(depth, tlv, frame, ctrl);
            }
            helpers::tcp_opt_mss_metadata(tlv, frame, ctrl);
            Ok(())
        }
        3u8 => {
            if helpers::tcp_opt_window_scaling_check(tlv, frame).is_err() {
                depth += 1;
                return promote(depth, tlv, frame, ctrl);
            }
            helpers::tcp_opt_window_scaling_metadata(tlv, frame, ctrl);
            Ok(())
        }
        8u8 => {
            if helpers::tcp_opt_timestamp_check(tlv, frame).is_err() {
                depth += 1;
                return promote(depth, tlv, frame, ctrl);
            }
            helpers::tcp_opt_timestamp_metadata(tlv, frame, ctrl);
            Ok(())
        }
        5u8 => {
            if helpers::tcp_opt_sack_check(tlv, frame).is_err() {
                depth += 1;
                return promote(depth, tlv, frame, ctrl);
            }
            helpers::tcp_opt_sack_metadata(tlv, frame, ctrl);
            Ok(())
        }
        _ => promote(depth, tlv, frame, ctrl),
    }
}

fn tcp_node_promote(depth: usize, tlv: &[u8], frame: &mut Meta, ctrl: Ctrl) -> Result<(), Stop> {
    if depth > MAX_TLV_NESTING {
        return Err(Stop::TlvLength);
    }
    Ok(())
}
