// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Generic parse-graph engine for network protocol headers.
//!
//! A protocol stack is described as a directed graph of [`ParseNode`]s.
//! Each node binds a static protocol description ([`ProtoNode`]) to
//! metadata extraction callbacks and a dispatch [`Table`] keyed by the
//! protocol discriminator of the current header. [`parse`] walks a byte
//! buffer through the graph from a root node, while the sibling `codegen`
//! crate can lower the same graph to a specialized straight-line walker
//! with identical semantics.

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod frame;
mod graph;
mod node;
mod stop;
mod walk;
pub mod wire;

pub use frame::{Ctrl, Frames};
pub use graph::{Graph, Root};
pub use node::{
    ExtractFn, HandlerFn, KeyWidth, LenFn, NextProtoFn, NodeId, ParseNode, ProtoNode, Table,
    TlvCheckFn, TlvLayout, TlvLenFn, TlvNode, TlvNodeId, TlvTable, Tlvs, TlvsProtoNode,
    UnknownProto,
};
pub use stop::Stop;
pub use walk::{Limits, parse};
