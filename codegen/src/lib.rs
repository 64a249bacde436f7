// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Code generator: lowers a built parse graph to a specialized walker.
//!
//! The emitted module interprets nothing at runtime: every dispatch
//! table becomes a `match` over literal keys, every node a static
//! function, and the walk driver a `loop` over a vertex enum (the
//! tail-call of the interpreter, minus the indirect calls). Cycles in
//! the graph simply revisit enum states and stay bounded by the same
//! encapsulation budget the interpreter uses.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown, clippy::missing_errors_doc, clippy::must_use_candidate)]

mod rust;

pub use rust::{GenConfig, GenError, generate};
