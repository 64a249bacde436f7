// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Parse-graph construction: declaration records, callback registry,
//! builder, cycle report, and Graphviz dump.
//!
//! Declarations are plain data ([`Decl`] records tagged with a source
//! [`Loc`]); they can come from the `pgc` front-end or be assembled in
//! code. The [`build`] function resolves every name against a
//! [`Registry`] and produces an immutable [`engine::Graph`] plus an
//! advisory cycle report.

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod build;
mod cycle;
mod decl;
mod dot;
mod registry;

pub use build::{Built, BuildError, build};
pub use cycle::{BackEdge, back_edges};
pub use decl::{Decl, DeclRecord, Loc, TableKey};
pub use dot::dotify;
pub use registry::{ProtoEntry, Registry};
