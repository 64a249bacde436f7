// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Library half of `pgc`: the declaration-file front-end.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown, clippy::missing_errors_doc)]

pub mod front;
