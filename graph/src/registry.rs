// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Name-addressable callback registry the builder resolves against.

use ahash::AHashMap;
use engine::{ExtractFn, HandlerFn, ProtoNode, TlvCheckFn, TlvsProtoNode};

/// A registered protocol description: plain, or TLV-bearing.
#[derive(Debug, Clone, Copy)]
pub enum ProtoEntry {
    /// Ordinary protocol node.
    Plain(&'static ProtoNode),
    /// Protocol node carrying a TLV run (declared with the leaf-TLVs form).
    Tlvs(&'static TlvsProtoNode),
}

/// Everything a declaration may reference by name: protocol descriptions,
/// metadata extractors, handlers, and TLV check-lengths.
///
/// The protocol library registers its node set once; declarations then
/// bind the names. Registration is keyed by `&'static str` since node
/// sets live in statics.
#[derive(Debug, Default)]
pub struct Registry<M> {
    protos: AHashMap<&'static str, ProtoEntry>,
    extractors: AHashMap<&'static str, ExtractFn<M>>,
    handlers: AHashMap<&'static str, HandlerFn<M>>,
    tlv_checks: AHashMap<&'static str, TlvCheckFn<M>>,
}

impl<M> Registry<M> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Registry<M> {
        Registry {
            protos: AHashMap::new(),
            extractors: AHashMap::new(),
            handlers: AHashMap::new(),
            tlv_checks: AHashMap::new(),
        }
    }

    /// Register a plain protocol description.
    pub fn proto(&mut self, name: &'static str, node: &'static ProtoNode) -> &mut Self {
        self.protos.insert(name, ProtoEntry::Plain(node));
        self
    }

    /// Register a TLV-bearing protocol description.
    pub fn tlvs_proto(&mut self, name: &'static str, node: &'static TlvsProtoNode) -> &mut Self {
        self.protos.insert(name, ProtoEntry::Tlvs(node));
        self
    }

    /// Register a metadata extractor.
    pub fn extractor(&mut self, name: &'static str, extract: ExtractFn<M>) -> &mut Self {
        self.extractors.insert(name, extract);
        self
    }

    /// Register a protocol (or TLV) handler.
    pub fn handler(&mut self, name: &'static str, handler: HandlerFn<M>) -> &mut Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Register a TLV check-length callback.
    pub fn tlv_check(&mut self, name: &'static str, check: TlvCheckFn<M>) -> &mut Self {
        self.tlv_checks.insert(name, check);
        self
    }

    /// Protocol description by name.
    #[must_use]
    pub fn find_proto(&self, name: &str) -> Option<ProtoEntry> {
        self.protos.get(name).copied()
    }

    /// Metadata extractor by name.
    #[must_use]
    pub fn find_extractor(&self, name: &str) -> Option<ExtractFn<M>> {
        self.extractors.get(name).copied()
    }

    /// Handler by name.
    #[must_use]
    pub fn find_handler(&self, name: &str) -> Option<HandlerFn<M>> {
        self.handlers.get(name).copied()
    }

    /// TLV check-length by name.
    #[must_use]
    pub fn find_tlv_check(&self, name: &str) -> Option<TlvCheckFn<M>> {
        self.tlv_checks.get(name).copied()
    }
}
