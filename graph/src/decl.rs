// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Declaration records consumed by the builder.
//!
//! One record per declaration form; the front-end in `pgc` parses these
//! out of a declaration file, while embedded node sets construct them
//! directly. All references are by name and resolve at build time.

use core::fmt;

/// Source position of a declaration, carried into build diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loc {
    /// Originating file, or `"builtin"` for records assembled in code.
    pub file: String,
    /// 1-based line; zero for builtins.
    pub line: u32,
}

impl Loc {
    /// Position inside a declaration source file.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Loc {
        Loc {
            file: file.into(),
            line,
        }
    }

    /// Position for records assembled in code.
    #[must_use]
    pub fn builtin() -> Loc {
        Loc {
            file: "builtin".to_string(),
            line: 0,
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A dispatch-table key: an exact discriminator or the wildcard (`*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKey {
    /// Exact-match key.
    Key(u32),
    /// Fallback consulted when no exact key matches.
    Wildcard,
}

/// One declaration form.
///
/// Callback fields hold `None` where the source said `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// `DECL_PARSE_NODE(name)`
    ParseNode {
        /// Node name.
        name: String,
    },
    /// `DECL_TLVS_PARSE_NODE(name)`
    TlvsParseNode {
        /// Node name.
        name: String,
    },
    /// `MAKE_PARSE_NODE(name, proto, metadata, handler, table)`
    MakeParseNode {
        /// Node name.
        name: String,
        /// Registered protocol description.
        proto: String,
        /// Metadata extractor, if any.
        metadata: Option<String>,
        /// Protocol handler, if any.
        handler: Option<String>,
        /// Dispatch table name.
        table: String,
    },
    /// `MAKE_LEAF_PARSE_NODE(name, proto, metadata, handler)`
    MakeLeafParseNode {
        /// Node name.
        name: String,
        /// Registered protocol description.
        proto: String,
        /// Metadata extractor, if any.
        metadata: Option<String>,
        /// Protocol handler, if any.
        handler: Option<String>,
    },
    /// `MAKE_LEAF_TLVS_PARSE_NODE(name, proto, metadata, handler, post, tlv_table)`
    MakeLeafTlvsParseNode {
        /// Node name.
        name: String,
        /// Registered TLV-bearing protocol description.
        proto: String,
        /// Metadata extractor, if any.
        metadata: Option<String>,
        /// Protocol handler, if any.
        handler: Option<String>,
        /// Handler run after the TLV loop, if any.
        post: Option<String>,
        /// TLV dispatch table name.
        tlv_table: String,
    },
    /// `MAKE_TLV_PARSE_NODE(name, check_length, metadata, handler)`
    MakeTlvParseNode {
        /// TLV node name.
        name: String,
        /// Check-length callback, if any.
        check: Option<String>,
        /// Metadata extractor, if any.
        metadata: Option<String>,
        /// TLV handler, if any.
        handler: Option<String>,
    },
    /// `MAKE_PROTO_TABLE(name, { key, target }, …)`
    MakeProtoTable {
        /// Table name.
        name: String,
        /// `(key, target node)` pairs in declaration order.
        entries: Vec<(TableKey, String)>,
    },
    /// `MAKE_TLV_TABLE(name, { type, target }, …)`
    MakeTlvTable {
        /// Table name.
        name: String,
        /// `(type, target TLV node)` pairs in declaration order.
        entries: Vec<(TableKey, String)>,
    },
    /// `PARSER_ADD(name, description, root)` / `PARSER(…)`
    ParserAdd {
        /// Parser name.
        name: String,
        /// Human-readable description.
        desc: String,
        /// Root node name.
        root: String,
    },
}

/// A declaration plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclRecord {
    /// The declaration proper.
    pub decl: Decl,
    /// Source position for diagnostics.
    pub loc: Loc,
}

impl DeclRecord {
    /// Wrap a declaration assembled in code.
    #[must_use]
    pub fn builtin(decl: Decl) -> DeclRecord {
        DeclRecord {
            decl,
            loc: Loc::builtin(),
        }
    }
}

impl From<Decl> for DeclRecord {
    fn from(decl: Decl) -> DeclRecord {
        DeclRecord::builtin(decl)
    }
}
