// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The graph builder: declaration records in, immutable graph out.

use crate::cycle::{BackEdge, back_edges};
use crate::decl::{Decl, DeclRecord, Loc, TableKey};
use crate::registry::{ProtoEntry, Registry};
use ahash::AHashMap;
use engine::{
    Graph, KeyWidth, NodeId, ParseNode, Root, Table, TlvNode, TlvNodeId, TlvTable, Tlvs,
    UnknownProto,
};
use ordermap::OrderMap;
use tracing::debug;

/// Failure to assemble a graph from declarations. No partial graph is
/// exposed; the first error aborts the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A name was declared or defined twice.
    #[error("{loc}: {what} `{name}` redeclared (first at {prev})")]
    Redeclared {
        /// Kind of thing redeclared (node, TLV node, table, parser).
        what: &'static str,
        /// Offending name.
        name: String,
        /// Position of the redeclaration.
        loc: Loc,
        /// Position of the first declaration.
        prev: Loc,
    },
    /// A placeholder was declared but no `MAKE_*` form defined it.
    #[error("{loc}: node `{name}` declared but never defined")]
    Undefined {
        /// Offending name.
        name: String,
        /// Position of the declaration.
        loc: Loc,
    },
    /// A referenced node or table name resolves to nothing.
    #[error("{loc}: `{name}` does not resolve to a declared name")]
    UnresolvedRef {
        /// Offending reference.
        name: String,
        /// Position of the reference.
        loc: Loc,
    },
    /// A protocol-description name is not in the registry.
    #[error("{loc}: unknown protocol node `{name}`")]
    UnknownProtoNode {
        /// Offending name.
        name: String,
        /// Position of the definition.
        loc: Loc,
    },
    /// A callback name is not in the registry.
    #[error("{loc}: unknown callback `{name}`")]
    UnknownCallback {
        /// Offending name.
        name: String,
        /// Position of the definition.
        loc: Loc,
    },
    /// TLV-bearing protocol bound with a plain form, or vice versa.
    #[error("{loc}: node `{node}` and protocol `{proto}` disagree about TLV support")]
    TlvMismatch {
        /// Node being defined.
        node: String,
        /// Protocol description name.
        proto: String,
        /// Position of the definition.
        loc: Loc,
    },
    /// A dispatch table was attached to a protocol with no `next_proto`.
    #[error("{loc}: node `{node}` has a dispatch table but protocol `{proto}` produces no key")]
    TableOnLeaf {
        /// Node being defined.
        node: String,
        /// Protocol description name.
        proto: String,
        /// Position of the definition.
        loc: Loc,
    },
    /// One table attached to nodes whose protocols disagree on key width.
    #[error("table `{table}` is attached at incompatible key widths")]
    WidthMismatch {
        /// Offending table.
        table: String,
    },
    /// A table key does not fit the discriminator width of its node.
    #[error("{loc}: key {key:#x} exceeds the {width:?} key space of table `{table}`")]
    KeyTooWide {
        /// Offending table.
        table: String,
        /// Offending key.
        key: u32,
        /// Width the owning node dispatches at.
        width: KeyWidth,
        /// Position of the table declaration.
        loc: Loc,
    },
    /// The same key (or the wildcard) appears twice in one table.
    #[error("{loc}: duplicate key {key} in table `{table}`")]
    DuplicateKey {
        /// Offending table.
        table: String,
        /// Offending key (`*` for the wildcard).
        key: String,
        /// Position of the table declaration.
        loc: Loc,
    },
}

/// A successfully built graph plus its advisory cycle report.
///
/// Cycles are legitimate (tunnels) and never fail the build; the report
/// lets callers confirm the encap budget will terminate them.
#[derive(Debug)]
pub struct Built<M> {
    /// The immutable parse graph.
    pub graph: Graph<M>,
    /// Back-edges reachable from any registered root.
    pub cycles: Vec<BackEdge>,
}

#[derive(Debug)]
struct NodeDef {
    loc: Loc,
    proto: String,
    metadata: Option<String>,
    handler: Option<String>,
    table: Option<String>,
    tlv: Option<TlvBinding>,
}

#[derive(Debug)]
struct TlvBinding {
    post: Option<String>,
    table: String,
}

#[derive(Debug)]
struct NodeMeta {
    loc: Loc,
    def: Option<NodeDef>,
}

#[derive(Debug)]
struct TlvNodeDef {
    loc: Loc,
    check: Option<String>,
    metadata: Option<String>,
    handler: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Proto,
    Tlv,
}

#[derive(Debug)]
struct TableDecl {
    loc: Loc,
    kind: TableKind,
    entries: Vec<(TableKey, String)>,
}

/// Build a graph from declaration records, resolving every name through
/// `registry`.
///
/// # Errors
///
/// Returns the first [`BuildError`] encountered; see the variants for the
/// individual failure classes.
#[allow(clippy::too_many_lines)]
pub fn build<M>(registry: &Registry<M>, decls: &[DeclRecord]) -> Result<Built<M>, BuildError> {
    let mut nodes: OrderMap<String, NodeMeta> = OrderMap::new();
    let mut tlv_nodes: OrderMap<String, TlvNodeDef> = OrderMap::new();
    let mut tables: OrderMap<String, TableDecl> = OrderMap::new();
    let mut parsers: Vec<(String, String, String, Loc)> = Vec::new();

    // Declare + define: collect everything name-addressable first so that
    // forward references resolve no matter the declaration order.
    for record in decls {
        let loc = record.loc.clone();
        match &record.decl {
            Decl::ParseNode { name } | Decl::TlvsParseNode { name } => {
                if let Some(prev) = nodes.get(name) {
                    return Err(BuildError::Redeclared {
                        what: "node",
                        name: name.clone(),
                        loc,
                        prev: prev.loc.clone(),
                    });
                }
                nodes.insert(name.clone(), NodeMeta { loc, def: None });
            }
            Decl::MakeParseNode {
                name,
                proto,
                metadata,
                handler,
                table,
            } => {
                define_node(
                    &mut nodes,
                    name,
                    NodeDef {
                        loc,
                        proto: proto.clone(),
                        metadata: metadata.clone(),
                        handler: handler.clone(),
                        table: Some(table.clone()),
                        tlv: None,
                    },
                )?;
            }
            Decl::MakeLeafParseNode {
                name,
                proto,
                metadata,
                handler,
            } => {
                define_node(
                    &mut nodes,
                    name,
                    NodeDef {
                        loc,
                        proto: proto.clone(),
                        metadata: metadata.clone(),
                        handler: handler.clone(),
                        table: None,
                        tlv: None,
                    },
                )?;
            }
            Decl::MakeLeafTlvsParseNode {
                name,
                proto,
                metadata,
                handler,
                post,
                tlv_table,
            } => {
                define_node(
                    &mut nodes,
                    name,
                    NodeDef {
                        loc,
                        proto: proto.clone(),
                        metadata: metadata.clone(),
                        handler: handler.clone(),
                        table: None,
                        tlv: Some(TlvBinding {
                            post: post.clone(),
                            table: tlv_table.clone(),
                        }),
                    },
                )?;
            }
            Decl::MakeTlvParseNode {
                name,
                check,
                metadata,
                handler,
            } => {
                if let Some(prev) = tlv_nodes.get(name) {
                    return Err(BuildError::Redeclared {
                        what: "tlv node",
                        name: name.clone(),
                        loc,
                        prev: prev.loc.clone(),
                    });
                }
                tlv_nodes.insert(
                    name.clone(),
                    TlvNodeDef {
                        loc,
                        check: check.clone(),
                        metadata: metadata.clone(),
                        handler: handler.clone(),
                    },
                );
            }
            Decl::MakeProtoTable { name, entries } => {
                declare_table(&mut tables, name, TableKind::Proto, entries, loc)?;
            }
            Decl::MakeTlvTable { name, entries } => {
                declare_table(&mut tables, name, TableKind::Tlv, entries, loc)?;
            }
            Decl::ParserAdd { name, desc, root } => {
                if let Some((_, _, _, prev)) = parsers.iter().find(|(n, ..)| n == name) {
                    return Err(BuildError::Redeclared {
                        what: "parser",
                        name: name.clone(),
                        loc,
                        prev: prev.clone(),
                    });
                }
                parsers.push((name.clone(), desc.clone(), root.clone(), loc));
            }
        }
    }

    // Emit vertices in declaration order; ids are stable across rebuilds
    // of the same source.
    let mut graph: Graph<M> = Graph::new();
    let mut ids: AHashMap<String, NodeId> = AHashMap::new();
    for (name, meta) in &nodes {
        let def = meta.def.as_ref().ok_or_else(|| BuildError::Undefined {
            name: name.clone(),
            loc: meta.loc.clone(),
        })?;
        let entry =
            registry
                .find_proto(&def.proto)
                .ok_or_else(|| BuildError::UnknownProtoNode {
                    name: def.proto.clone(),
                    loc: def.loc.clone(),
                })?;
        let proto = match (&entry, &def.tlv) {
            (ProtoEntry::Plain(proto), None) => *proto,
            (ProtoEntry::Tlvs(tlvs), Some(_)) => &tlvs.proto,
            _ => {
                return Err(BuildError::TlvMismatch {
                    node: name.clone(),
                    proto: def.proto.clone(),
                    loc: def.loc.clone(),
                });
            }
        };
        let extract = def
            .metadata
            .as_deref()
            .map(|sym| {
                registry
                    .find_extractor(sym)
                    .ok_or_else(|| BuildError::UnknownCallback {
                        name: sym.to_string(),
                        loc: def.loc.clone(),
                    })
            })
            .transpose()?;
        let handler = def
            .handler
            .as_deref()
            .map(|sym| {
                registry
                    .find_handler(sym)
                    .ok_or_else(|| BuildError::UnknownCallback {
                        name: sym.to_string(),
                        loc: def.loc.clone(),
                    })
            })
            .transpose()?;
        let id = graph.push_node(ParseNode {
            sym: name.clone(),
            proto_sym: def.proto.clone(),
            proto,
            extract,
            extract_sym: def.metadata.clone(),
            handler,
            handler_sym: def.handler.clone(),
            table: None,
            tlvs: None,
            unknown_proto: UnknownProto::default(),
        });
        ids.insert(name.clone(), id);
    }

    let mut tlv_ids: AHashMap<String, TlvNodeId> = AHashMap::new();
    for (name, def) in &tlv_nodes {
        let check = def
            .check
            .as_deref()
            .map(|sym| {
                registry
                    .find_tlv_check(sym)
                    .ok_or_else(|| BuildError::UnknownCallback {
                        name: sym.to_string(),
                        loc: def.loc.clone(),
                    })
            })
            .transpose()?;
        let extract = def
            .metadata
            .as_deref()
            .map(|sym| {
                registry
                    .find_extractor(sym)
                    .ok_or_else(|| BuildError::UnknownCallback {
                        name: sym.to_string(),
                        loc: def.loc.clone(),
                    })
            })
            .transpose()?;
        let handler = def
            .handler
            .as_deref()
            .map(|sym| {
                registry
                    .find_handler(sym)
                    .ok_or_else(|| BuildError::UnknownCallback {
                        name: sym.to_string(),
                        loc: def.loc.clone(),
                    })
            })
            .transpose()?;
        let id = graph.push_tlv_node(TlvNode {
            sym: name.clone(),
            check,
            check_sym: def.check.clone(),
            extract,
            extract_sym: def.metadata.clone(),
            handler,
            handler_sym: def.handler.clone(),
        });
        tlv_ids.insert(name.clone(), id);
    }

    // Connect: turn table declarations into edges. One declared table may
    // be shared by several nodes (the Ethernet table is), so widths are
    // checked across every attachment.
    let mut widths: AHashMap<String, KeyWidth> = AHashMap::new();
    for (name, meta) in &nodes {
        let def = meta.def.as_ref().unwrap_or_else(|| unreachable!());
        let id = ids
            .get(name.as_str())
            .copied()
            .unwrap_or_else(|| unreachable!());
        if let Some(table_sym) = &def.table {
            let decl = tables
                .get(table_sym)
                .filter(|decl| decl.kind == TableKind::Proto)
                .ok_or_else(|| BuildError::UnresolvedRef {
                    name: table_sym.clone(),
                    loc: def.loc.clone(),
                })?;
            let width =
                graph
                    .node(id)
                    .proto
                    .key_width
                    .ok_or_else(|| BuildError::TableOnLeaf {
                        node: name.clone(),
                        proto: def.proto.clone(),
                        loc: def.loc.clone(),
                    })?;
            if let Some(prev) = widths.insert(table_sym.clone(), width) {
                if prev != width {
                    return Err(BuildError::WidthMismatch {
                        table: table_sym.clone(),
                    });
                }
            }
            let table = connect_table(table_sym, decl, width, &ids)?;
            graph.node_mut(id).table = Some(table);
        }
        if let Some(tlv) = &def.tlv {
            let decl = tables
                .get(&tlv.table)
                .filter(|decl| decl.kind == TableKind::Tlv)
                .ok_or_else(|| BuildError::UnresolvedRef {
                    name: tlv.table.clone(),
                    loc: def.loc.clone(),
                })?;
            let table = connect_tlv_table(&tlv.table, decl, &tlv_ids)?;
            let post = tlv
                .post
                .as_deref()
                .map(|sym| {
                    registry
                        .find_handler(sym)
                        .ok_or_else(|| BuildError::UnknownCallback {
                            name: sym.to_string(),
                            loc: def.loc.clone(),
                        })
                })
                .transpose()?;
            let layout = match registry.find_proto(&def.proto) {
                Some(ProtoEntry::Tlvs(tlvs)) => &tlvs.layout,
                _ => unreachable!(),
            };
            graph.node_mut(id).tlvs = Some(Tlvs {
                layout,
                table,
                unknown_tlv: None,
                post,
                post_sym: tlv.post.clone(),
            });
        }
    }

    // Roots.
    for (name, desc, root, loc) in parsers {
        let node = ids
            .get(root.as_str())
            .copied()
            .ok_or(BuildError::UnresolvedRef { name: root, loc })?;
        graph.add_root(Root { name, desc, node });
    }

    // Cycle report: advisory only. Tunnel graphs are cyclic by design and
    // terminate through the walk's encap budget.
    let mut cycles: Vec<BackEdge> = Vec::new();
    for root in graph.roots() {
        for edge in back_edges(&graph, root.node) {
            if !cycles.contains(&edge) {
                cycles.push(edge);
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        tlv_nodes = graph.tlv_node_count(),
        roots = graph.roots().len(),
        back_edges = cycles.len(),
        "parse graph built"
    );
    Ok(Built { graph, cycles })
}

fn define_node(
    nodes: &mut OrderMap<String, NodeMeta>,
    name: &str,
    def: NodeDef,
) -> Result<(), BuildError> {
    match nodes.get_mut(name) {
        None => {
            let loc = def.loc.clone();
            nodes.insert(
                name.to_string(),
                NodeMeta {
                    loc,
                    def: Some(def),
                },
            );
            Ok(())
        }
        Some(meta) => match &meta.def {
            Some(prev) => Err(BuildError::Redeclared {
                what: "node",
                name: name.to_string(),
                loc: def.loc,
                prev: prev.loc.clone(),
            }),
            None => {
                meta.def = Some(def);
                Ok(())
            }
        },
    }
}

fn declare_table(
    tables: &mut OrderMap<String, TableDecl>,
    name: &str,
    kind: TableKind,
    entries: &[(TableKey, String)],
    loc: Loc,
) -> Result<(), BuildError> {
    if let Some(prev) = tables.get(name) {
        return Err(BuildError::Redeclared {
            what: "table",
            name: name.to_string(),
            loc,
            prev: prev.loc.clone(),
        });
    }
    tables.insert(
        name.to_string(),
        TableDecl {
            loc,
            kind,
            entries: entries.to_vec(),
        },
    );
    Ok(())
}

fn connect_table(
    sym: &str,
    decl: &TableDecl,
    width: KeyWidth,
    ids: &AHashMap<String, NodeId>,
) -> Result<Table, BuildError> {
    let mut entries: OrderMap<u32, NodeId> = OrderMap::new();
    let mut wildcard = None;
    for (key, target) in &decl.entries {
        let target = ids
            .get(target.as_str())
            .copied()
            .ok_or_else(|| BuildError::UnresolvedRef {
                name: target.clone(),
                loc: decl.loc.clone(),
            })?;
        match *key {
            TableKey::Key(key) => {
                if key > width.max_key() {
                    return Err(BuildError::KeyTooWide {
                        table: sym.to_string(),
                        key,
                        width,
                        loc: decl.loc.clone(),
                    });
                }
                if entries.insert(key, target).is_some() {
                    return Err(BuildError::DuplicateKey {
                        table: sym.to_string(),
                        key: format!("{key:#x}"),
                        loc: decl.loc.clone(),
                    });
                }
            }
            TableKey::Wildcard => {
                if wildcard.replace(target).is_some() {
                    return Err(BuildError::DuplicateKey {
                        table: sym.to_string(),
                        key: "*".to_string(),
                        loc: decl.loc.clone(),
                    });
                }
            }
        }
    }
    Ok(Table {
        sym: sym.to_string(),
        width,
        entries,
        wildcard,
    })
}

fn connect_tlv_table(
    sym: &str,
    decl: &TableDecl,
    ids: &AHashMap<String, TlvNodeId>,
) -> Result<TlvTable, BuildError> {
    let mut entries: OrderMap<u32, TlvNodeId> = OrderMap::new();
    let mut wildcard = None;
    for (key, target) in &decl.entries {
        let target = ids
            .get(target.as_str())
            .copied()
            .ok_or_else(|| BuildError::UnresolvedRef {
                name: target.clone(),
                loc: decl.loc.clone(),
            })?;
        match *key {
            TableKey::Key(key) => {
                if key > u32::from(u8::MAX) {
                    return Err(BuildError::KeyTooWide {
                        table: sym.to_string(),
                        key,
                        width: KeyWidth::U8,
                        loc: decl.loc.clone(),
                    });
                }
                if entries.insert(key, target).is_some() {
                    return Err(BuildError::DuplicateKey {
                        table: sym.to_string(),
                        key: format!("{key:#x}"),
                        loc: decl.loc.clone(),
                    });
                }
            }
            TableKey::Wildcard => {
                if wildcard.replace(target).is_some() {
                    return Err(BuildError::DuplicateKey {
                        table: sym.to_string(),
                        key: "*".to_string(),
                        loc: decl.loc.clone(),
                    });
                }
            }
        }
    }
    Ok(TlvTable {
        sym: sym.to_string(),
        entries,
        wildcard,
    })
}
