// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `pgc` — the parse-graph compiler.
//!
//! Reads a declaration source, builds the graph against the library
//! registry, reports vertices and cycles, and optionally emits either a
//! Graphviz dump (`.dot`) or a specialized Rust walker (`.rs`).

#![deny(clippy::all, clippy::pedantic)]

use clap::Parser;
use codegen::{GenConfig, GenError};
use engine::Limits;
use graph::BuildError;
use pktgraph_compiler::front::{self, FrontError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pgc", about = "Parse-graph compiler")]
struct Args {
    /// Declaration source file.
    source: PathBuf,
    /// Output file: `.dot` for Graphviz, `.rs` for a generated walker.
    /// With no output, only the build report is printed.
    output: Option<PathBuf>,
    /// Path of the metadata frame type in generated code.
    #[arg(long, default_value = "net::MetaAll")]
    meta_type: String,
    /// Path of the helper module in generated code.
    #[arg(long, default_value = "net::helpers")]
    helpers: String,
    /// Path of the engine crate in generated code.
    #[arg(long, default_value = "engine")]
    engine_path: String,
    /// Encapsulation budget baked into generated walkers.
    #[arg(long, default_value_t = Limits::default().max_encaps)]
    max_encaps: usize,
}

#[derive(Debug, thiserror::Error)]
enum PgcError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Front(#[from] FrontError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Gen(#[from] GenError),
    #[error("unknown output extension in `{0:?}` (expected .dot or .rs)")]
    UnknownExtension(PathBuf),
    #[error("declaration source registers no parser roots")]
    NoRoots,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pgc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), PgcError> {
    let src = std::fs::read_to_string(&args.source)?;
    let file = args.source.display().to_string();
    let records = front::parse_decls(&file, &src)?;
    debug!(records = records.len(), "declarations parsed");

    let registry = net::registry();
    let built = graph::build(&registry, &records)?;
    println!(
        "{file}: {nodes} vertices, {tlvs} tlv nodes, {roots} roots",
        nodes = built.graph.node_count(),
        tlvs = built.graph.tlv_node_count(),
        roots = built.graph.roots().len(),
    );
    for edge in &built.cycles {
        println!(
            "  back edge: {} -> {}",
            built.graph.node(edge.from).sym,
            built.graph.node(edge.to).sym,
        );
    }
    println!(
        "has cycles? -> {}",
        if built.cycles.is_empty() { "no" } else { "yes" }
    );

    let Some(output) = &args.output else {
        return Ok(());
    };
    match output.extension().and_then(|ext| ext.to_str()) {
        Some("dot") => {
            let root = built.graph.roots().first().ok_or(PgcError::NoRoots)?;
            let dot = graph::dotify(&built.graph, root.node, &built.cycles);
            std::fs::write(output, dot)?;
            println!("wrote {}", output.display());
        }
        Some("rs") => {
            let cfg = GenConfig {
                meta_type: args.meta_type.clone(),
                helpers: args.helpers.clone(),
                engine_path: args.engine_path.clone(),
                limits: Limits {
                    max_encaps: args.max_encaps,
                    ..Limits::default()
                },
                source: source_name(&args.source),
            };
            let code = codegen::generate(&built.graph, &cfg)?;
            std::fs::write(output, code)?;
            println!("wrote {}", output.display());
        }
        _ => return Err(PgcError::UnknownExtension(output.clone())),
    }
    Ok(())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        })
}
