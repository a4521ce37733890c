//! Pipeline diagram export in Graphviz DOT format.
//!
//! Describes the fixed stage topology only; rendering the DOT text to an
//! image is left to external tooling (`dot -Tpng`).

use crate::error::Result;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const START_NODE: &str = "__start__";
pub const END_NODE: &str = "__end__";
pub const DOT_FILENAME: &str = "news_workflow.dot";

/// Edges of a linear pipeline over `stages`, including the start and end edges.
pub fn edges<'a>(stages: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    let mut chain = Vec::with_capacity(stages.len() + 2);
    chain.push(START_NODE);
    chain.extend_from_slice(stages);
    chain.push(END_NODE);
    chain.windows(2).map(|w| (w[0], w[1])).collect()
}

pub fn to_dot(stages: &[&str]) -> String {
    let mut dot = String::from("digraph G {\n");
    for node in stages {
        let _ = writeln!(dot, "    \"{node}\" [label=\"{node}\"];");
    }
    for (src, tgt) in edges(stages) {
        let _ = writeln!(dot, "    \"{src}\" -> \"{tgt}\";");
    }
    dot.push('}');
    dot
}

/// Write [`DOT_FILENAME`] into `output_dir`.
#[instrument(level = "info", skip_all, fields(%output_dir))]
pub async fn write_dot(stages: &[&str], output_dir: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(DOT_FILENAME);
    fs::write(&path, to_dot(stages)).await?;
    info!(path = %path.display(), "Graph saved");
    Ok(path)
}
