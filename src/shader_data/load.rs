use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::graph::{ShaderForest, validate_forest};
use super::parse::{parse_links, parse_summaries};

pub fn load_shader_forest(summary_path: &Path, links_path: &Path) -> Result<ShaderForest> {
    let summary_raw = fs::read_to_string(summary_path)
        .with_context(|| format!("failed to read shader summary {}", summary_path.display()))?;
    let links_raw = fs::read_to_string(links_path)
        .with_context(|| format!("failed to read shader links {}", links_path.display()))?;

    let summaries = parse_summaries(&summary_raw)
        .with_context(|| format!("failed to parse {}", summary_path.display()))?;
    let links = parse_links(&links_raw)
        .with_context(|| format!("failed to parse {}", links_path.display()))?;

    validate_forest(&summaries, &links).context("shader links do not describe a forest")?;

    let forest = ShaderForest { summaries, links };
    info!(
        "loaded {} shaders in {} trees ({} edges, {} creators)",
        forest.node_count(),
        forest.root_count(),
        forest.edge_count(),
        forest.creator_count()
    );

    Ok(forest)
}
