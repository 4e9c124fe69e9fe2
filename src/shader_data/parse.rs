use anyhow::{Context, Result};

use super::graph::{ShaderLink, ShaderSummary};

pub(super) fn parse_summaries(raw: &str) -> Result<Vec<ShaderSummary>> {
    serde_json::from_str(raw).context("invalid shader summary JSON")
}

pub(super) fn parse_links(raw: &str) -> Result<Vec<ShaderLink>> {
    serde_json::from_str(raw).context("invalid shader link JSON")
}
