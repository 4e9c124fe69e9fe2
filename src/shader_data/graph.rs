use std::collections::HashSet;

use anyhow::{Result, anyhow};
use serde::Deserialize;

/// Per-shader metadata. Only the creator is needed for layout and coloring.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ShaderSummary {
    pub creator: String,
}

/// Parent/child links of one shader, index-aligned with the summary list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShaderLink {
    #[serde(default = "ShaderLink::no_parent")]
    pub parent_index: i64,
    #[serde(default)]
    pub child_indices: Vec<usize>,
}

impl ShaderLink {
    fn no_parent() -> i64 {
        -1
    }

    pub fn is_root(&self) -> bool {
        self.parent_index < 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShaderForest {
    pub summaries: Vec<ShaderSummary>,
    pub links: Vec<ShaderLink>,
}

impl ShaderForest {
    pub fn node_count(&self) -> usize {
        self.links.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(|link| link.child_indices.len()).sum()
    }

    pub fn root_count(&self) -> usize {
        self.links.iter().filter(|link| link.is_root()).count()
    }

    pub fn creator_count(&self) -> usize {
        self.summaries
            .iter()
            .map(|summary| summary.creator.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn creator(&self, index: usize) -> Option<&str> {
        self.summaries.get(index).map(|summary| summary.creator.as_str())
    }

    pub fn child_count(&self, index: usize) -> usize {
        self.links
            .get(index)
            .map(|link| link.child_indices.len())
            .unwrap_or(0)
    }
}

/// Checks that `links` describes a forest over `summaries`.
///
/// The layout engine trusts its input, so everything read from disk goes
/// through here first.
pub fn validate_forest(summaries: &[ShaderSummary], links: &[ShaderLink]) -> Result<()> {
    if summaries.len() != links.len() {
        return Err(anyhow!(
            "summary list has {} entries but link list has {}",
            summaries.len(),
            links.len()
        ));
    }

    let node_count = links.len();
    let mut listed_parent: Vec<Option<usize>> = vec![None; node_count];

    for (index, link) in links.iter().enumerate() {
        for &child in &link.child_indices {
            let Some(child_link) = links.get(child) else {
                return Err(anyhow!(
                    "node {index} lists child {child}, but only {node_count} nodes exist"
                ));
            };

            if let Some(previous) = listed_parent[child].replace(index) {
                return Err(anyhow!(
                    "node {child} is listed as a child of both {previous} and {index}"
                ));
            }

            if child_link.parent_index != index as i64 {
                return Err(anyhow!(
                    "node {child} is listed as a child of {index} but records parent {}",
                    child_link.parent_index
                ));
            }
        }
    }

    for (index, link) in links.iter().enumerate() {
        if !link.is_root() && listed_parent[index].is_none() {
            return Err(anyhow!(
                "node {index} records parent {} which does not list it as a child",
                link.parent_index
            ));
        }
    }

    let mut reached = vec![false; node_count];
    let mut reached_count = 0usize;
    let mut stack = (0..node_count)
        .filter(|&index| links[index].is_root())
        .collect::<Vec<_>>();

    while let Some(index) = stack.pop() {
        if reached[index] {
            continue;
        }
        reached[index] = true;
        reached_count += 1;
        stack.extend(links[index].child_indices.iter().copied());
    }

    if reached_count != node_count {
        return Err(anyhow!(
            "{} nodes are not reachable from any root; parent links form a cycle",
            node_count - reached_count
        ));
    }

    Ok(())
}

#[cfg(test)]
impl ShaderForest {
    /// Builds a forest from a parent list, assigning children in index order.
    pub(crate) fn from_parents(parents: &[i64]) -> Self {
        let mut links = parents
            .iter()
            .map(|&parent_index| ShaderLink {
                parent_index,
                child_indices: Vec::new(),
            })
            .collect::<Vec<_>>();
        for (index, &parent) in parents.iter().enumerate() {
            if parent >= 0 {
                links[parent as usize].child_indices.push(index);
            }
        }

        let summaries = (0..parents.len())
            .map(|index| ShaderSummary {
                creator: format!("creator-{}", index % 5),
            })
            .collect();

        Self { summaries, links }
    }
}
