#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout parameter {name} must be {requirement}, got {value}")]
    InvalidParams {
        name: &'static str,
        requirement: &'static str,
        value: f32,
    },

    #[error("{summaries} shader summaries but {links} link entries")]
    LengthMismatch { summaries: usize, links: usize },

    #[error("node {parent} lists child {child}, but only {node_count} nodes exist")]
    ChildOutOfRange {
        parent: usize,
        child: usize,
        node_count: usize,
    },

    #[error("placement visited {visits} nodes in a graph of {node_count}; links are not a forest")]
    NotAForest { visits: usize, node_count: usize },

    #[error("position buffer holds {actual} floats, expected {expected}")]
    PositionBufferMismatch { expected: usize, actual: usize },
}
