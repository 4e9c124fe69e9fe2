use crate::shader_data::ShaderLink;

use super::error::LayoutError;
use super::placement::POSITION_STRIDE;

pub const EDGE_STRIDE: usize = 4;

/// One quad per edge, parents in index order and children in list order, so
/// a given edge always lands in the same slot for the same links.
pub(super) fn derive_edges(positions: &[f32], links: &[ShaderLink]) -> Result<Vec<f32>, LayoutError> {
    let node_count = links.len();
    let expected = node_count * POSITION_STRIDE;
    if positions.len() != expected {
        return Err(LayoutError::PositionBufferMismatch {
            expected,
            actual: positions.len(),
        });
    }

    let edge_count = links.iter().map(|link| link.child_indices.len()).sum::<usize>();
    let mut edges = Vec::with_capacity(edge_count * EDGE_STRIDE);

    for (parent, link) in links.iter().enumerate() {
        let start = parent * POSITION_STRIDE;
        for &child in &link.child_indices {
            if child >= node_count {
                return Err(LayoutError::ChildOutOfRange {
                    parent,
                    child,
                    node_count,
                });
            }
            let end = child * POSITION_STRIDE;
            edges.extend_from_slice(&[
                positions[start],
                positions[start + 1],
                positions[end],
                positions[end + 1],
            ]);
        }
    }

    Ok(edges)
}
