use std::sync::Arc;

use crate::shader_data::ShaderForest;

use super::edges::derive_edges;
use super::error::LayoutError;
use super::placement::{LayoutParams, build_layout};

/// Buffers produced when a tree-set is first laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialLayout {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub edges: Vec<f32>,
    pub seed: u64,
}

/// Buffers produced by a refinement request.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatedLayout {
    pub positions: Vec<f32>,
    pub edges: Vec<f32>,
}

/// Layout state for one loaded forest, owned by the layout worker from the
/// initialize request until it is replaced or the worker stops.
pub struct LayoutSession {
    forest: Arc<ShaderForest>,
    params: LayoutParams,
}

impl LayoutSession {
    pub fn new(forest: Arc<ShaderForest>, params: LayoutParams) -> Self {
        Self { forest, params }
    }

    pub fn node_count(&self) -> usize {
        self.forest.node_count()
    }

    pub fn initialize(&self) -> Result<InitialLayout, LayoutError> {
        let layout = build_layout(&self.forest.summaries, &self.forest.links, &self.params)?;
        let edges = derive_edges(&layout.positions, &self.forest.links)?;

        Ok(InitialLayout {
            positions: layout.positions,
            colors: layout.colors,
            edges,
            seed: layout.seed,
        })
    }

    /// Refines `positions` and re-derives the edges from the result.
    ///
    /// No refinement pass exists yet, so positions come back untouched.
    pub fn optimize(&self, positions: Vec<f32>) -> Result<UpdatedLayout, LayoutError> {
        let edges = derive_edges(&positions, &self.forest.links)?;
        Ok(UpdatedLayout { positions, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{COLOR_STRIDE, EDGE_STRIDE, POSITION_STRIDE};

    fn session(parents: &[i64], seed: u64) -> LayoutSession {
        LayoutSession::new(
            Arc::new(ShaderForest::from_parents(parents)),
            LayoutParams {
                seed: Some(seed),
                ..LayoutParams::default()
            },
        )
    }

    #[test]
    fn initialize_returns_consistent_buffers() {
        let session = session(&[-1, 0, 0, 2, -1, 4], 12);
        let layout = session.initialize().unwrap();

        assert_eq!(layout.positions.len(), 6 * POSITION_STRIDE);
        assert_eq!(layout.colors.len(), 6 * COLOR_STRIDE);
        assert_eq!(layout.edges.len(), 4 * EDGE_STRIDE);
        assert_eq!(layout.seed, 12);
        assert_eq!(
            layout.edges,
            derive_edges(&layout.positions, &session.forest.links).unwrap()
        );
    }

    #[test]
    fn single_leaf_and_empty_forests() {
        let layout = session(&[-1], 1).initialize().unwrap();
        assert_eq!(
            (layout.positions.len(), layout.colors.len(), layout.edges.len()),
            (2, 3, 0)
        );

        let layout = session(&[], 1).initialize().unwrap();
        assert!(layout.positions.is_empty());
        assert!(layout.colors.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn optimize_keeps_positions_and_rederives_edges() {
        let session = session(&[-1, 0, 1, 1], 3);
        let initial = session.initialize().unwrap();

        let updated = session.optimize(initial.positions.clone()).unwrap();
        assert_eq!(updated.positions, initial.positions);
        assert_eq!(updated.edges, initial.edges);
    }

    #[test]
    fn optimize_uses_the_positions_it_is_given() {
        let session = session(&[-1, 0], 3);
        let updated = session.optimize(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(updated.edges, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn optimize_rejects_foreign_buffers() {
        let session = session(&[-1, 0], 3);
        let error = session.optimize(vec![0.0; 6]).unwrap_err();
        assert_eq!(
            error,
            LayoutError::PositionBufferMismatch {
                expected: 4,
                actual: 6
            }
        );
    }
}
