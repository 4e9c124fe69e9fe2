//! Initial placement of shader fork trees and the flat buffers handed to the
//! renderer.
//!
//! Buffer strides: positions hold 2 floats per node, colors 3 floats per node,
//! edges 4 floats per edge (`start x, start y, end x, end y`). Edges are
//! ordered by parent index, then by the parent's child list.

mod color;
mod edges;
mod error;
mod placement;
mod session;

pub use edges::EDGE_STRIDE;
pub use placement::{COLOR_STRIDE, LayoutParams, POSITION_STRIDE};
pub use session::{InitialLayout, LayoutSession, UpdatedLayout};
