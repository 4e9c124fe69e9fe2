use std::f32::consts::TAU;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shader_data::{ShaderLink, ShaderSummary};

use super::color::creator_color;
use super::error::LayoutError;

pub const POSITION_STRIDE: usize = 2;
pub const COLOR_STRIDE: usize = 3;

const NODE_POOL_RADIUS: f32 = 100.0;
const NODE_CLUSTER_SPREAD: f32 = 0.75;
const START_EDGE_LENGTH: f32 = 0.5935;

const ROOT_SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Roots are scattered uniformly over a disk of this radius.
    pub pool_radius: f32,
    /// Maximum deviation in radians of a child branch from its parent's.
    pub cluster_spread: f32,
    /// Distance between a parent and each of its children, at every depth.
    pub start_edge_length: f32,
    /// `None` draws a fresh seed for every layout.
    pub seed: Option<u64>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            pool_radius: NODE_POOL_RADIUS,
            cluster_spread: NODE_CLUSTER_SPREAD,
            start_edge_length: START_EDGE_LENGTH,
            seed: None,
        }
    }
}

impl LayoutParams {
    /// Rejects values that would put non-finite coordinates in the layout.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let checks = [
            ("pool_radius", self.pool_radius, "finite and > 0", self.pool_radius > 0.0),
            (
                "cluster_spread",
                self.cluster_spread,
                "finite and >= 0",
                self.cluster_spread >= 0.0,
            ),
            (
                "start_edge_length",
                self.start_edge_length,
                "finite and > 0",
                self.start_edge_length > 0.0,
            ),
        ];

        for (name, value, requirement, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(LayoutError::InvalidParams {
                    name,
                    requirement,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct Layout {
    pub(super) positions: Vec<f32>,
    pub(super) colors: Vec<f32>,
    pub(super) seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct DiskSample {
    pub(super) x: f32,
    pub(super) y: f32,
    pub(super) attempts: u32,
}

/// Uniform point in the unit disk by rejection from `[-1, 1)²`.
/// Each draw is accepted with probability π/4.
pub(super) fn sample_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> DiskSample {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let x = rng.random::<f32>() * 2.0 - 1.0;
        let y = rng.random::<f32>() * 2.0 - 1.0;
        if x * x + y * y <= 1.0 {
            return DiskSample { x, y, attempts };
        }
    }
}

/// Every root gets its own stream so trees never depend on each other.
pub(super) fn root_rng(seed: u64, root: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (root as u64).wrapping_add(1).wrapping_mul(ROOT_SEED_STEP))
}

struct PlacementFrame {
    node: usize,
    angle: f32,
    edge_length: f32,
    next_child: usize,
}

/// Places `root` in the pool and its whole subtree around it.
///
/// Children are visited depth-first in list order with an explicit stack,
/// so deep trees cannot overflow the call stack. Returns the number of disk
/// draws used for the root.
pub(super) fn place_tree<R: Rng + ?Sized>(
    positions: &mut [f32],
    links: &[ShaderLink],
    root: usize,
    rng: &mut R,
    params: &LayoutParams,
    visits: &mut usize,
) -> Result<u32, LayoutError> {
    let node_count = links.len();

    let sample = sample_unit_disk(rng);
    positions[root * POSITION_STRIDE] = sample.x * params.pool_radius;
    positions[root * POSITION_STRIDE + 1] = sample.y * params.pool_radius;
    *visits += 1;

    let mut stack = vec![PlacementFrame {
        node: root,
        angle: rng.random::<f32>() * TAU,
        edge_length: params.start_edge_length,
        next_child: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&child) = links[frame.node].child_indices.get(frame.next_child) else {
            stack.pop();
            continue;
        };
        frame.next_child += 1;

        if child >= node_count {
            return Err(LayoutError::ChildOutOfRange {
                parent: frame.node,
                child,
                node_count,
            });
        }

        *visits += 1;
        if *visits > node_count {
            return Err(LayoutError::NotAForest {
                visits: *visits,
                node_count,
            });
        }

        let parent_x = positions[frame.node * POSITION_STRIDE];
        let parent_y = positions[frame.node * POSITION_STRIDE + 1];
        let child_angle =
            frame.angle + (rng.random::<f32>() * 2.0 - 1.0) * params.cluster_spread;
        let edge_length = frame.edge_length;

        positions[child * POSITION_STRIDE] = parent_x + child_angle.cos() * edge_length;
        positions[child * POSITION_STRIDE + 1] = parent_y + child_angle.sin() * edge_length;

        stack.push(PlacementFrame {
            node: child,
            angle: child_angle,
            edge_length,
            next_child: 0,
        });
    }

    Ok(sample.attempts)
}

pub(super) fn build_layout(
    summaries: &[ShaderSummary],
    links: &[ShaderLink],
    params: &LayoutParams,
) -> Result<Layout, LayoutError> {
    params.validate()?;
    if summaries.len() != links.len() {
        return Err(LayoutError::LengthMismatch {
            summaries: summaries.len(),
            links: links.len(),
        });
    }

    let node_count = links.len();
    let seed = params.seed.unwrap_or_else(rand::random);

    let mut positions = vec![0.0; node_count * POSITION_STRIDE];
    let mut visits = 0usize;
    let mut root_count = 0usize;
    let mut disk_draws = 0u64;

    for (root, _) in links.iter().enumerate().filter(|(_, link)| link.is_root()) {
        let mut rng = root_rng(seed, root);
        disk_draws += u64::from(place_tree(
            &mut positions,
            links,
            root,
            &mut rng,
            params,
            &mut visits,
        )?);
        root_count += 1;
    }

    let colors = summaries
        .iter()
        .flat_map(|summary| creator_color(&summary.creator))
        .collect::<Vec<_>>();

    if root_count > 0 {
        debug!(
            "placed {visits}/{node_count} nodes from {root_count} roots (seed {seed}, disk acceptance {:.1}%)",
            root_count as f64 / disk_draws as f64 * 100.0
        );
    }

    Ok(Layout {
        positions,
        colors,
        seed,
    })
}
