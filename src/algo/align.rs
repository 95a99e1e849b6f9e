//! Flatten-to-average alignment of proximity groups.
//!
//! The align operation clusters the selected vertices with
//! [`group_by_proximity`](crate::algo::group::group_by_proximity), then moves
//! every member of each group onto the group's average position on the two
//! non-excluded axes. The excluded-axis coordinate of each vertex is never
//! touched, so a vertical strip of vertices collapses to a straight line
//! instead of a single point.

use tracing::info;

use crate::error::{AlignError, Result};
use crate::frame::{centroid, Axis};
use crate::mesh::{MeshIndex, MeshSnapshot, PositionUpdate, VertexId};

use super::group::group_by_proximity;

/// Options for flatten alignment.
#[derive(Debug, Clone)]
pub struct AlignOptions {
    /// Axis excluded from both the grouping metric and the flattening.
    pub excluded_axis: Axis,

    /// Maximum planar distance for two vertices to share a group.
    pub merge_distance: f64,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            excluded_axis: Axis::X,
            merge_distance: 0.1,
        }
    }
}

impl AlignOptions {
    /// Set the excluded axis.
    pub fn with_excluded_axis(mut self, axis: Axis) -> Self {
        self.excluded_axis = axis;
        self
    }

    /// Set the merge distance. Negative values are clamped to 0.
    pub fn with_merge_distance(mut self, distance: f64) -> Self {
        self.merge_distance = distance.max(0.0);
        self
    }
}

/// Compute flattening updates for one group.
///
/// The group's arithmetic mean position is computed first; every member then
/// gets an update that takes the mean's coordinates on the two constrained
/// axes and keeps its own excluded-axis coordinate. An empty group yields no
/// updates.
///
/// Flattening is idempotent: applying the updates and flattening the same
/// group again reproduces the same positions, because the second mean equals
/// the first flattened value on the constrained axes.
pub fn flatten_group<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    group: &[VertexId<I>],
    excluded_axis: Axis,
) -> Vec<PositionUpdate<I>> {
    let mean = match centroid(group.iter().map(|&v| *mesh.position(v))) {
        Some(mean) => mean,
        None => return Vec::new(),
    };

    group
        .iter()
        .map(|&v| PositionUpdate::new(v, excluded_axis.flatten(mesh.position(v), &mean)))
        .collect()
}

/// Group the selection by proximity and flatten every group onto its average.
///
/// # Arguments
/// * `mesh` - The snapshot to align
/// * `options` - Excluded axis and merge distance
///
/// # Returns
/// One position update per selected vertex, or [`AlignError::NoSelection`]
/// if nothing is selected.
///
/// # Example
/// ```
/// use trueup::algo::align::{align_selected, AlignOptions};
/// use trueup::frame::Axis;
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use nalgebra::Point3;
///
/// let positions = vec![Point3::new(0.2, 0.0, 0.0), Point3::new(-0.2, 0.0, 2.0)];
/// let selected = vec![true, true];
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();
///
/// let options = AlignOptions::default().with_excluded_axis(Axis::Z).with_merge_distance(0.5);
/// let updates = align_selected(&mesh, &options).unwrap();
///
/// // Both vertices move onto the shared XY average; Z stays put
/// assert_eq!(updates.len(), 2);
/// assert!((updates[0].position.x - 0.0).abs() < 1e-12);
/// assert!((updates[0].position.z - 0.0).abs() < 1e-12);
/// assert!((updates[1].position.z - 2.0).abs() < 1e-12);
/// ```
pub fn align_selected<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    options: &AlignOptions,
) -> Result<Vec<PositionUpdate<I>>> {
    if mesh.num_selected() == 0 {
        return Err(AlignError::NoSelection);
    }

    let groups = group_by_proximity(mesh, options.excluded_axis, options.merge_distance);

    let mut updates = Vec::with_capacity(mesh.num_selected());
    for group in &groups {
        updates.extend(flatten_group(mesh, group, options.excluded_axis));
    }

    info!(
        groups = groups.len(),
        moved = updates.len(),
        "Aligned selection"
    );
    Ok(updates)
}
