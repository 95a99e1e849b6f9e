//! Vertex grouping over the selected set.
//!
//! Two partitioning strategies:
//!
//! - [`group_by_proximity`]: greedy spatial clustering with one axis excluded
//!   from the distance metric
//! - [`group_by_connectivity`]: connected components of the edge graph
//!   restricted to the selected vertices
//!
//! Both walk the selection in vertex index order and return groups whose
//! contents are in discovery order, so results are deterministic for a fixed
//! snapshot.
//!
//! # Greedy proximity clustering
//!
//! Proximity grouping is intentionally greedy rather than a transitive
//! closure: each vertex joins the first existing group containing any member
//! within the merge distance. A chain of nearby vertices can therefore pull
//! far-apart vertices into one group, and which group wins depends on input
//! order. This matches the interactive behavior the operation was built
//! around and must not be "corrected" to a true closure.

use crate::frame::Axis;
use crate::mesh::{MeshIndex, MeshSnapshot, VertexId};

/// Partition the selected vertices into spatial groups.
///
/// Iterates the selection in index order. Each vertex joins the first group
/// containing any member whose squared distance over the two non-excluded
/// axes is within `merge_distance` squared; if no group qualifies it starts a
/// new singleton group. Negative `merge_distance` values are treated as 0.
///
/// Returns groups that cover the selection exactly once; an empty selection
/// yields an empty list.
///
/// # Arguments
/// * `mesh` - The snapshot to read positions and selection from
/// * `excluded_axis` - Axis left out of the distance metric
/// * `merge_distance` - Maximum planar distance for joining a group
///
/// # Example
/// ```
/// use trueup::algo::group::group_by_proximity;
/// use trueup::frame::Axis;
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use nalgebra::Point3;
///
/// // Two vertices stacked along Z project to the same XY point
/// let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 2.0)];
/// let selected = vec![true, true];
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();
///
/// let groups = group_by_proximity(&mesh, Axis::Z, 0.1);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].len(), 2);
/// ```
pub fn group_by_proximity<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    excluded_axis: Axis,
    merge_distance: f64,
) -> Vec<Vec<VertexId<I>>> {
    let threshold = merge_distance.max(0.0).powi(2);
    let mut groups: Vec<Vec<VertexId<I>>> = Vec::new();

    for vertex in mesh.selected_vertices() {
        let position = mesh.position(vertex);

        let mut found = None;
        'scan: for (index, group) in groups.iter().enumerate() {
            for &member in group {
                let dist = excluded_axis.planar_distance_squared(position, mesh.position(member));
                if dist <= threshold {
                    found = Some(index);
                    break 'scan;
                }
            }
        }

        match found {
            Some(index) => groups[index].push(vertex),
            None => groups.push(vec![vertex]),
        }
    }

    groups
}

/// Partition the selected vertices into connected components.
///
/// Runs an iterative depth-first traversal over the subgraph induced by the
/// selection: edges to unselected vertices are never followed, so two
/// selected regions joined only through unselected vertices stay separate
/// groups. Seeds are taken in selection index order.
///
/// Returns groups that partition the selection exactly; an empty selection
/// yields an empty list.
///
/// # Example
/// ```
/// use trueup::algo::group::group_by_connectivity;
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use nalgebra::Point3;
///
/// // Two separate selected segments: 0-1 and 2-3
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
///     Point3::new(1.0, 2.0, 0.0),
/// ];
/// let selected = vec![true, true, true, true];
/// let edges = vec![[0, 1], [2, 3]];
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
///
/// let groups = group_by_connectivity(&mesh);
/// assert_eq!(groups.len(), 2);
/// ```
pub fn group_by_connectivity<I: MeshIndex>(mesh: &MeshSnapshot<I>) -> Vec<Vec<VertexId<I>>> {
    let mut groups = Vec::new();
    let mut visited = vec![false; mesh.num_vertices()];

    for seed in mesh.selected_vertices() {
        if visited[seed.index()] {
            continue;
        }

        let mut group = Vec::new();
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            group.push(current);
            for &neighbor in mesh.neighbors(current) {
                if mesh.is_selected(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        groups.push(group);
    }

    groups
}
