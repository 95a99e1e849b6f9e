//! Nearest-pair correspondence between two vertex groups.
//!
//! Matching picks, for every vertex of the first group, the closest vertex of
//! the second group by full Euclidean distance. The result is one pair per
//! first-group vertex; second-group vertices may be reused. The scan is
//! intentionally O(|A| * |B|): groups come from interactive selections of
//! tens to low hundreds of vertices, and exact first-encountered tie
//! behavior matters more than asymptotics here.

use tracing::info;

use crate::error::{AlignError, Result};
use crate::mesh::{MeshIndex, MeshSnapshot, VertexId};

use super::group::group_by_connectivity;

/// How the two groups for matching are discovered within the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupDiscovery {
    /// Split the selection by edge connectivity; exactly two connected
    /// groups must result.
    #[default]
    Connectivity,

    /// Split the selection list at its midpoint, in vertex index order.
    ///
    /// This reproduces an older selection-order splitting behavior and is
    /// only ever used when explicitly requested; it is not a fallback for
    /// selections where connectivity discovery fails.
    SelectionMidpoint,
}

/// Find the nearest `group_b` vertex for every vertex of `group_a`.
///
/// Distances are full 3D Euclidean. Ties go to the `group_b` vertex
/// encountered first. Returns exactly one `(a, b)` pair per `group_a`
/// vertex; `group_b` vertices may appear in several pairs.
///
/// # Errors
/// [`AlignError::EmptyGroup`] if either group is empty.
pub fn nearest_pairs<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    group_a: &[VertexId<I>],
    group_b: &[VertexId<I>],
) -> Result<Vec<(VertexId<I>, VertexId<I>)>> {
    if group_a.is_empty() || group_b.is_empty() {
        return Err(AlignError::EmptyGroup);
    }

    let mut pairs = Vec::with_capacity(group_a.len());
    for &a in group_a {
        let from = mesh.position(a);

        let mut best = group_b[0];
        let mut best_dist = (mesh.position(best) - from).norm_squared();
        for &b in &group_b[1..] {
            let dist = (mesh.position(b) - from).norm_squared();
            if dist < best_dist {
                best = b;
                best_dist = dist;
            }
        }

        pairs.push((a, best));
    }

    Ok(pairs)
}

/// Discover two groups in the selection and match them nearest-to-nearest.
///
/// With [`GroupDiscovery::Connectivity`] the selection must form exactly two
/// connected groups; any other count is reported via
/// [`AlignError::GroupCount`]. With [`GroupDiscovery::SelectionMidpoint`]
/// the selection list is split at its midpoint instead.
///
/// # Errors
/// [`AlignError::NotEnoughVertices`] for selections smaller than two, and
/// [`AlignError::GroupCount`] as described above.
///
/// # Example
/// ```
/// use trueup::algo::matching::{match_selected, GroupDiscovery};
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use nalgebra::Point3;
///
/// // Two selected segments facing each other
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
/// let pairs = match_selected(&mesh, GroupDiscovery::Connectivity).unwrap();
/// assert_eq!(pairs.len(), 2);
/// ```
pub fn match_selected<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    discovery: GroupDiscovery,
) -> Result<Vec<(VertexId<I>, VertexId<I>)>> {
    let mut selected: Vec<VertexId<I>> = mesh.selected_vertices().collect();
    if selected.len() < 2 {
        return Err(AlignError::NotEnoughVertices {
            required: 2,
            found: selected.len(),
        });
    }

    let (first, second) = match discovery {
        GroupDiscovery::Connectivity => {
            let mut groups = group_by_connectivity(mesh);
            if groups.len() != 2 {
                return Err(AlignError::GroupCount {
                    found: groups.len(),
                });
            }
            let second = groups.remove(1);
            let first = groups.remove(0);
            (first, second)
        }
        GroupDiscovery::SelectionMidpoint => {
            let second = selected.split_off(selected.len() / 2);
            (selected, second)
        }
    };

    let pairs = nearest_pairs(mesh, &first, &second)?;
    info!(
        pairs = pairs.len(),
        from = first.len(),
        to = second.len(),
        "Matched vertex groups"
    );
    Ok(pairs)
}
