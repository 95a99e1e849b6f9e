//! Distance equalization against a saved base group.
//!
//! Equalization repositions the moving vertices (the selected vertices
//! outside the base group) relative to their nearest base-group anchors.
//! Each moving vertex is placed along a direction from its anchor at a
//! controlled distance:
//!
//! - **Linear rule** (default): along the raw anchor-to-vertex direction.
//! - **Orthogonal rule**: along the component of that direction
//!   perpendicular to the local tangent of the base group at the anchor,
//!   straightening rungs that meet the base strip at an angle.
//!
//! The placed distance is `target_length * distance_factor`, where the
//! target length is the vertex's current anchor distance or, with length
//! equalization, the mean length of the edges connecting the moving group to
//! the base group. The mean is taken from the snapshot up front, so every
//! moving vertex shares one target regardless of update order.
//!
//! A failed call returns an error and no updates; per-vertex degeneracies
//! (an anchor with no usable tangent, a vertex coincident with its anchor)
//! skip just that vertex and the rest of the group still updates.

use hashbrown::HashSet;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::error::{AlignError, Result};
use crate::frame::{perpendicular_direction, tangent_direction};
use crate::mesh::{MeshIndex, MeshSnapshot, PositionUpdate, VertexId};
use crate::store::GroupStore;

use super::matching::nearest_pairs;

/// Options for equalization.
#[derive(Debug, Clone)]
pub struct EqualizeOptions {
    /// Scale applied to the target distance. 0 collapses each moving vertex
    /// onto its anchor, 1 reproduces the natural (or mean-equalized)
    /// spacing, larger values extrapolate. Range [0, 10].
    pub distance_factor: f64,

    /// Use the mean connecting-edge length as a shared target distance for
    /// the whole moving group.
    pub equalize_lengths: bool,

    /// Reposition along the direction perpendicular to the base group's
    /// local tangent instead of the raw anchor-to-vertex direction.
    pub orthogonal_to_curve: bool,
}

impl Default for EqualizeOptions {
    fn default() -> Self {
        Self {
            distance_factor: 1.0,
            equalize_lengths: false,
            orthogonal_to_curve: false,
        }
    }
}

impl EqualizeOptions {
    /// Set the distance factor, clamped to [0, 10].
    pub fn with_distance_factor(mut self, factor: f64) -> Self {
        self.distance_factor = factor.clamp(0.0, 10.0);
        self
    }

    /// Set whether to equalize lengths across the moving group.
    pub fn with_equalize_lengths(mut self, equalize: bool) -> Self {
        self.equalize_lengths = equalize;
        self
    }

    /// Set whether to reposition orthogonally to the base group's tangent.
    pub fn with_orthogonal_to_curve(mut self, orthogonal: bool) -> Self {
        self.orthogonal_to_curve = orthogonal;
        self
    }
}

/// Equalize the selected vertices against an explicit base group.
///
/// Base indices that do not exist in this snapshot are dropped (the host
/// graph may have changed since the group was saved). The moving set is the
/// selection minus the base group, in index order; each moving vertex is
/// anchored to its nearest base vertex and repositioned per the configured
/// rule.
///
/// # Errors
/// - [`AlignError::NoSelection`] if nothing is selected
/// - [`AlignError::MissingBaseGroup`] if the base group is empty after
///   validation
/// - [`AlignError::NoMovingVertices`] if every selected vertex is in the
///   base group
/// - [`AlignError::NoConnectingEdges`] if length equalization is requested
///   but no edge joins the moving and base sets
///
/// # Example
/// ```
/// use trueup::algo::equalize::{equalize_selected, EqualizeOptions};
/// use trueup::mesh::{build_snapshot, MeshSnapshot, VertexId};
/// use nalgebra::Point3;
///
/// // Base pair at y = 0, moving pair above at uneven heights
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
///     Point3::new(4.0, 4.0, 0.0),
/// ];
/// let selected = vec![false, false, true, true];
/// let edges = vec![[0, 2], [1, 3]];
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
///
/// let base = [VertexId::new(0), VertexId::new(1)];
/// let options = EqualizeOptions::default().with_equalize_lengths(true);
/// let updates = equalize_selected(&mesh, &base, &options).unwrap();
///
/// // Connecting edges measure 2 and 4; both vertices end up at the mean
/// assert!((updates[0].position.y - 3.0).abs() < 1e-12);
/// assert!((updates[1].position.y - 3.0).abs() < 1e-12);
/// ```
pub fn equalize_selected<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    base: &[VertexId<I>],
    options: &EqualizeOptions,
) -> Result<Vec<PositionUpdate<I>>> {
    if mesh.num_selected() == 0 {
        return Err(AlignError::NoSelection);
    }

    // Stale indices from an older snapshot are dropped, not fatal
    let base: Vec<VertexId<I>> = base
        .iter()
        .copied()
        .filter(|&v| mesh.contains_vertex(v))
        .collect();
    if base.is_empty() {
        return Err(AlignError::MissingBaseGroup);
    }

    let base_set: HashSet<VertexId<I>> = base.iter().copied().collect();
    let moving: Vec<VertexId<I>> = mesh
        .selected_vertices()
        .filter(|v| !base_set.contains(v))
        .collect();
    if moving.is_empty() {
        return Err(AlignError::NoMovingVertices);
    }

    let anchors = nearest_pairs(mesh, &moving, &base)?;

    let shared_length = if options.equalize_lengths {
        let moving_set: HashSet<VertexId<I>> = moving.iter().copied().collect();
        Some(mean_connecting_length(mesh, &moving_set, &base_set)?)
    } else {
        None
    };

    let factor = options.distance_factor.clamp(0.0, 10.0);

    let mut updates = Vec::with_capacity(moving.len());
    let mut skipped = 0usize;
    for &(vertex, anchor) in &anchors {
        let anchor_pos = *mesh.position(anchor);
        let offset = mesh.position(vertex) - anchor_pos;

        let direction = if options.orthogonal_to_curve {
            orthogonal_direction(mesh, anchor, &base_set, &offset)
        } else {
            offset.try_normalize(f64::EPSILON)
        };

        match direction {
            Some(direction) => {
                let target_length = shared_length.unwrap_or_else(|| offset.norm());
                updates.push(PositionUpdate::new(
                    vertex,
                    anchor_pos + direction * (target_length * factor),
                ));
            }
            None => skipped += 1,
        }
    }

    info!(
        moved = updates.len(),
        skipped,
        base = base.len(),
        "Equalized vertex spacing"
    );
    Ok(updates)
}

/// Equalize the selected vertices against a base group read from the store.
///
/// Looks up `name` in the external store; an absent entry is
/// [`AlignError::MissingBaseGroup`]. Otherwise behaves exactly like
/// [`equalize_selected`].
pub fn equalize_against_saved<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    store: &dyn GroupStore,
    name: &str,
    options: &EqualizeOptions,
) -> Result<Vec<PositionUpdate<I>>> {
    let indices = match store.named_indices(name) {
        Some(indices) => indices,
        None => {
            debug!(name, "No saved group under this name");
            return Err(AlignError::MissingBaseGroup);
        }
    };
    debug!(name, count = indices.len(), "Loaded base group");

    let stale = indices
        .iter()
        .filter(|&&i| i >= mesh.num_vertices())
        .count();
    if stale > 0 {
        debug!(name, stale, "Dropping stale base group indices");
    }

    let base: Vec<VertexId<I>> = indices
        .iter()
        .filter(|&&i| i < mesh.num_vertices())
        .map(|&i| VertexId::new(i))
        .collect();
    equalize_selected(mesh, &base, options)
}

/// Mean length of the edges joining the moving set to the base set.
fn mean_connecting_length<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    moving: &HashSet<VertexId<I>>,
    base: &HashSet<VertexId<I>>,
) -> Result<f64> {
    let mut total = 0.0;
    let mut count = 0usize;
    for (id, edge) in mesh.edges() {
        let (a, b) = edge.endpoints();
        let connects = (moving.contains(&a) && base.contains(&b))
            || (moving.contains(&b) && base.contains(&a));
        if connects {
            total += mesh.edge_length(id);
            count += 1;
        }
    }

    if count == 0 {
        return Err(AlignError::NoConnectingEdges);
    }
    Ok(total / count as f64)
}

/// Direction perpendicular to the base group's tangent at `anchor`, in the
/// plane containing `offset`.
///
/// The tangent comes from the anchor's neighbors that belong to the base
/// group, in adjacency order. `None` means the anchor has no qualifying
/// neighbor or the frame degenerates; the caller skips that vertex.
fn orthogonal_direction<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    anchor: VertexId<I>,
    base: &HashSet<VertexId<I>>,
    offset: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    let neighbor_positions: Vec<Point3<f64>> = mesh
        .neighbors(anchor)
        .iter()
        .copied()
        .filter(|n| base.contains(n))
        .map(|n| *mesh.position(n))
        .collect();

    let tangent = tangent_direction(mesh.position(anchor), &neighbor_positions)?;
    perpendicular_direction(offset, &tangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_snapshot;
    use crate::store::{save_selection_as, MemoryStore};
    use approx::assert_relative_eq;

    fn ids(indices: &[usize]) -> Vec<VertexId> {
        indices.iter().map(|&i| VertexId::new(i)).collect()
    }

    /// Base strip 0-1-2 along X (unselected), moving vertices 3..6 above it
    /// (selected), one rung edge each.
    fn rails() -> MeshSnapshot {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 3.0, 0.0),
        ];
        let selected = vec![false, false, false, true, true, true];
        let edges = vec![[0, 1], [1, 2], [0, 3], [1, 4], [2, 5]];
        build_snapshot(&positions, &selected, &edges).unwrap()
    }

    #[test]
    fn test_factor_zero_collapses_onto_anchors() {
        let mesh = rails();
        let options = EqualizeOptions::default().with_distance_factor(0.0);
        let updates = equalize_selected(&mesh, &ids(&[0, 1, 2]), &options).unwrap();

        assert_eq!(updates.len(), 3);
        for (update, anchor) in updates.iter().zip([0usize, 1, 2]) {
            let anchor_pos = mesh.position(VertexId::new(anchor));
            assert_relative_eq!(
                (update.position - anchor_pos).norm(),
                0.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_factor_one_keeps_natural_distance() {
        let mesh = rails();
        let updates =
            equalize_selected(&mesh, &ids(&[0, 1, 2]), &EqualizeOptions::default()).unwrap();

        for update in &updates {
            let original = mesh.position(update.vertex);
            assert_relative_eq!(
                (update.position - original).norm(),
                0.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_factor_scales_distance() {
        let mesh = rails();
        let options = EqualizeOptions::default().with_distance_factor(2.0);
        let updates = equalize_selected(&mesh, &ids(&[0, 1, 2]), &options).unwrap();

        // Vertex 4 sits 2.0 above its anchor 1; factor 2 doubles that
        let update = updates.iter().find(|u| u.vertex == VertexId::new(4)).unwrap();
        assert_relative_eq!(update.position.y, 4.0, epsilon = 1e-12);
        assert_relative_eq!(update.position.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equalize_lengths_shares_the_mean() {
        // Connecting edges measure 1, 2, and 3; the mean is 2
        let mesh = rails();
        let options = EqualizeOptions::default().with_equalize_lengths(true);
        let updates = equalize_selected(&mesh, &ids(&[0, 1, 2]), &options).unwrap();

        for update in &updates {
            let anchor_x = mesh.position(update.vertex).x;
            assert_relative_eq!(update.position.y, 2.0, epsilon = 1e-12);
            assert_relative_eq!(update.position.x, anchor_x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_equalize_lengths_two_vertex_scenario() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
        ];
        let selected = vec![false, false, true, true];
        let edges = vec![[0, 2], [1, 3]];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();

        let options = EqualizeOptions::default().with_equalize_lengths(true);
        let updates = equalize_selected(&mesh, &ids(&[0, 1]), &options).unwrap();

        // Raw anchor distances 2.0 and 4.0 both become the mean 3.0
        for update in &updates {
            assert_relative_eq!(update.position.y, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_no_connecting_edges() {
        // Base and moving vertices share no edge
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 2.0, 0.0)];
        let selected = vec![false, true];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();

        let options = EqualizeOptions::default().with_equalize_lengths(true);
        let result = equalize_selected(&mesh, &ids(&[0]), &options);
        assert!(matches!(result, Err(AlignError::NoConnectingEdges)));
    }

    #[test]
    fn test_orthogonal_rule_straightens_rungs() {
        // Moving vertex 3 leans in X relative to its anchor on the base
        // strip; the orthogonal rule removes the tangent (X) component
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.5, 2.0, 0.0),
        ];
        let selected = vec![false, false, false, true];
        let edges = vec![[0, 1], [1, 2], [1, 3]];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();

        let options = EqualizeOptions::default().with_orthogonal_to_curve(true);
        let updates = equalize_selected(&mesh, &ids(&[0, 1, 2]), &options).unwrap();

        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        let expected_len = (Point3::new(1.5, 2.0, 0.0) - Point3::new(1.0, 0.0, 0.0)).norm();
        assert_relative_eq!(update.position.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(update.position.y, expected_len, epsilon = 1e-12);
        assert_relative_eq!(update.position.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orthogonal_rule_skips_isolated_anchor() {
        // Anchor 0 has no neighbor inside the base group, so vertex 1 is
        // left alone; vertex 3 still updates against the connected pair
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(11.0, 0.0, 0.0),
            Point3::new(10.5, 1.5, 0.0),
        ];
        let selected = vec![false, true, false, false, true];
        let edges = vec![[2, 3], [2, 4]];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();

        let options = EqualizeOptions::default().with_orthogonal_to_curve(true);
        let updates = equalize_selected(&mesh, &ids(&[0, 2, 3]), &options).unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].vertex, VertexId::new(4));
    }

    #[test]
    fn test_vertex_on_anchor_is_skipped() {
        // Vertex 1 coincides with its anchor: no direction exists
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        let selected = vec![false, true];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();

        let updates =
            equalize_selected(&mesh, &ids(&[0]), &EqualizeOptions::default()).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_stale_base_indices_are_dropped() {
        let mesh = rails();
        // Index 99 no longer exists; the rest of the base still anchors
        let base = ids(&[0, 99, 1, 2]);
        let updates =
            equalize_selected(&mesh, &base, &EqualizeOptions::default()).unwrap();
        assert_eq!(updates.len(), 3);
    }

    #[test]
    fn test_missing_base_group() {
        let mesh = rails();
        let result = equalize_selected(&mesh, &[], &EqualizeOptions::default());
        assert!(matches!(result, Err(AlignError::MissingBaseGroup)));

        // All indices stale
        let result = equalize_selected(&mesh, &ids(&[50, 51]), &EqualizeOptions::default());
        assert!(matches!(result, Err(AlignError::MissingBaseGroup)));
    }

    #[test]
    fn test_no_moving_vertices() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let selected = vec![true, true];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();

        let result = equalize_selected(&mesh, &ids(&[0, 1]), &EqualizeOptions::default());
        assert!(matches!(result, Err(AlignError::NoMovingVertices)));
    }

    #[test]
    fn test_no_selection() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0)];
        let mesh: MeshSnapshot = build_snapshot(&positions, &[false], &[]).unwrap();

        let result = equalize_selected(&mesh, &ids(&[0]), &EqualizeOptions::default());
        assert!(matches!(result, Err(AlignError::NoSelection)));
    }

    #[test]
    fn test_base_vertices_are_never_moved() {
        // Base vertices are part of the selection here; they anchor but do
        // not move
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(1.0, 2.5, 0.0),
        ];
        let selected = vec![true, true, true, true];
        let edges = vec![[0, 1], [0, 2], [1, 3]];
        let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();

        let updates =
            equalize_selected(&mesh, &ids(&[0, 1]), &EqualizeOptions::default()).unwrap();
        let moved: Vec<usize> = updates.iter().map(|u| u.vertex.index()).collect();
        assert_eq!(moved, vec![2, 3]);
    }

    #[test]
    fn test_equalize_against_saved_roundtrip() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        // First pass: only the base pair is selected, and gets saved
        let selected = vec![true, true, false];
        let mut mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[[0, 1]]).unwrap();

        let mut store = MemoryStore::new();
        save_selection_as(&mesh, &mut store, "base_group").unwrap();

        // Second pass: the moving vertex is selected instead
        mesh.set_selected(VertexId::new(0), false);
        mesh.set_selected(VertexId::new(1), false);
        mesh.set_selected(VertexId::new(2), true);

        let options = EqualizeOptions::default().with_distance_factor(0.5);
        let updates = equalize_against_saved(&mesh, &store, "base_group", &options).unwrap();

        assert_eq!(updates.len(), 1);
        assert_relative_eq!(updates[0].position.y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_equalize_against_missing_name() {
        let mesh = rails();
        let store = MemoryStore::new();
        let result =
            equalize_against_saved(&mesh, &store, "nope", &EqualizeOptions::default());
        assert!(matches!(result, Err(AlignError::MissingBaseGroup)));
    }

    #[test]
    fn test_options_clamp_distance_factor() {
        let options = EqualizeOptions::default().with_distance_factor(25.0);
        assert_eq!(options.distance_factor, 10.0);

        let options = EqualizeOptions::default().with_distance_factor(-1.0);
        assert_eq!(options.distance_factor, 0.0);
    }

    #[test]
    fn test_out_of_range_factor_clamped_at_call() {
        let mesh = rails();
        // Bypass the builder clamp by setting the field directly.
        let options = EqualizeOptions {
            distance_factor: 50.0,
            ..EqualizeOptions::default()
        };
        let updates = equalize_selected(&mesh, &ids(&[0, 1, 2]), &options).unwrap();

        // Vertex 4 sits 2.0 above its anchor; the factor acts as 10, not 50.
        let update = updates
            .iter()
            .find(|u| u.vertex == VertexId::new(4))
            .unwrap();
        assert_relative_eq!(update.position.y, 20.0, epsilon = 1e-12);
    }
}
