//! Grouping, matching, and repositioning algorithms.
//!
//! This module contains the engine's operations:
//!
//! - **Grouping**: proximity clustering and connectivity components over the
//!   selected vertex set
//! - **Alignment**: flattening each group onto its average position, one axis
//!   excluded
//! - **Matching**: nearest-pair correspondence between two groups
//! - **Equalization**: repositioning a moving group relative to a saved base
//!   group, along raw or tangent-perpendicular directions
//!
//! Every operation reads a [`MeshSnapshot`](crate::mesh::MeshSnapshot) and
//! returns either groups of vertex IDs or a list of
//! [`PositionUpdate`](crate::mesh::PositionUpdate)s. Nothing is mutated in
//! place; an operation that fails returns no updates at all.

pub mod align;
pub mod equalize;
pub mod group;
pub mod matching;

pub use align::{align_selected, flatten_group, AlignOptions};
pub use equalize::{equalize_against_saved, equalize_selected, EqualizeOptions};
pub use group::{group_by_connectivity, group_by_proximity};
pub use matching::{match_selected, nearest_pairs, GroupDiscovery};
