//! # Trueup
//!
//! A vertex grouping, matching, and alignment engine for interactive mesh
//! editing.
//!
//! Trueup implements the geometry behind "line these vertices up" and "even
//! out this spacing" editing actions: it partitions a selection into groups
//! and computes replacement positions from group-relative rules, with a
//! nearest-pair matcher for bridging two selected groups. The host editor
//! owns the live mesh; trueup works on an immutable per-call snapshot and
//! hands back explicit position updates for the host to commit.
//!
//! ## Features
//!
//! - **Snapshot data model**: positions, selection flags, and edges with
//!   type-safe generic indices; no live references into the host mesh
//! - **Grouping**: greedy axis-excluded proximity clustering and
//!   connectivity components restricted to the selection
//! - **Matching**: nearest-pair correspondence between two groups
//! - **Repositioning**: flatten-to-average alignment and anchor-relative
//!   equalization with linear or tangent-orthogonal directions
//! - **Persisted groups**: a key/value store interface for base groups that
//!   outlive any single snapshot
//!
//! ## Quick Start
//!
//! ```
//! use trueup::prelude::*;
//! use trueup::algo::align::{align_selected, AlignOptions};
//! use nalgebra::Point3;
//!
//! // Capture a snapshot of the host mesh: positions, selection, edges
//! let positions = vec![
//!     Point3::new(0.1, 0.0, 0.0),
//!     Point3::new(-0.1, 0.0, 1.0),
//!     Point3::new(0.0, 0.1, 2.0),
//! ];
//! let selected = vec![true, true, true];
//! let edges = vec![[0, 1], [1, 2]];
//! let mut mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
//!
//! // Straighten the strip: average X and Y per group, keep each Z
//! let options = AlignOptions::default()
//!     .with_excluded_axis(Axis::Z)
//!     .with_merge_distance(0.5);
//! let updates = align_selected(&mesh, &options).unwrap();
//!
//! // The host commits the updates back into its live mesh
//! mesh.apply_updates(&updates);
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Matching Two Groups
//!
//! ```
//! use trueup::prelude::*;
//! use trueup::algo::matching::{match_selected, GroupDiscovery};
//! use nalgebra::Point3;
//!
//! // Two selected segments facing each other
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//!     Point3::new(1.0, 2.0, 0.0),
//! ];
//! let selected = vec![true, true, true, true];
//! let edges = vec![[0, 1], [2, 3]];
//! let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
//!
//! let pairs = match_selected(&mesh, GroupDiscovery::Connectivity).unwrap();
//! assert_eq!(pairs.len(), 2);
//! // The host can now connect each (a, b) pair however it likes
//! ```
//!
//! ## Equalizing Against a Saved Group
//!
//! ```
//! use trueup::prelude::*;
//! use trueup::algo::equalize::{equalize_against_saved, EqualizeOptions};
//! use trueup::store::{save_selection_as, MemoryStore};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//!     Point3::new(1.0, 3.0, 0.0),
//! ];
//! let selected = vec![true, true, false, false];
//! let edges = vec![[0, 1], [0, 2], [1, 3]];
//! let mut mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
//!
//! // Save the current selection as the reference group
//! let mut store = MemoryStore::new();
//! save_selection_as(&mesh, &mut store, "base_group").unwrap();
//!
//! // Later: select the other rail and even out its spacing
//! mesh.set_selected(VertexId::new(0), false);
//! mesh.set_selected(VertexId::new(1), false);
//! mesh.set_selected(VertexId::new(2), true);
//! mesh.set_selected(VertexId::new(3), true);
//!
//! let options = EqualizeOptions::default().with_equalize_lengths(true);
//! let updates = equalize_against_saved(&mesh, &store, "base_group", &options).unwrap();
//!
//! // Rung lengths 2.0 and 3.0 both become the mean 2.5
//! assert!((updates[0].position.y - 2.5).abs() < 1e-12);
//! assert!((updates[1].position.y - 2.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod store;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use trueup::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AlignError, Result};
    pub use crate::frame::Axis;
    pub use crate::mesh::{
        build_snapshot, Edge, EdgeId, MeshIndex, MeshSnapshot, PositionUpdate, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
