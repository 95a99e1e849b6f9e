//! Core snapshot data structures.
//!
//! This module provides the immutable vertex/edge snapshot and related types
//! the engine's operations consume and produce.
//!
//! # Overview
//!
//! The primary type is [`MeshSnapshot`], a per-call view of the host mesh:
//! vertex positions, selection flags, and edge connectivity. Adjacency lists
//! are built at construction, so neighbor queries are O(1) lookups during an
//! operation.
//!
//! # Index Types
//!
//! Snapshot elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`]
//! trait), allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Snapshots are typically captured from host arrays:
//!
//! ```
//! use trueup::mesh::{build_snapshot, MeshSnapshot};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let selected = vec![true, true, true];
//! let edges = vec![[0, 1], [1, 2]];
//!
//! let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
//! ```

mod index;
mod snapshot;

pub use index::{EdgeId, MeshIndex, VertexId};
pub use snapshot::{build_snapshot, Edge, MeshSnapshot, PositionUpdate, Vertex};
