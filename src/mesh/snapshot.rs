//! Immutable mesh snapshot data structure.
//!
//! This module provides the vertex/edge view the engine operates on. A
//! snapshot is captured from the host's live mesh once per operation: vertex
//! positions, selection flags, and edge connectivity, all current at call
//! time. Operations never mutate the snapshot; they return
//! [`PositionUpdate`] values for the host to commit back into its own mesh.
//!
//! # Structure
//!
//! - Each **vertex** stores a position and a selection flag
//! - Each **edge** is an unordered pair of vertex indices
//! - Per-vertex adjacency lists are built as edges are added, preserving edge
//!   insertion order (algorithms that look at "the first neighbors" of a
//!   vertex depend on that order being stable)
//!
//! # Lifetime
//!
//! Vertex indices are only meaningful for the snapshot they came from. The
//! host graph may be edited between operations, so indices must never be
//! carried from one snapshot to the next; persisted index lists are
//! re-validated against the current snapshot on every use.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, MeshIndex, VertexId};
use crate::error::{AlignError, Result};

/// A vertex in the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Whether this vertex is part of the host's current selection.
    pub selected: bool,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>, selected: bool) -> Self {
        Self { position, selected }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64, selected: bool) -> Self {
        Self::new(Point3::new(x, y, z), selected)
    }
}

/// An edge in the snapshot: an unordered pair of vertices.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// First endpoint.
    pub v0: VertexId<I>,

    /// Second endpoint.
    pub v1: VertexId<I>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge between two vertices.
    pub fn new(v0: VertexId<I>, v1: VertexId<I>) -> Self {
        Self { v0, v1 }
    }

    /// Get both endpoints.
    #[inline]
    pub fn endpoints(&self) -> (VertexId<I>, VertexId<I>) {
        (self.v0, self.v1)
    }

    /// Check whether the edge touches the given vertex.
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.v0 == v || self.v1 == v
    }

    /// Get the endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    #[inline]
    pub fn other(&self, v: VertexId<I>) -> Option<VertexId<I>> {
        if self.v0 == v {
            Some(self.v1)
        } else if self.v1 == v {
            Some(self.v0)
        } else {
            None
        }
    }
}

/// A proposed new position for one vertex.
///
/// Alignment and equalization operations return a list of these; the host
/// applies them to its live mesh and refreshes. An update for a vertex whose
/// position is already correct is valid and harmless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate<I: MeshIndex = u32> {
    /// The vertex to move.
    pub vertex: VertexId<I>,

    /// The new position for that vertex.
    pub position: Point3<f64>,
}

impl<I: MeshIndex> PositionUpdate<I> {
    /// Create a new position update.
    pub fn new(vertex: VertexId<I>, position: Point3<f64>) -> Self {
        Self { vertex, position }
    }
}

/// An immutable per-call view of the host mesh.
///
/// Holds vertices (position + selection), edges, and adjacency lists built at
/// construction time. See the [module documentation](self) for the lifetime
/// rules.
#[derive(Debug, Clone)]
pub struct MeshSnapshot<I: MeshIndex = u32> {
    /// Vertex storage.
    vertices: Vec<Vertex>,

    /// Edge storage.
    edges: Vec<Edge<I>>,

    /// Per-vertex neighbor lists, in edge insertion order.
    adjacency: Vec<Vec<VertexId<I>>>,
}

impl<I: MeshIndex> Default for MeshSnapshot<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> MeshSnapshot<I> {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    /// Create an empty snapshot with preallocated capacity.
    pub fn with_capacity(num_vertices: usize, num_edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            adjacency: Vec::with_capacity(num_vertices),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Count the selected vertices.
    pub fn num_selected(&self) -> usize {
        self.vertices.iter().filter(|v| v.selected).count()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    /// Set the position of a vertex.
    ///
    /// This is a host-side affordance for assembling or updating a snapshot;
    /// engine operations never call it.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// Check whether a vertex is selected.
    #[inline]
    pub fn is_selected(&self, v: VertexId<I>) -> bool {
        self.vertices[v.index()].selected
    }

    /// Set the selection flag of a vertex.
    #[inline]
    pub fn set_selected(&mut self, v: VertexId<I>, selected: bool) {
        self.vertices[v.index()].selected = selected;
    }

    /// Check whether a vertex index from an external source refers to a
    /// vertex of this snapshot.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId<I>) -> bool {
        v.is_valid() && v.index() < self.vertices.len()
    }

    // ==================== Topology Queries ====================

    /// Get the neighbors of a vertex, in edge insertion order.
    #[inline]
    pub fn neighbors(&self, v: VertexId<I>) -> &[VertexId<I>] {
        &self.adjacency[v.index()]
    }

    /// Get the endpoints of an edge.
    #[inline]
    pub fn edge_endpoints(&self, e: EdgeId<I>) -> (VertexId<I>, VertexId<I>) {
        self.edges[e.index()].endpoints()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over the selected vertices, in index order.
    ///
    /// Index order is the iteration order every grouping operation sees, so
    /// grouping results are deterministic for a fixed snapshot.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.selected)
            .map(|(i, _)| VertexId::new(i))
    }

    // ==================== Geometry ====================

    /// Get the length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        let edge = &self.edges[e.index()];
        (self.position(edge.v1) - self.position(edge.v0)).norm()
    }

    /// Get the vector from one vertex to another.
    pub fn vector_between(&self, from: VertexId<I>, to: VertexId<I>) -> Vector3<f64> {
        self.position(to) - self.position(from)
    }

    // ==================== Construction ====================

    /// Add a vertex, returning its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>, selected: bool) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position, selected));
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an edge between two existing vertices, returning its ID.
    ///
    /// Fails if either endpoint is out of range or the endpoints coincide.
    pub fn add_edge(&mut self, v0: VertexId<I>, v1: VertexId<I>) -> Result<EdgeId<I>> {
        let edge_index = self.edges.len();
        for v in [v0, v1] {
            if !self.contains_vertex(v) {
                return Err(AlignError::InvalidEdge {
                    edge: edge_index,
                    vertex: v.index(),
                });
            }
        }
        if v0 == v1 {
            return Err(AlignError::DegenerateEdge { edge: edge_index });
        }

        let id = EdgeId::new(edge_index);
        self.edges.push(Edge::new(v0, v1));
        self.adjacency[v0.index()].push(v1);
        self.adjacency[v1.index()].push(v0);
        Ok(id)
    }

    /// Apply position updates produced by an alignment or equalization
    /// operation.
    ///
    /// This is the host-side commit step. Updates referring to vertices
    /// outside this snapshot are ignored.
    pub fn apply_updates(&mut self, updates: &[PositionUpdate<I>]) {
        for update in updates {
            if self.contains_vertex(update.vertex) {
                self.set_position(update.vertex, update.position);
            }
        }
    }

    // ==================== Validation ====================

    /// Check structural invariants.
    ///
    /// Verifies that every edge references valid, distinct vertices and that
    /// the adjacency lists agree with the edge list.
    pub fn is_valid(&self) -> bool {
        if self.adjacency.len() != self.vertices.len() {
            return false;
        }

        let mut degree = vec![0usize; self.vertices.len()];
        for edge in &self.edges {
            if !self.contains_vertex(edge.v0) || !self.contains_vertex(edge.v1) {
                return false;
            }
            if edge.v0 == edge.v1 {
                return false;
            }
            degree[edge.v0.index()] += 1;
            degree[edge.v1.index()] += 1;
        }

        for (v, expected) in degree.iter().enumerate() {
            if self.adjacency[v].len() != *expected {
                return false;
            }
        }

        true
    }
}

/// Build a snapshot from parallel position/selection arrays and an edge list.
///
/// # Arguments
/// * `positions` - One entry per vertex
/// * `selected` - One flag per vertex, same length as `positions`
/// * `edges` - Vertex index pairs
///
/// # Returns
/// A snapshot, or an error if the arrays disagree or an edge is invalid.
///
/// # Example
/// ```
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let selected = vec![true, true, false];
/// let edges = vec![[0, 1], [1, 2]];
///
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &edges).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_selected(), 2);
/// ```
pub fn build_snapshot<I: MeshIndex>(
    positions: &[Point3<f64>],
    selected: &[bool],
    edges: &[[usize; 2]],
) -> Result<MeshSnapshot<I>> {
    if positions.len() != selected.len() {
        return Err(AlignError::SelectionMismatch {
            flags: selected.len(),
            vertices: positions.len(),
        });
    }

    let mut mesh = MeshSnapshot::with_capacity(positions.len(), edges.len());
    for (&pos, &sel) in positions.iter().zip(selected) {
        mesh.add_vertex(pos, sel);
    }
    for &[a, b] in edges {
        mesh.add_edge(VertexId::new(a), VertexId::new(b))?;
    }

    Ok(mesh)
}
