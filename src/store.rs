//! External storage for persisted vertex groups.
//!
//! A base group outlives any single snapshot: the user saves a reference
//! selection once, then runs equalization against it repeatedly while
//! editing. That persistence belongs to the host (typically as metadata on
//! the edited object), so the engine only sees it through the [`GroupStore`]
//! key/value interface. Saved indices are re-validated against the current
//! snapshot every time they are read back.
//!
//! [`MemoryStore`] is a plain in-memory implementation for hosts without
//! their own metadata mechanism, and for tests.

use hashbrown::HashMap;
use tracing::info;

use crate::error::{AlignError, Result};
use crate::mesh::{MeshIndex, MeshSnapshot};

/// Host-owned persistence for named vertex index lists.
pub trait GroupStore {
    /// Read the ordered vertex indices saved under `name`, if any.
    fn named_indices(&self, name: &str) -> Option<Vec<usize>>;

    /// Save (or overwrite) the ordered vertex indices under `name`.
    fn set_named_indices(&mut self, name: &str, indices: &[usize]);
}

/// An in-memory [`GroupStore`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    groups: HashMap<String, Vec<usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether the store has no saved groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupStore for MemoryStore {
    fn named_indices(&self, name: &str) -> Option<Vec<usize>> {
        self.groups.get(name).cloned()
    }

    fn set_named_indices(&mut self, name: &str, indices: &[usize]) {
        self.groups.insert(name.to_owned(), indices.to_vec());
    }
}

/// Save the current selection as a named group.
///
/// Writes the selected vertex indices, in index order, under `name`;
/// an existing group with that name is overwritten. Returns the number of
/// indices saved.
///
/// # Errors
/// [`AlignError::NoSelection`] if nothing is selected.
///
/// # Example
/// ```
/// use trueup::mesh::{build_snapshot, MeshSnapshot};
/// use trueup::store::{save_selection_as, GroupStore, MemoryStore};
/// use nalgebra::Point3;
///
/// let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
/// let selected = vec![true, false];
/// let mesh: MeshSnapshot = build_snapshot(&positions, &selected, &[]).unwrap();
///
/// let mut store = MemoryStore::new();
/// let saved = save_selection_as(&mesh, &mut store, "base_group").unwrap();
/// assert_eq!(saved, 1);
/// assert_eq!(store.named_indices("base_group"), Some(vec![0]));
/// ```
pub fn save_selection_as<I: MeshIndex>(
    mesh: &MeshSnapshot<I>,
    store: &mut dyn GroupStore,
    name: &str,
) -> Result<usize> {
    let indices: Vec<usize> = mesh.selected_vertices().map(|v| v.index()).collect();
    if indices.is_empty() {
        return Err(AlignError::NoSelection);
    }

    store.set_named_indices(name, &indices);
    info!(name, count = indices.len(), "Saved selection as group");
    Ok(indices.len())
}
