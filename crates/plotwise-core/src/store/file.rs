//! JSON file-backed layout store for native hosts.

use super::memory::{self, MemoryLayoutStore};
use super::{LayoutStore, StoreError, StoreResult};
use crate::layout::Layout;
use crate::shapes::{AreaId, Shape};
use std::fs;
use std::path::{Path, PathBuf};

/// Keeps the layout in memory and rewrites the JSON file after every change.
#[derive(Debug)]
pub struct FileLayoutStore {
    path: PathBuf,
    inner: MemoryLayoutStore,
}

impl FileLayoutStore {
    /// Create a store writing to `path`, seeded with `layout`.
    pub fn new(path: impl Into<PathBuf>, layout: Option<Layout>) -> Self {
        let inner = MemoryLayoutStore::new();
        inner.set_layout(layout);
        Self {
            path: path.into(),
            inner,
        }
    }

    /// Open a layout file. A file that cannot be read is an error; one that
    /// does not decode yields a store with no layout and a recorded error.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let json = fs::read_to_string(&path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let store = Self::new(path, None);
        match Layout::from_json(&json) {
            Ok(layout) => store.inner.set_layout(Some(layout)),
            Err(e) => store.inner.record_error(&StoreError::Io(e.to_string())),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `op` and write the result while still holding the store's write
    /// lock, so the file always matches the latest accepted change.
    fn mutate_and_save<F>(&self, op: F)
    where
        F: FnOnce(&mut Layout) -> StoreResult<()>,
    {
        let path = &self.path;
        let _ = self.inner.mutate(|layout| {
            op(layout)?;
            write_layout(path, layout)
        });
    }
}

fn write_layout(path: &Path, layout: &Layout) -> StoreResult<()> {
    let json = layout
        .to_json()
        .map_err(|e| StoreError::Io(format!("Failed to serialize layout: {}", e)))?;
    fs::write(path, json).map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

impl LayoutStore for FileLayoutStore {
    fn add_area(&self, shape: Shape) {
        self.mutate_and_save(|layout| memory::add(layout, shape));
    }

    fn update_area(&self, shape: Shape) {
        self.mutate_and_save(|layout| memory::update(layout, shape));
    }

    fn delete_area(&self, id: AreaId) {
        self.mutate_and_save(|layout| memory::delete(layout, id));
    }

    fn clear_areas(&self) {
        self.mutate_and_save(memory::clear);
    }

    fn layout(&self) -> Option<Layout> {
        self.inner.layout()
    }

    fn last_error(&self) -> Option<String> {
        self.inner.last_error()
    }
}
