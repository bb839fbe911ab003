//! Layout store abstraction.
//!
//! The editing surface never waits on the store: mutations are
//! fire-and-forget and the store reports back only through the reactive
//! [`LayoutStore::layout`] read and [`LayoutStore::last_error`].

mod file;
mod memory;

pub use file::FileLayoutStore;
pub use memory::MemoryLayoutStore;

use crate::layout::Layout;
use crate::shapes::{AreaId, Shape};
use std::sync::Arc;
use thiserror::Error;

/// Store errors. Recorded by the store and logged, never returned to the editor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Area not found: {0}")]
    NotFound(AreaId),
    #[error("No layout loaded")]
    NoLayout,
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing store for a layout's areas.
pub trait LayoutStore: Send + Sync {
    /// Append a new area. Stores assign the id when the shape carries a nil one.
    fn add_area(&self, shape: Shape);

    /// Replace the area with the same id.
    fn update_area(&self, shape: Shape);

    fn delete_area(&self, id: AreaId);

    fn clear_areas(&self);

    /// Current layout, if one is loaded.
    fn layout(&self) -> Option<Layout>;

    /// Most recent failure, if any.
    fn last_error(&self) -> Option<String>;
}

impl<S: LayoutStore + ?Sized> LayoutStore for Box<S> {
    fn add_area(&self, shape: Shape) {
        (**self).add_area(shape)
    }

    fn update_area(&self, shape: Shape) {
        (**self).update_area(shape)
    }

    fn delete_area(&self, id: AreaId) {
        (**self).delete_area(id)
    }

    fn clear_areas(&self) {
        (**self).clear_areas()
    }

    fn layout(&self) -> Option<Layout> {
        (**self).layout()
    }

    fn last_error(&self) -> Option<String> {
        (**self).last_error()
    }
}

impl<S: LayoutStore + ?Sized> LayoutStore for Arc<S> {
    fn add_area(&self, shape: Shape) {
        (**self).add_area(shape)
    }

    fn update_area(&self, shape: Shape) {
        (**self).update_area(shape)
    }

    fn delete_area(&self, id: AreaId) {
        (**self).delete_area(id)
    }

    fn clear_areas(&self) {
        (**self).clear_areas()
    }

    fn layout(&self) -> Option<Layout> {
        (**self).layout()
    }

    fn last_error(&self) -> Option<String> {
        (**self).last_error()
    }
}
