//! In-memory layout store.

use super::{LayoutStore, StoreError, StoreResult};
use crate::layout::Layout;
use crate::shapes::{AreaId, Shape};
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    layout: Option<Layout>,
    last_error: Option<String>,
}

/// In-memory store for tests and unsaved layouts. Concurrent writes to the
/// same area resolve last-write-wins.
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    state: RwLock<StoreState>,
}

impl MemoryLayoutStore {
    /// Create a store with no layout loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: Layout) -> Self {
        Self {
            state: RwLock::new(StoreState {
                layout: Some(layout),
                last_error: None,
            }),
        }
    }

    /// Replace the whole layout, clearing any recorded error.
    pub fn set_layout(&self, layout: Option<Layout>) {
        match self.state.write() {
            Ok(mut state) => {
                state.layout = layout;
                state.last_error = None;
            }
            Err(e) => log::error!("Layout store lock poisoned: {e}"),
        }
    }

    /// Apply `op` to the loaded layout, recording any failure.
    pub(crate) fn mutate<F>(&self, op: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Layout) -> StoreResult<()>,
    {
        let mut state = self
            .state
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        let result = match state.layout.as_mut() {
            Some(layout) => op(layout),
            None => Err(StoreError::NoLayout),
        };
        if let Err(e) = &result {
            log::warn!("Layout store rejected change: {e}");
            state.last_error = Some(e.to_string());
        }
        result
    }

    pub(crate) fn record_error(&self, error: &StoreError) {
        log::warn!("Layout store error: {error}");
        if let Ok(mut state) = self.state.write() {
            state.last_error = Some(error.to_string());
        }
    }
}

pub(crate) fn add(layout: &mut Layout, mut shape: Shape) -> StoreResult<()> {
    if shape.id().is_nil() {
        shape.set_id(Uuid::new_v4());
    }
    log::debug!("Adding {:?} '{}' ({})", shape.kind(), shape.name(), shape.id());
    layout.areas.push(shape);
    Ok(())
}

pub(crate) fn update(layout: &mut Layout, shape: Shape) -> StoreResult<()> {
    let id = shape.id();
    if layout.replace_area(shape) {
        Ok(())
    } else {
        Err(StoreError::NotFound(id))
    }
}

pub(crate) fn delete(layout: &mut Layout, id: AreaId) -> StoreResult<()> {
    layout.remove_area(id).map(|_| ()).ok_or(StoreError::NotFound(id))
}

pub(crate) fn clear(layout: &mut Layout) -> StoreResult<()> {
    log::debug!("Clearing {} areas", layout.len());
    layout.areas.clear();
    Ok(())
}

impl LayoutStore for MemoryLayoutStore {
    fn add_area(&self, shape: Shape) {
        let _ = self.mutate(|layout| add(layout, shape));
    }

    fn update_area(&self, shape: Shape) {
        let _ = self.mutate(|layout| update(layout, shape));
    }

    fn delete_area(&self, id: AreaId) {
        let _ = self.mutate(|layout| delete(layout, id));
    }

    fn clear_areas(&self) {
        let _ = self.mutate(clear);
    }

    fn layout(&self) -> Option<Layout> {
        match self.state.read() {
            Ok(state) => state.layout.clone(),
            Err(e) => {
                log::error!("Layout store lock poisoned: {e}");
                None
            }
        }
    }

    fn last_error(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.last_error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Unit;
    use crate::shapes::{Circle, Rectangle};
    use kurbo::Point;

    fn store() -> MemoryLayoutStore {
        MemoryLayoutStore::with_layout(Layout::new("Nursery", 10.0, 10.0, Unit::Meters))
    }

    #[test]
    fn test_add_assigns_id() {
        let store = store();
        store.add_area(Shape::Rectangle(Rectangle::new(Point::ZERO, 20.0, 20.0)));
        let layout = store.layout().unwrap();
        assert_eq!(layout.len(), 1);
        assert!(!layout.areas[0].id().is_nil());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_add_keeps_existing_id() {
        let store = store();
        let mut shape = Shape::Circle(Circle::new(Point::new(5.0, 5.0), 3.0));
        let id = Uuid::new_v4();
        shape.set_id(id);
        store.add_area(shape);
        assert!(store.layout().unwrap().get_area(id).is_some());
    }

    #[test]
    fn test_update_last_write_wins() {
        let store = store();
        store.add_area(Shape::Rectangle(Rectangle::new(Point::ZERO, 20.0, 20.0)));
        let Some(Shape::Rectangle(rect)) = store.layout().unwrap().areas.first().cloned() else {
            panic!("expected a rectangle");
        };

        let mut first = rect.clone();
        first.width = 30.0;
        let mut second = rect;
        second.width = 60.0;
        store.update_area(Shape::Rectangle(first));
        store.update_area(Shape::Rectangle(second));

        let Some(Shape::Rectangle(stored)) = store.layout().unwrap().areas.first().cloned() else {
            panic!("expected a rectangle");
        };
        assert!((stored.width - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_area_records_error() {
        let store = store();
        let id = Uuid::new_v4();
        store.delete_area(id);
        assert_eq!(store.last_error(), Some(StoreError::NotFound(id).to_string()));
    }

    #[test]
    fn test_no_layout() {
        let store = MemoryLayoutStore::new();
        store.clear_areas();
        assert!(store.layout().is_none());
        assert_eq!(store.last_error(), Some(StoreError::NoLayout.to_string()));

        store.set_layout(Some(Layout::new("Fresh", 5.0, 5.0, Unit::Meters)));
        assert!(store.last_error().is_none());
    }

    #[test]
    fn test_clear() {
        let store = store();
        store.add_area(Shape::Rectangle(Rectangle::new(Point::ZERO, 20.0, 20.0)));
        store.add_area(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 10.0)));
        store.clear_areas();
        assert!(store.layout().unwrap().is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let store = std::sync::Arc::new(store());
        let handle = store.clone();
        std::thread::spawn(move || {
            handle.add_area(Shape::Rectangle(Rectangle::new(Point::ZERO, 20.0, 20.0)));
        })
        .join()
        .unwrap();
        assert_eq!(LayoutStore::layout(&store).map(|l| l.len()), Some(1));
    }
}
