//! # Component Stores
//!
//! Two storage strategies with different trade-offs:
//!
//! | Store | Handle | Lookup | Remove | Order after remove |
//! |---|---|---|---|---|
//! | [`SlotMap`] | [`Key`] (generational) | O(1) | O(1) | last element moves into the hole |
//! | [`ComponentTable`] | [`EntityId`] | O(n) | O(n) | fully preserved |
//!
//! They are deliberately separate types. [`ComponentStore`] names what
//! they have in common so systems can be written once over either.

mod key;
mod slot_map;

pub use key::Key;
pub use slot_map::SlotMap;

use crate::ecs::{Component, ComponentTable, EntityId};

/// Handle-addressed storage of packed components.
///
/// # Example
///
/// ```rust
/// use lumen_core::{ComponentStore, ComponentTable, EntityId, SlotMap};
///
/// fn total<S: ComponentStore<u32>>(store: &S) -> u32 {
///     store.as_slice().iter().sum()
/// }
///
/// let mut keyed: SlotMap<u32> = SlotMap::new();
/// keyed.insert(2)?;
/// let mut linear: ComponentTable<u32> = ComponentTable::new();
/// linear.insert(EntityId::new(0, 0), 3)?;
///
/// assert_eq!(total(&keyed) + total(&linear), 5);
/// # Ok::<(), lumen_core::StoreError>(())
/// ```
pub trait ComponentStore<T: Component> {
    /// How callers address an element.
    type Handle: Copy + Eq;

    /// Returns the element for `handle`, if present.
    fn fetch(&self, handle: Self::Handle) -> Option<&T>;

    /// Returns the element for `handle` mutably, if present.
    fn fetch_mut(&mut self, handle: Self::Handle) -> Option<&mut T>;

    /// Removes the element for `handle`, returning it if it was present.
    fn release(&mut self, handle: Self::Handle) -> Option<T>;

    /// Number of stored elements.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements, densely packed.
    fn as_slice(&self) -> &[T];
}

impl<T: Component> ComponentStore<T> for SlotMap<T> {
    type Handle = Key;

    fn fetch(&self, handle: Key) -> Option<&T> {
        self.get(handle)
    }

    fn fetch_mut(&mut self, handle: Key) -> Option<&mut T> {
        self.get_mut(handle)
    }

    fn release(&mut self, handle: Key) -> Option<T> {
        self.remove(handle)
    }

    fn len(&self) -> usize {
        SlotMap::len(self)
    }

    fn as_slice(&self) -> &[T] {
        SlotMap::as_slice(self)
    }
}

impl<T: Component> ComponentStore<T> for ComponentTable<T> {
    type Handle = EntityId;

    fn fetch(&self, handle: EntityId) -> Option<&T> {
        self.get(handle)
    }

    fn fetch_mut(&mut self, handle: EntityId) -> Option<&mut T> {
        self.get_mut(handle)
    }

    fn release(&mut self, handle: EntityId) -> Option<T> {
        self.destroy(handle)
    }

    fn len(&self) -> usize {
        ComponentTable::len(self)
    }

    fn as_slice(&self) -> &[T] {
        self.components()
    }
}
