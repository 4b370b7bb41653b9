//! # Entity-Keyed Component Table
//!
//! Parallel arrays of entity IDs and component payloads:
//!
//! ```text
//! entities:   [ e7 , e2 , e9 ]
//! components: [ c7 , c2 , c9 ]     components[i] belongs to entities[i]
//! ```
//!
//! Lookup and removal scan `entities` linearly, so they are O(n). This is
//! the right trade for small per-system tables where the entity ID is
//! already the stable handle and iteration order matters more than lookup
//! speed. Use [`crate::SlotMap`] when O(1) handles are needed.

use crate::config::StoreConfig;
use crate::ecs::component::Component;
use crate::ecs::entity::EntityId;
use crate::error::StoreResult;
use crate::memory::DynArray;

/// Component storage keyed by an external [`EntityId`].
///
/// The table does not deduplicate: callers must create at most one entry
/// per entity. If a duplicate is created anyway, both entries coexist and
/// lookups return the first one.
///
/// # Example
///
/// ```rust
/// use lumen_core::{ComponentTable, EntityId};
///
/// let mut visibility: ComponentTable<u32> = ComponentTable::new();
/// let player = EntityId::new(0, 0);
///
/// *visibility.create(player)? = 1;
/// assert_eq!(visibility.get(player), Some(&1));
///
/// assert_eq!(visibility.destroy(player), Some(1));
/// assert!(visibility.get(player).is_none());
/// # Ok::<(), lumen_core::StoreError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ComponentTable<T> {
    entities: DynArray<EntityId>,
    components: DynArray<T>,
}

impl<T: Component> ComponentTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: DynArray::new(),
            components: DynArray::new(),
        }
    }

    /// Creates an empty table with room for `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::AllocationFailure`] if the reservation fails.
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        Ok(Self {
            entities: DynArray::with_capacity(capacity)?,
            components: DynArray::with_capacity(capacity)?,
        })
    }

    /// Creates an empty table sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::InvalidConfig`] if the config does not
    /// validate, or [`crate::StoreError::AllocationFailure`] if the
    /// reservation fails.
    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Self::with_capacity(config.initial_capacity)
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the table has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Appends a zeroed component for `entity` and returns it for initialisation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::AllocationFailure`] if either array
    /// cannot grow. The table is unchanged in that case.
    pub fn create(&mut self, entity: EntityId) -> StoreResult<&mut T> {
        self.insert(entity, T::zeroed())
    }

    /// Appends `value` as the component of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::AllocationFailure`] if either array
    /// cannot grow. The table is unchanged in that case.
    pub fn insert(&mut self, entity: EntityId, value: T) -> StoreResult<&mut T> {
        self.entities.reserve(1)?;
        self.components.reserve(1)?;

        self.entities.push(entity)?;
        let index = self.components.push(value)?;
        self.components.at_mut(index)
    }

    /// Returns the first component belonging to `entity`. O(n).
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        let index = self.position(entity)?;
        self.components.get(index)
    }

    /// Returns the first component belonging to `entity` mutably. O(n).
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        let index = self.position(entity)?;
        self.components.get_mut(index)
    }

    /// Whether `entity` has an entry. O(n).
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.position(entity).is_some()
    }

    /// Removes the first entry for `entity` and returns its component.
    ///
    /// The remaining entries keep their relative order. Returns `None` if
    /// the entity has no entry. O(n).
    pub fn destroy(&mut self, entity: EntityId) -> Option<T> {
        let index = self.position(entity)?;
        self.entities.remove(index).ok()?;
        self.components.remove(index).ok()
    }

    /// Removes every entry. Capacity is kept.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
    }

    /// Entity IDs in table order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        self.entities.as_slice()
    }

    /// Components in table order.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[T] {
        self.components.as_slice()
    }

    /// Components in table order, mutably.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [T] {
        self.components.as_mut_slice()
    }

    /// Raw bytes of the packed components.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.components.as_bytes()
    }

    /// Iterates over `(entity, component)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterates over `(entity, component)` pairs in table order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    #[inline]
    fn position(&self, entity: EntityId) -> Option<usize> {
        self.entities.iter().position(|&e| e == entity)
    }
}

impl<T: Component> Default for ComponentTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_zeroed() {
        let mut table: ComponentTable<[u32; 2]> = ComponentTable::new();
        let e = EntityId::new(4, 0);
        assert_eq!(*table.create(e).unwrap(), [0, 0]);
        assert_eq!(table.len(), 1);
        assert!(table.contains(e));
    }

    #[test]
    fn test_create_then_mutate() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        let e = EntityId::new(1, 0);
        *table.create(e).unwrap() = 7;
        *table.get_mut(e).unwrap() += 1;
        assert_eq!(table.get(e), Some(&8));
    }

    #[test]
    fn test_lookup_missing() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        table.insert(EntityId::new(1, 0), 1).unwrap();
        assert!(table.get(EntityId::new(2, 0)).is_none());
        // Same index, different generation is a different entity.
        assert!(table.get(EntityId::new(1, 1)).is_none());
    }

    #[test]
    fn test_destroy_preserves_order() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        for i in 0..4 {
            table.insert(EntityId::new(i, 0), i * 10).unwrap();
        }
        assert_eq!(table.destroy(EntityId::new(1, 0)), Some(10));
        assert_eq!(table.components(), &[0, 20, 30]);
        assert_eq!(
            table.entities(),
            &[EntityId::new(0, 0), EntityId::new(2, 0), EntityId::new(3, 0)]
        );
    }

    #[test]
    fn test_destroy_missing_is_noop() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        table.insert(EntityId::new(0, 0), 5).unwrap();
        assert_eq!(table.destroy(EntityId::new(9, 0)), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_entries_coexist() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        let e = EntityId::new(3, 0);
        table.insert(e, 1).unwrap();
        table.insert(e, 2).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(e), Some(&1));

        assert_eq!(table.destroy(e), Some(1));
        assert_eq!(table.get(e), Some(&2));
    }

    #[test]
    fn test_iter_mut() {
        let mut table: ComponentTable<u32> = ComponentTable::new();
        for i in 0..3 {
            table.insert(EntityId::new(i, 0), i).unwrap();
        }
        for (entity, value) in table.iter_mut() {
            *value += entity.index() * 100;
        }
        let collected: Vec<u32> = table.iter().map(|(_, v)| *v).collect();
        assert_eq!(collected, vec![0, 101, 202]);
    }

    #[test]
    fn test_with_config_reserves_capacity() {
        let config = StoreConfig {
            initial_capacity: 64,
            index_bits: 16,
        };
        let table: ComponentTable<u32> = ComponentTable::with_config(&config).unwrap();
        assert!(table.is_empty());
        assert!(table.components.capacity() >= 64);

        let bad = StoreConfig::with_index_bits(40);
        assert!(ComponentTable::<u32>::with_config(&bad).is_err());
    }

    #[test]
    fn test_bulk_update_and_bytes() {
        let mut table: ComponentTable<u16> = ComponentTable::new();
        table.insert(EntityId::new(0, 0), 0x0101).unwrap();
        table.insert(EntityId::new(1, 0), 0x0202).unwrap();

        for value in table.components_mut() {
            *value += 1;
        }
        assert_eq!(table.get(EntityId::new(1, 0)), Some(&0x0203));
        assert_eq!(table.as_bytes().len(), 4);
        assert_eq!(table.as_bytes(), bytemuck::cast_slice::<u16, u8>(&[0x0102, 0x0203]));
    }
}
