//! # Generational Slot Map
//!
//! Stable [`Key`] handles over a densely packed data array.
//!
//! ## Layout
//!
//! ```text
//! slots:    [ g0 d1 | g1 -- | g0 d0 ]      one per index ever handed out
//!              │         ▲      │
//!              │    free list   │
//!              ▼                ▼
//! data:     [   C   ,   B   ]               packed, no gaps
//! inverse:  [   2   ,   0   ]               data[i] is owned by slots[inverse[i]]
//! ```
//!
//! - Insert: pop a retired index off the free list (or allocate a new one),
//!   append to `data`. O(1) amortized.
//! - Remove: bump the slot generation, put the index on the free list, move
//!   the last packed element into the hole. O(1).
//! - Lookup: compare generations, then index `data`. O(1).
//!
//! Only the element moved into a vacated position ever changes its packed
//! index, so bulk iteration over [`SlotMap::as_slice`] stays stable across
//! removals elsewhere.
//!
//! A slot whose generation has reached `u32::MAX` is retired for good on its
//! next removal instead of wrapping, so no generation is ever issued twice
//! for the same index.

use super::key::Key;
use crate::config::StoreConfig;
use crate::ecs::Component;
use crate::error::{StoreError, StoreResult};
use crate::memory::DynArray;

/// Marks an unused `data_idx` / `next_free` field.
const INVALID: u32 = u32::MAX;

/// Per-index bookkeeping.
///
/// `data_idx` is meaningful only while the slot is occupied and
/// `next_free` only while it is on the free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    generation: u32,
    data_idx: u32,
    next_free: u32,
}

impl Slot {
    #[inline]
    const fn is_occupied(self) -> bool {
        self.data_idx != INVALID
    }
}

/// A generational slot map over plain-data payloads.
///
/// # Example
///
/// ```rust
/// use lumen_core::SlotMap;
///
/// let mut bodies: SlotMap<[f32; 3]> = SlotMap::new();
/// let a = bodies.insert([0.0, 1.0, 0.0])?;
/// let b = bodies.insert([2.0, 0.0, 0.0])?;
///
/// assert_eq!(bodies.remove(a), Some([0.0, 1.0, 0.0]));
/// assert_eq!(bodies.get(a), None);
/// assert_eq!(bodies.get(b), Some(&[2.0, 0.0, 0.0]));
///
/// // Bulk update straight over the packed array
/// for position in bodies.as_mut_slice() {
///     position[1] -= 9.81;
/// }
/// # Ok::<(), lumen_core::StoreError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SlotMap<T> {
    slots: DynArray<Slot>,
    inverse: DynArray<u32>,
    data: DynArray<T>,
    free_head: u32,
    free_tail: u32,
    retired: usize,
    index_bits: u32,
    max_slots: u32,
}

impl<T: Component> SlotMap<T> {
    /// Creates an empty slot map with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = StoreConfig::default();
        Self {
            slots: DynArray::new(),
            inverse: DynArray::new(),
            data: DynArray::new(),
            free_head: INVALID,
            free_tail: INVALID,
            retired: 0,
            index_bits: config.index_bits,
            max_slots: config.max_slots(),
        }
    }

    /// Creates an empty slot map sized and bounded by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the config does not validate,
    /// or [`StoreError::AllocationFailure`] if the initial reservation fails.
    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let max_slots = config.max_slots();
        let capacity = config.initial_capacity.min(max_slots as usize);
        Ok(Self {
            slots: DynArray::with_capacity(capacity)?,
            inverse: DynArray::with_capacity(capacity)?,
            data: DynArray::with_capacity(capacity)?,
            free_head: INVALID,
            free_tail: INVALID,
            retired: 0,
            index_bits: config.index_bits,
            max_slots,
        })
    }

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no elements are live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of slot indices ever handed out, live or retired.
    #[inline]
    #[must_use]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of slot indices permanently retired after exhausting their
    /// generations.
    #[inline]
    #[must_use]
    pub fn retired_slots(&self) -> usize {
        self.retired
    }

    /// Upper bound on [`SlotMap::num_slots`].
    #[inline]
    #[must_use]
    pub const fn max_slots(&self) -> u32 {
        self.max_slots
    }

    /// Configured width of key indices.
    #[inline]
    #[must_use]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Elements the data array holds before it must grow.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Inserts a payload and returns its key.
    ///
    /// Retired indices are reused first, in the order they were retired,
    /// carrying the generation they were given on removal. A fresh index
    /// starts at generation 0.
    ///
    /// # Errors
    ///
    /// - [`StoreError::IndexSpaceExhausted`] if no index is free and the
    ///   configured width allows no more.
    /// - [`StoreError::AllocationFailure`] if a backing array cannot grow.
    ///
    /// The map is unchanged when an error is returned.
    // Indices and packed positions stay below `max_slots <= u32::MAX`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, value: T) -> StoreResult<Key> {
        let reuse = self.free_head != INVALID;
        if !reuse {
            if self.slots.len() >= self.max_slots as usize {
                tracing::warn!(
                    "SlotMap index space exhausted: {} slots at {}-bit indices",
                    self.max_slots,
                    self.index_bits
                );
                return Err(StoreError::IndexSpaceExhausted {
                    index_bits: self.index_bits,
                    max_slots: self.max_slots,
                });
            }
            self.slots.reserve(1)?;
        }
        self.data.reserve(1)?;
        self.inverse.reserve(1)?;

        let index = if reuse {
            self.pop_free()
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                data_idx: INVALID,
                next_free: INVALID,
            })?;
            index
        };

        let packed = self.data.push(value)?;
        self.inverse.push(index)?;

        let slot = &mut self.slots.as_mut_slice()[index as usize];
        slot.data_idx = packed as u32;
        slot.next_free = INVALID;
        Ok(Key::new(index, slot.generation))
    }

    /// Inserts an all-zero payload, for callers that fill it in afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`SlotMap::insert`].
    #[inline]
    pub fn insert_zeroed(&mut self) -> StoreResult<Key> {
        self.insert(T::zeroed())
    }

    /// Returns the payload for `key`, or `None` if the key is stale or null.
    #[inline]
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&T> {
        let packed = self.resolve(key)?;
        self.data.get(packed)
    }

    /// Returns the payload for `key` mutably, or `None` if the key is stale or null.
    #[inline]
    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        let packed = self.resolve(key)?;
        self.data.get_mut(packed)
    }

    /// Like [`SlotMap::get`], reporting why the key did not resolve.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StaleOrInvalidKey`] if the key is stale or null.
    pub fn try_get(&self, key: Key) -> StoreResult<&T> {
        self.get(key).ok_or(StoreError::StaleOrInvalidKey { key })
    }

    /// Whether `key` refers to a live element.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.resolve(key).is_some()
    }

    /// Removes the element for `key` and returns its payload.
    ///
    /// Returns `None` for stale, null or already removed keys; repeated
    /// removal is a no-op. On success the slot generation is bumped, which
    /// invalidates `key` and every copy of it, and the last packed element
    /// is moved into the vacated position.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove(&mut self, key: Key) -> Option<T> {
        let packed = self.resolve(key)?;

        let value = self.data.swap_remove(packed).ok()?;
        self.inverse.swap_remove(packed).ok()?;

        let slots = self.slots.as_mut_slice();
        if let Some(&moved) = self.inverse.get(packed) {
            slots[moved as usize].data_idx = packed as u32;
        }

        self.release(key.index());

        Some(value)
    }

    /// Removes every element. All outstanding keys become stale.
    ///
    /// Vacated indices go back to the free list unless retired, so
    /// `num_slots` is kept.
    pub fn clear(&mut self) {
        let vacated = self.inverse.len();
        for packed in 0..vacated {
            let index = self.inverse.as_slice()[packed];
            self.release(index);
        }
        self.data.clear();
        self.inverse.clear();
        tracing::trace!("SlotMap cleared, {} slots vacated", vacated);
    }

    /// Direct access to the packed element at `packed`.
    #[inline]
    #[must_use]
    pub fn data_at(&self, packed: usize) -> Option<&T> {
        self.data.get(packed)
    }

    /// Direct mutable access to the packed element at `packed`.
    #[inline]
    pub fn data_at_mut(&mut self, packed: usize) -> Option<&mut T> {
        self.data.get_mut(packed)
    }

    /// The live key owning packed position `packed`.
    #[inline]
    #[must_use]
    pub fn key_of(&self, packed: usize) -> Option<Key> {
        let index = *self.inverse.get(packed)?;
        let slot = self.slots.get(index as usize)?;
        Some(Key::new(index, slot.generation))
    }

    /// All live payloads in packed order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// All live payloads in packed order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    /// Raw bytes of the packed payloads.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Iterates over live keys in packed order.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        let slots = self.slots.as_slice();
        self.inverse
            .iter()
            .map(move |&index| Key::new(index, slots[index as usize].generation))
    }

    /// Iterates over `(key, payload)` pairs in packed order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        self.keys().zip(self.data.iter())
    }

    /// Iterates over `(key, payload)` pairs in packed order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut T)> + '_ {
        let slots = self.slots.as_slice();
        self.inverse
            .iter()
            .map(move |&index| Key::new(index, slots[index as usize].generation))
            .zip(self.data.iter_mut())
    }

    /// Checks every structural invariant of the map.
    ///
    /// O(n). Intended for tests and debug tooling.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] describing the first violation found.
    pub fn validate(&self) -> StoreResult<()> {
        let slots = self.slots.as_slice();

        if self.inverse.len() != self.data.len() {
            return Err(StoreError::Corrupted(format!(
                "inverse map has {} entries for {} packed elements",
                self.inverse.len(),
                self.data.len()
            )));
        }

        for (packed, &index) in self.inverse.iter().enumerate() {
            let Some(slot) = slots.get(index as usize) else {
                return Err(StoreError::Corrupted(format!(
                    "packed {packed} owned by unallocated slot {index}"
                )));
            };
            if slot.data_idx as usize != packed {
                return Err(StoreError::Corrupted(format!(
                    "slot {index} points at packed {} but owns packed {packed}",
                    slot.data_idx
                )));
            }
        }

        let occupied = slots.iter().filter(|s| s.is_occupied()).count();
        if occupied != self.data.len() {
            return Err(StoreError::Corrupted(format!(
                "{occupied} occupied slots for {} packed elements",
                self.data.len()
            )));
        }

        let mut free = 0usize;
        let mut last = INVALID;
        let mut cursor = self.free_head;
        while cursor != INVALID {
            let Some(slot) = slots.get(cursor as usize) else {
                return Err(StoreError::Corrupted(format!(
                    "free list reaches unallocated slot {cursor}"
                )));
            };
            if slot.is_occupied() {
                return Err(StoreError::Corrupted(format!(
                    "occupied slot {cursor} is on the free list"
                )));
            }
            free += 1;
            if free > slots.len() {
                return Err(StoreError::Corrupted("free list has a cycle".into()));
            }
            last = cursor;
            cursor = slot.next_free;
        }
        if last != self.free_tail {
            return Err(StoreError::Corrupted(format!(
                "free list ends at {last} but tail is {}",
                self.free_tail
            )));
        }
        if occupied + free + self.retired != slots.len() {
            return Err(StoreError::Corrupted(format!(
                "{occupied} occupied + {free} free + {} retired != {} slots",
                self.retired,
                slots.len()
            )));
        }

        Ok(())
    }

    #[inline]
    fn resolve(&self, key: Key) -> Option<usize> {
        let slot = self.slots.get(key.index() as usize)?;
        if slot.generation != key.generation() || !slot.is_occupied() {
            return None;
        }
        Some(slot.data_idx as usize)
    }

    /// Vacates slot `index` and bumps its generation.
    ///
    /// A slot already at the last generation is retired instead and never
    /// handed out again.
    fn release(&mut self, index: u32) {
        let slot = &mut self.slots.as_mut_slice()[index as usize];
        slot.data_idx = INVALID;
        slot.next_free = INVALID;
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.push_free(index);
        } else {
            self.retired += 1;
            tracing::debug!("SlotMap slot {} retired after exhausting its generations", index);
        }
    }

    /// Appends `index` at the tail of the free list.
    fn push_free(&mut self, index: u32) {
        let slots = self.slots.as_mut_slice();
        slots[index as usize].next_free = INVALID;
        if self.free_tail == INVALID {
            self.free_head = index;
        } else {
            slots[self.free_tail as usize].next_free = index;
        }
        self.free_tail = index;
    }

    /// Takes the head of the free list. The list must be non-empty.
    fn pop_free(&mut self) -> u32 {
        let index = self.free_head;
        let slot = &mut self.slots.as_mut_slice()[index as usize];
        self.free_head = slot.next_free;
        slot.next_free = INVALID;
        if self.free_head == INVALID {
            self.free_tail = INVALID;
        }
        index
    }
}

impl<T: Component> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
