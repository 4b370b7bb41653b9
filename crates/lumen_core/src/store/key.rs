//! # Slot Map Keys
//!
//! A key is a slot index plus the generation that slot had when the key
//! was issued. Removing an element bumps its slot's generation, so every
//! key issued before the removal stops resolving.

use std::fmt;

/// Handle to an element of a [`crate::SlotMap`].
///
/// Two keys are equal iff both index and generation match. Keys can be
/// packed into a `u64` for compact bulk storage:
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    index: u32,
    generation: u32,
}

impl Key {
    /// The "no key" sentinel. Never returned by an insertion.
    pub const NULL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Creates a key from its parts.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The slot generation this key was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Whether this key is anything other than [`Key::NULL`].
    ///
    /// This checks shape only. A valid key may still refer to an element
    /// that has since been removed; use [`crate::SlotMap::contains`] for
    /// liveness.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !(self.index == u32::MAX && self.generation == u32::MAX)
    }

    /// Packs the key into a single `u64`.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Unpacks a key produced by [`Key::to_bits`].
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}v{}", self.index, self.generation)
        } else {
            f.write_str("null")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bits_roundtrip() {
        let key = Key::new(12345, 67890);
        assert_eq!(Key::from_bits(key.to_bits()), key);
        assert_eq!(key.to_bits() & 0xFFFF_FFFF, 12345);
        assert_eq!(Key::NULL.to_bits(), u64::MAX);
    }

    #[test]
    fn test_key_equality_needs_both_fields() {
        assert_eq!(Key::new(1, 2), Key::new(1, 2));
        assert_ne!(Key::new(1, 2), Key::new(1, 3));
        assert_ne!(Key::new(1, 2), Key::new(2, 2));
    }

    #[test]
    fn test_null_key() {
        assert!(!Key::NULL.is_valid());
        assert!(!Key::default().is_valid());
        assert!(Key::new(u32::MAX, 0).is_valid());
        assert!(Key::new(0, u32::MAX).is_valid());
        assert_eq!(Key::NULL.to_string(), "null");
        assert_eq!(Key::new(4, 2).to_string(), "4v2");
    }
}
