//! # LUMEN Storage Core
//!
//! Dense, handle-addressed component storage for the LUMEN renderer:
//! - Stable generational handles with O(1) insert, lookup and remove
//! - Packed arrays for cache-friendly bulk iteration
//! - Stale handle detection instead of use-after-free
//!
//! ## Architecture Rules
//!
//! 1. **Packed storage** - Every store keeps its payloads gap-free
//! 2. **Plain data payloads** - Components are `Pod`, stored by value
//! 3. **No panics on bad input** - Stale keys, bad indices and failed
//!    growth are reported as values
//!
//! ## Example
//!
//! ```rust
//! use lumen_core::{SlotMap, StoreConfig};
//!
//! let config = StoreConfig::from_toml_str("initial_capacity = 64\nindex_bits = 16")?;
//! let mut lights: SlotMap<[f32; 4]> = SlotMap::with_config(&config)?;
//!
//! let sun = lights.insert([1.0, 0.95, 0.9, 10.0])?;
//! lights.remove(sun);
//! assert!(lights.get(sun).is_none());
//! # Ok::<(), lumen_core::StoreError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;
pub mod store;

pub use config::StoreConfig;
pub use ecs::{Component, ComponentTable, EntityId};
pub use error::{StoreError, StoreResult};
pub use memory::DynArray;
pub use store::{ComponentStore, Key, SlotMap};
