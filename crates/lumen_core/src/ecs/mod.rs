//! # Entity Component Layer
//!
//! The pieces of the entity-component layer that live in the storage core.
//!
//! ## Design Philosophy
//!
//! - Entity IDs are simple indices with generation counters
//! - Components are plain data stored by value in dense arrays
//! - Per-entity tables trade O(n) lookup for stable, gap-free iteration

mod component;
mod entity;
mod table;

pub use component::Component;
pub use entity::EntityId;
pub use table::ComponentTable;
