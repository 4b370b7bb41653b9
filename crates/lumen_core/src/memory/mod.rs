//! # Memory Management
//!
//! Growable contiguous buffers underlying every store.
//!
//! ## Design Philosophy
//!
//! - Elements are stored by value in one contiguous allocation
//! - Growth is amortized O(1) and never shrinks the buffer
//! - Allocation failure is an error value, not an abort

mod dyn_array;

pub use dyn_array::{DynArray, INITIAL_CAPACITY};
