//! # Component Payloads
//!
//! Components are pure data containers with no behavior.
//! They must be Copy and have a fixed size so the stores can keep them
//! packed by value.

use bytemuck::{Pod, Zeroable};

/// Payload contract for every store.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, viewable as raw bytes
/// - `Zeroable`: An all-zero value is valid, used for absent payloads
///
/// Implemented for every type meeting those bounds.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use lumen_core::SlotMap;
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
/// #[repr(C)]
/// struct MeshInstance {
///     mesh_id: u32,
///     material_id: u32,
/// }
///
/// let mut instances: SlotMap<MeshInstance> = SlotMap::new();
/// let key = instances.insert_zeroed()?;
/// assert_eq!(instances.get(key), Some(&MeshInstance::default()));
/// # Ok::<(), lumen_core::StoreError>(())
/// ```
pub trait Component: Copy + Pod + Zeroable + Send + Sync + 'static {}

impl<T> Component for T where T: Copy + Pod + Zeroable + Send + Sync + 'static {}
