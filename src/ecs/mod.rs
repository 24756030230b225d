//! Minimal entity-component store used by the sandbox.
//!
//! Entities are opaque IDs, components live in per-type storages behind a
//! `TypeId` keyed map. No archetypes, no scheduling - systems are plain
//! functions walking storages.

pub mod entity;
pub mod component;
pub mod registry;

pub use entity::{Entity, EntityId};
pub use component::{Component, TypedStorage};
pub use registry::Registry;
