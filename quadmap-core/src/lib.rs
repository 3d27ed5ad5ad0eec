//! Core types and service wiring for the quadmap campus map and feed back-end.

/// Map categories, pins, and feed ordering.
pub mod catalog;
/// Domain models and identifiers shared by all crates.
pub mod model;
/// Traits describing the geocoding provider and user storage interfaces.
pub mod ports;
/// Best-effort address resolution with a fixed fallback coordinate.
pub mod resolver;
/// User directory backed by an injectable store.
pub mod users;

pub use catalog::*;
pub use model::*;
pub use ports::*;
pub use resolver::*;
pub use users::*;
