//! # Domain Layer
//!
//! Value objects and entities of the flight-search domain. Everything in
//! this layer is immutable after construction and free of I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;
