//! # Application Layer
//!
//! Use cases and services composing the domain model with the
//! infrastructure ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
