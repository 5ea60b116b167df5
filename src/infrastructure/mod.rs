//! # Infrastructure Layer
//!
//! Integrations with the outside world: upstream flight-search providers,
//! the notification service and the persistence store.

pub mod notification;
pub mod persistence;
pub mod providers;
