//! Authenticated endpoint groups.
//!
//! Each module adds methods to [`crate::Session`] for a group of related
//! appliance endpoints.

pub mod gravity;
pub mod info;
pub mod teleporter;
