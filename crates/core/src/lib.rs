//! Domain types, validation, and errors for the Rootline family-tree
//! platform.
//!
//! This crate has no internal dependencies so it can be shared by the
//! REST client, the tree editor engine, and any embedding front end.

pub mod backend;
pub mod error;
pub mod family;
pub mod memory;
pub mod person;
pub mod relation;
pub mod types;
pub mod validation;
