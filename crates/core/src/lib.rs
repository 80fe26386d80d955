//! Domain logic for the muster survey service.
//!
//! Everything in this crate is pure: no I/O, no database handles, no HTTP.
//! The API crate wires these rules to the persistence layer.

pub mod access;
pub mod aggregation;
pub mod answer;
pub mod error;
pub mod question;
pub mod roles;
pub mod types;
