//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module provides derive macro support for datalist records,
//! generating the field schema, accessor, column catalog and field constants
//! from struct annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
