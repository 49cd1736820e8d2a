//! Hondana Core - Shared types library.
//!
//! This crate provides common types used across all Hondana components:
//! - `server` - Public directory site and admin API
//! - `cli` - Command-line tools for seeding and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, pagination, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
