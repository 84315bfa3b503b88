//! Tradepost Core - Shared types library.
//!
//! This crate provides the common domain types used across all Tradepost
//! components:
//! - `server` - The JSON REST backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, product models
//!   and the closed `Role` enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
