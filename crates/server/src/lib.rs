//! Tradepost server library.
//!
//! This crate provides the backend functionality as a library, allowing it
//! to be tested and reused. The binary in `main.rs` is a thin shell around
//! it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
