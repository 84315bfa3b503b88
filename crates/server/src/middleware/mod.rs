//! Request middleware: sessions and authentication extractors.

pub mod auth;
mod session;

pub use session::{SESSION_COOKIE_NAME, create_session_layer};
