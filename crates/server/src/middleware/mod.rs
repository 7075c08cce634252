//! Middleware for the ordering service.

pub mod session;

pub use session::create_session_layer;
