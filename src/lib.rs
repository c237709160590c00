//! Chat web server with per-session conversation memory - Library exports for testing

pub mod api;
pub mod core;
pub mod infrastructure;
