//! HTTP API handlers for sihook

pub mod health;
pub mod hooks;

pub use health::health_routes;
pub use hooks::hook_routes;
