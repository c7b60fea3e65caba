//! HTTP and WebSocket surface.

pub mod handlers;
pub mod router;
pub mod ui;
pub mod ws;

pub use router::router;
