//! Web module for the hub.
//!
//! This module provides the WebSocket endpoint every chat client connects
//! to, plus a health check route.

pub mod router;
pub mod server;
pub mod ws;

pub use router::create_router;
pub use server::HubServer;
pub use ws::HubState;
