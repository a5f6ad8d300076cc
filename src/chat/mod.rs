//! Chat module for the exchange hub.
//!
//! This module provides the single flat broadcast group:
//! - Client registration with generated display names
//! - Broadcast delivery to every connected client
//! - Guaranteed unregistration through a drop guard

mod names;
mod registry;

pub use names::generate_display_name;
pub use registry::{
    ClientHandle, ClientId, ClientRegistry, Outbox, RegisteredClient, OUTBOX_CAPACITY,
};
