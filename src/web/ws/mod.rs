//! WebSocket module for real-time chat.
//!
//! Every connection joins the single broadcast group on upgrade.

pub mod hub;

pub use hub::{hub_ws_handler, HubState};
