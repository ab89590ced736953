//! Real-time messaging server for the bodega storefront.
//!
//! Multiplexes live WebSocket connections into named conversation rooms,
//! persists messages through an injected store, and fans out presence,
//! typing, and message events to room members.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
