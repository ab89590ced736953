//! Data Transfer Objects (DTOs) for the messaging service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame and event DTOs
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
