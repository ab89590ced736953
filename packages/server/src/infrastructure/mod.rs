//! Infrastructure layer: wire DTOs and concrete implementations of the
//! domain ports.

pub mod dto;
pub mod pusher;
pub mod repository;
pub mod responder;
