//! In-memory adapters for the domain ports.
//!
//! Process-local and not shared across server instances; horizontal
//! scaling needs an external fan-out mechanism and a real database behind
//! `MessageStore` and `ProfileDirectory`.

pub mod message;
pub mod profile;
pub mod room;

pub use message::InMemoryMessageStore;
pub use profile::InMemoryProfileDirectory;
pub use room::InMemoryRoomRegistry;
