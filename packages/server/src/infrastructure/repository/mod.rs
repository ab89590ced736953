//! Implementations of the persistence and membership ports.

pub mod inmemory;

pub use inmemory::{InMemoryMessageStore, InMemoryProfileDirectory, InMemoryRoomRegistry};
