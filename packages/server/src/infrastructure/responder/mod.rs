//! Implementations of the `AutoResponder` port.

pub mod scripted;

pub use scripted::ScriptedAutoResponder;
