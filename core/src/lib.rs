//! Root of the `colloquy-core` library: multi-session chat state, outbound
//! message dispatch, and incremental decoding of the backend's streamed
//! replies.
//!
//! The load-bearing property of this crate is isolation: a reply stream
//! keeps writing to the session that started it, identified by the id
//! captured when the request was issued, no matter which session the user
//! is looking at by the time bytes arrive.

// Prevent accidental direct writes to stdout/stderr in library code. All
// diagnostics go through the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

mod chat;
pub use chat::ChatManager;
mod client;
pub mod config;
pub use config::ChatConfig;
pub mod error;
mod flags;
pub mod normalize;
mod registry;
mod sessions;
pub use sessions::Session;
pub mod sse;
