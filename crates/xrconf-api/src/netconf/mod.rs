//! NETCONF over SSH (RFC 6241 operations, RFC 6242 framing).
//!
//! Layered bottom-up:
//!
//! - [`framer`] — byte-driven frame parsers for both framing generations.
//! - [`format`] — request message construction.
//! - [`reply`] — `rpc-reply` parsing and payload extraction.
//! - [`ssh`] — the raw SSH subsystem transport.
//! - [`client`] — the session: hello exchange, message-id bookkeeping,
//!   candidate/commit edits, reconnect-once recovery.

pub mod client;
pub mod format;
pub mod framer;
pub mod reply;
pub mod ssh;

pub use client::{NetconfClient, SessionOptions};
pub use ssh::Login;
