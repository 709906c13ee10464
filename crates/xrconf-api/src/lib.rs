//! Wire-level clients for IOS-XR YANG configuration management.
//!
//! Two transports are supported, each speaking its own serialization of the
//! same YANG-modeled data:
//!
//! - **[`netconf`]** — NETCONF over SSH (RFC 6241/6242): a byte-driven frame
//!   codec for the chunked transport, RPC request formatting with message-id
//!   correlation, and `rpc-reply` / `rpc-error` parsing.
//! - **[`grpc`]** — the IOS-XR EMS gRPC service, exchanging YANG-JSON
//!   payloads with per-request credential metadata.
//!
//! [`DeviceClient`] is the transport-selecting facade: callers pick a
//! transport at construction time and from then on use one uniform
//! `set`/`get` surface with the logical [`SetMode`]/[`GetMode`] vocabulary.
//! `xrconf-core` maps [`Error`] into its domain taxonomy.

pub mod client;
pub mod error;
pub mod grpc;
pub mod netconf;

pub use client::{DeviceClient, GetMode, SetMode};
pub use error::Error;
pub use grpc::GrpcClient;
pub use netconf::{Login, NetconfClient, SessionOptions};
