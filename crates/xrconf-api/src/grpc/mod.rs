//! IOS-XR EMS gRPC transport.
//!
//! [`ems`] carries the wire-level message types and service stubs;
//! [`client`] layers credentials, deadlines, stream collection, and error
//! classification on top.

pub mod client;
pub mod ems;

pub use client::GrpcClient;
