//! Infrastructure adapters. Implement outbound ports, drive inbound ports.
//!
//! HTTP, storage, randomness. Map errors to DomainError.

pub mod avatar;
pub mod http;
pub mod persistence;
