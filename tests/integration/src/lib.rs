//! Integration test utilities for the ovation gateway
//!
//! This crate provides helpers for spawning a gateway on an ephemeral port
//! and driving it over HTTP and WebSocket.

pub mod helpers;

pub use helpers::*;
