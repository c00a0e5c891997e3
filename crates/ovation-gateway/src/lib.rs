//! # ovation-gateway
//!
//! The external interface boundary: reactions come in over HTTP, live
//! aggregate updates go out over WebSocket.

pub mod handlers;
pub mod protocol;
pub mod response;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
