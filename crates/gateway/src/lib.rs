//! HTTP surface for mockauth.
//!
//! Endpoint entries from the configuration are compiled into request
//! handlers ([`compiler`]), collected into an axum router ([`router`]) and
//! served ([`server`]). Every handler answers with a status; none of them
//! can fail the server.

pub mod compiler;
pub mod router;
pub mod server;

pub use compiler::{BAD_PAYLOAD, BAD_TOKEN, CompileContext, CompiledEndpoint, TOKEN_VERIFIED_HEADER, compile};
pub use router::{EndpointRouter, MAX_BODY_BYTES, register_all};
pub use server::{bind, endpoint_table, serve, start};

/// Errors from binding and running the server.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("HTTP server error: {0}")]
    Serve(String),
}
