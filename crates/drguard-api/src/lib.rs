// drguard-api: Async Rust client for the security control-plane gateway

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ControlClient;
pub use error::Error;
pub use transport::{TlsPolicy, Transport};
