//! Shared wire protocol, framed I/O, and connection-request types for the
//! Pac-Man session server and its client.

pub mod error;
pub mod framed_io;
pub mod limits;
pub mod wire;

pub use error::WireError;
