//! Library surface of the session server, split out of `main.rs` so the
//! pieces can be exercised by unit tests without going through the CLI.

pub mod acceptor;
pub mod queue;
pub mod session;
pub mod signals;
mod tick;
pub mod top_scores;
pub mod worker;
