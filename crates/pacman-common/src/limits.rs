//! Protocol and board limits, centralized the way `server.rs` groups its
//! constants in the teacher workspace.

/// Maximum length, including the null terminator, of a request/notification
/// stream path sent in a CONNECT frame.
pub const MAX_PIPE_PATH_LENGTH: usize = 40;

/// Maximum number of connect requests the bounded queue holds at once.
pub const MAX_PENDING_CLIENTS: usize = 100;

/// Maximum scripted moves a pacman or ghost can carry.
pub const MAX_MOVES: usize = 20;

/// Maximum levels a single session drives through.
pub const MAX_LEVELS: usize = 20;

/// Maximum ghosts a board can host.
pub const MAX_GHOSTS: usize = 25;
