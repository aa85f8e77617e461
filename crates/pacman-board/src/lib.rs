//! The board & movement façade: spec §1 treats this as an external
//! collaborator (level loading, collision/portal/dot/kill rules), but this
//! workspace still needs a concrete implementation for the session engine
//! in `pacman-server` to drive.

pub mod board;
pub mod error;
pub mod level;
pub mod movement;

pub use board::{Board, BoardState, Content, Ghost, Pacman, Position};
pub use error::BoardError;
pub use level::{is_level_file, load_level, unload_level};
pub use movement::{kill_pacman, move_ghost, move_pacman, MoveOutcome};
