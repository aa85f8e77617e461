use std::io;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("level file {0} is empty")]
    EmptyLevel(String),

    #[error("level file {0} has ragged rows (expected width {1}, got {2})")]
    RaggedRow(String, usize, usize),

    #[error("level file {0} has no pacman start ('P')")]
    MissingPacman(String),

    #[error("level file {0} declares a ghost with no scripted moves")]
    GhostWithoutMoves(String),

    #[error("level file {0} has a malformed descriptor line: {1}")]
    MalformedDescriptor(String, String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
