use std::io;

/// Errors raised by the framed I/O primitives and wire codec.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("end of stream")]
    Eof,

    #[error("short write: wrote {wrote} of {expected} bytes")]
    ShortWrite { wrote: usize, expected: usize },

    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("path exceeds MAX_PIPE_PATH_LENGTH")]
    PathTooLong,

    #[error(transparent)]
    Io(#[from] io::Error),
}
