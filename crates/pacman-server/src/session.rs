//! The `Session` of spec §3: a reusable per-worker slot holding the
//! client's two streams, the current game's board, and the status latch.

use std::fs::File;
use std::sync::Arc;

use pacman_board::Board;
use parking_lot::Mutex;

/// The small mutex-guarded record of boolean control flags plus the
/// last-command bookkeeping (spec §3). All fields are read/written only
/// while holding the session's latch mutex (spec §3 invariants).
#[derive(Debug, Default)]
pub struct Latch {
    pub disconnected: bool,
    pub victory: bool,
    pub game_over: bool,
    pub shutdown: bool,
    pub last_cmd: u8,
    pub has_cmd: bool,
    pub client_id: i32,
}

impl Latch {
    /// Reset at the start of a new client's game (spec §4.3 step 5).
    pub fn reset_for_new_game(&mut self, client_id: i32) {
        self.disconnected = false;
        self.victory = false;
        self.game_over = false;
        self.shutdown = false;
        self.last_cmd = 0;
        self.has_cmd = false;
        self.client_id = client_id;
    }

    /// True while this slot is actively bound to a connected client (spec
    /// §4.5's top-scores dump precondition).
    pub fn is_bound(&self) -> bool {
        !self.disconnected
    }
}

/// One reusable session worker slot (spec §3). Created once at server
/// start and retained across every game it hosts.
pub struct Session {
    pub req_stream: Mutex<Option<File>>,
    pub notif_stream: Mutex<Option<File>>,
    pub board: Mutex<Option<Arc<Board>>>,
    pub latch: Mutex<Latch>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            req_stream: Mutex::new(None),
            notif_stream: Mutex::new(None),
            board: Mutex::new(None),
            latch: Mutex::new(Latch::default()),
        }
    }

    /// Close both streams and clear the board, per spec §4.3 step 7 /
    /// §8's "stream handles invalid before the next game's first
    /// snapshot" invariant.
    pub fn reset_streams(&self) {
        *self.req_stream.lock() = None;
        *self.notif_stream.lock() = None;
        *self.board.lock() = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal outcome of the per-level tick loop (spec §4.4.1 / glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NextLevel,
    QuitGame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_reset_clears_everything() {
        let mut latch = Latch::default();
        latch.disconnected = true;
        latch.shutdown = true;
        latch.has_cmd = true;
        latch.reset_for_new_game(7);
        assert!(!latch.disconnected);
        assert!(!latch.shutdown);
        assert!(!latch.has_cmd);
        assert_eq!(latch.client_id, 7);
    }

    #[test]
    fn session_reset_clears_streams_and_board() {
        let session = Session::new();
        *session.latch.lock() = Latch {
            client_id: 3,
            ..Latch::default()
        };
        session.reset_streams();
        assert!(session.req_stream.lock().is_none());
        assert!(session.notif_stream.lock().is_none());
        assert!(session.board.lock().is_none());
    }
}
