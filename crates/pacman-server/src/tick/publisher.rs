//! The snapshot publisher actor of spec §4.4.3. No lock is held across
//! I/O: the board read lock and the latch mutex are each taken and
//! released before the write happens.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pacman_board::Board;
use pacman_common::error::WireError;
use pacman_common::wire::{self, BoardFrame};

use crate::session::Session;

pub fn run(session: &Arc<Session>, board: &Arc<Board>) {
    if publish(session, board).is_err() {
        mark_disconnected_and_shutdown(session);
    }

    let delay = Duration::from_millis(board.tempo as u64);
    loop {
        thread::sleep(delay);
        if session.latch.lock().shutdown {
            break;
        }
        if publish(session, board).is_err() {
            mark_disconnected_and_shutdown(session);
            break;
        }
    }

    let _ = publish(session, board);
}

fn mark_disconnected_and_shutdown(session: &Arc<Session>) {
    let mut latch = session.latch.lock();
    latch.disconnected = true;
    latch.shutdown = true;
}

fn publish(session: &Arc<Session>, board: &Arc<Board>) -> Result<(), WireError> {
    let (cells, points) = {
        let state = board.state.read();
        (Board::snapshot_cells(&state), state.pacman.points)
    };
    let (victory, game_over) = {
        let latch = session.latch.lock();
        (latch.victory, latch.game_over)
    };

    let frame = BoardFrame {
        width: board.width,
        height: board.height,
        tempo: board.tempo,
        victory,
        game_over,
        points,
        cells,
    };

    let mut guard = session.notif_stream.lock();
    match guard.as_mut() {
        Some(stream) => wire::write_board(stream, &frame),
        None => Err(WireError::Eof),
    }
}
