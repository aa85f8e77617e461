//! The ghost actor of spec §4.4.2. Ghosts never terminate the level
//! themselves; a `DeadPacman` outcome only sets `game_over` for the
//! publisher to observe. Level termination is driven entirely by the
//! command-reader's outcome (spec §4.4.2, §9).

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pacman_board::{move_ghost, Board, MoveOutcome};

use crate::session::Session;

pub fn run(session: &Arc<Session>, board: &Arc<Board>, ghost_index: usize) {
    let step_offset = board.state.read().ghosts[ghost_index].step_offset;
    let delay = Duration::from_millis((board.tempo as u64) * (1 + step_offset as u64));

    loop {
        thread::sleep(delay);

        if session.latch.lock().shutdown {
            return;
        }

        if move_ghost(board, ghost_index) == MoveOutcome::DeadPacman {
            session.latch.lock().game_over = true;
        }
    }
}
