//! The per-level tick loop of spec §4.4: for one loaded level, spawns
//! one command-reader actor, one ghost actor per ghost, and one snapshot
//! publisher actor, all sharing the session and board by `Arc`. Joins
//! the command-reader first; on its return sets `shutdown`, then joins
//! the ghosts and the publisher.

mod command_reader;
mod ghost;
mod publisher;

use std::sync::Arc;
use std::thread;

use pacman_board::Board;

use crate::session::{Outcome, Session};

/// Runs one level to completion and reports why it ended.
pub fn run_level(session: &Arc<Session>, board: &Arc<Board>) -> Outcome {
    session.latch.lock().shutdown = false;

    let n_ghosts = board.state.read().ghosts.len();

    let ghost_handles: Vec<_> = (0..n_ghosts)
        .map(|index| {
            let session = Arc::clone(session);
            let board = Arc::clone(board);
            thread::Builder::new()
                .name(format!("ghost-{index}"))
                .spawn(move || ghost::run(&session, &board, index))
                .expect("spawn ghost actor")
        })
        .collect();

    let publisher_handle = {
        let session = Arc::clone(session);
        let board = Arc::clone(board);
        thread::Builder::new()
            .name("publisher".to_string())
            .spawn(move || publisher::run(&session, &board))
            .expect("spawn publisher actor")
    };

    let outcome = command_reader::run(session, board);

    session.latch.lock().shutdown = true;

    for handle in ghost_handles {
        let _ = handle.join();
    }
    let _ = publisher_handle.join();

    outcome
}
