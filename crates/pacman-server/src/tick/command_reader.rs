//! The command-reader actor of spec §4.4.1.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pacman_board::{move_pacman, Board, MoveOutcome};
use pacman_common::wire::{self, OP_DISCONNECT, OP_PLAY};

use crate::session::{Outcome, Session};

/// Runs until it can determine the level's terminal outcome. Holds no
/// locks across the sleep or the stream read; takes the board write lock
/// only for the duration of one `move_pacman` call.
pub fn run(session: &Arc<Session>, board: &Arc<Board>) -> Outcome {
    let step_offset = board.state.read().pacman.step_offset;
    let delay = Duration::from_millis((board.tempo as u64) * (1 + step_offset as u64));

    loop {
        thread::sleep(delay);

        let opcode = {
            let mut guard = session.req_stream.lock();
            let Some(stream) = guard.as_mut() else {
                return disconnect(session);
            };
            wire::read_opcode(stream)
        };

        let opcode = match opcode {
            Ok(op) => op,
            Err(_) => return disconnect(session),
        };

        match opcode {
            OP_DISCONNECT => return disconnect(session),
            OP_PLAY => {
                let cmd = {
                    let mut guard = session.req_stream.lock();
                    let Some(stream) = guard.as_mut() else {
                        return disconnect(session);
                    };
                    wire::read_play_payload(stream)
                };
                let cmd = match cmd {
                    Ok(c) => c,
                    Err(_) => return disconnect(session),
                };

                if cmd == b'G' {
                    // reserved, never dispatched on (spec §9)
                    continue;
                }
                if cmd == b'Q' {
                    return Outcome::QuitGame;
                }

                {
                    let mut latch = session.latch.lock();
                    latch.last_cmd = cmd;
                    latch.has_cmd = true;
                }

                match move_pacman(board, cmd) {
                    MoveOutcome::ReachedPortal => return Outcome::NextLevel,
                    MoveOutcome::DeadPacman => return Outcome::QuitGame,
                    MoveOutcome::ValidMove | MoveOutcome::InvalidMove => continue,
                }
            }
            _ => {
                tracing::warn!(opcode, "unknown opcode on request stream, skipping");
                continue;
            }
        }
    }
}

fn disconnect(session: &Arc<Session>) -> Outcome {
    session.latch.lock().disconnected = true;
    Outcome::QuitGame
}
