//! The session worker of spec §4.3: one thread per reusable `Session`
//! slot, looping dequeue → open streams → ack → play → reset.

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use pacman_board::{is_level_file, load_level, unload_level, Board};
use pacman_common::wire::{self, ConnectRequest};

use crate::queue::ConnectionQueue;
use crate::session::{Outcome, Session};
use crate::tick;

/// Scan a path's basename for the first run of decimal digits; `-1` if
/// none is found (spec §4.3 step 2).
fn derive_client_id(req_path: &str) -> i32 {
    let basename = req_path.rsplit('/').next().unwrap_or(req_path);
    let mut digits = String::new();
    for ch in basename.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if !digits.is_empty() {
            break;
        }
    }
    digits.parse().unwrap_or(-1)
}

/// Runs the worker's outer loop forever (spec §4.3). Intended to run on
/// its own thread, one per preallocated `Session`.
pub fn run(session: Arc<Session>, queue: Arc<ConnectionQueue>, level_dir: Arc<String>) {
    loop {
        let Ok(req) = queue.dequeue() else {
            return;
        };

        let client_id = derive_client_id(&req.req_path);
        let span = tracing::info_span!("session", client_id);
        let _enter = span.enter();

        if !accept_connection(&session, &req, client_id) {
            session.reset_streams();
            continue;
        }

        play_all_levels(&session, level_dir.as_str());

        session.reset_streams();
    }
}

/// Opens both streams and exchanges the CONNECT_ACK handshake (spec §4.3
/// steps 3–5). Returns whether the session is now ready to play.
fn accept_connection(session: &Arc<Session>, req: &ConnectRequest, client_id: i32) -> bool {
    let req_stream = OpenOptions::new().read(true).open(&req.req_path);
    let notif_stream = OpenOptions::new().write(true).open(&req.notif_path);

    let (req_stream, mut notif_stream) = match (req_stream, notif_stream) {
        (Ok(r), Ok(n)) => (r, n),
        (Ok(_), Err(_)) => {
            tracing::warn!(path = %req.notif_path, "failed to open notification stream");
            return false;
        }
        (Err(_), Ok(mut n)) => {
            tracing::warn!(path = %req.req_path, "failed to open request stream");
            let _ = wire::write_connect_ack(&mut n, 1);
            return false;
        }
        (Err(_), Err(_)) => {
            tracing::warn!("failed to open both streams");
            return false;
        }
    };

    if wire::write_connect_ack(&mut notif_stream, 0).is_err() {
        tracing::warn!("failed to write connect-success ack");
        return false;
    }

    *session.req_stream.lock() = Some(req_stream);
    *session.notif_stream.lock() = Some(notif_stream);
    session.latch.lock().reset_for_new_game(client_id);
    true
}

/// The per-session game driver of spec §4.4, steps a–f. Unload of a
/// cleared level is deferred until the *next* level has been loaded, so
/// the just-finished board stays readable for a terminal snapshot
/// (spec §4.4c) — the exception is QUIT_GAME and the final level, which
/// have no next level to wait for.
fn play_all_levels(session: &Arc<Session>, level_dir: &str) {
    let mut accumulated_points = 0;
    let mut pending_unload: Option<Arc<Board>> = None;

    let mut entries: Vec<_> = match fs::read_dir(level_dir) {
        Ok(dir) => dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_str().is_some_and(is_level_file))
            .collect(),
        Err(e) => {
            tracing::warn!(dir = %level_dir, error = %e, "failed to read level directory");
            return;
        }
    };
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().into_string().unwrap_or_default();

        {
            let mut latch = session.latch.lock();
            latch.victory = false;
            latch.game_over = false;
        }

        let board = match load_level(&name, level_dir, accumulated_points) {
            Ok(board) => Arc::new(board),
            Err(e) => {
                tracing::warn!(level = %name, error = %e, "failed to load level, aborting game");
                return;
            }
        };

        *session.board.lock() = None;
        if let Some(prev) = pending_unload.take() {
            unload_level_owned(prev);
        }
        *session.board.lock() = Some(Arc::clone(&board));

        let outcome = tick::run_level(session, &board);

        match outcome {
            Outcome::NextLevel => {
                accumulated_points = board.state.read().pacman.points;
                pending_unload = Some(board);
            }
            Outcome::QuitGame => {
                session.latch.lock().game_over = true;
                *session.board.lock() = None;
                unload_level_owned(board);
                return;
            }
        }
    }

    session.latch.lock().victory = true;
    if let Some(board) = pending_unload.take() {
        publish_final_snapshot(session, &board);
        *session.board.lock() = None;
        unload_level_owned(board);
    }
}

fn unload_level_owned(board: Arc<Board>) {
    match Arc::try_unwrap(board) {
        Ok(board) => unload_level(board),
        Err(board) => tracing::debug!(level = %board.level_name, "board still shared, dropping reference only"),
    }
}

fn publish_final_snapshot(session: &Arc<Session>, board: &Arc<Board>) {
    let (cells, points) = {
        let state = board.state.read();
        (pacman_board::Board::snapshot_cells(&state), state.pacman.points)
    };
    let frame = wire::BoardFrame {
        width: board.width,
        height: board.height,
        tempo: board.tempo,
        victory: true,
        game_over: session.latch.lock().game_over,
        points,
        cells,
    };
    if let Some(stream) = session.notif_stream.lock().as_mut() {
        let _ = wire::write_board(stream, &frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_client_id_from_basename() {
        assert_eq!(derive_client_id("/tmp/42_request"), 42);
        assert_eq!(derive_client_id("/tmp/client7_request"), 7);
    }

    #[test]
    fn falls_back_to_negative_one_without_digits() {
        assert_eq!(derive_client_id("/tmp/client_request"), -1);
    }

    #[test]
    fn uses_first_digit_run_only() {
        assert_eq!(derive_client_id("/tmp/12a34_request"), 12);
    }
}
