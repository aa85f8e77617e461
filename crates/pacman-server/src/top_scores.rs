//! The top-scores dumper of spec §4.5: snapshots every bound session's
//! score and writes a ranked `top5.txt`, best-effort.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::session::Session;

pub const TOP_SCORES_FILENAME: &str = "top5.txt";

/// Snapshot every session's `(client_id, points)`, sort descending by
/// points with ties broken by ascending client id, truncate to 5, and
/// write them to `path`. Silently drops the dump if the file can't be
/// opened or a write fails (spec §4.5/§7 — operational aid, never part of
/// game correctness).
pub fn dump_top_scores_to(sessions: &[std::sync::Arc<Session>], path: &Path) {
    let mut scores: Vec<(i32, i32)> = Vec::new();

    for session in sessions {
        let client_id = {
            let latch = session.latch.lock();
            let bound = latch.is_bound()
                && session.req_stream.lock().is_some()
                && session.notif_stream.lock().is_some();
            if !bound {
                continue;
            }
            latch.client_id
        };
        let points = {
            let board_guard = session.board.lock();
            match board_guard.as_ref() {
                Some(board) => board.state.read().pacman.points,
                None => continue,
            }
        };
        scores.push((client_id, points));
    }

    scores.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scores.truncate(5);

    let mut file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "failed to open top-scores file, dropping dump");
            return;
        }
    };
    for (client_id, points) in scores {
        if writeln!(file, "{client_id} {points}").is_err() {
            tracing::warn!("failed mid-write to top-scores file, dropping remainder");
            return;
        }
    }
}

/// Dump to `top5.txt` in the current working directory (spec §4.5/§6).
pub fn dump_top_scores(sessions: &[std::sync::Arc<Session>]) {
    dump_top_scores_to(sessions, Path::new(TOP_SCORES_FILENAME));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacman_board::{Board, BoardState, Content, Pacman, Position};
    use parking_lot::RwLock;
    use std::sync::Arc;

    fn bound_session(client_id: i32, points: i32) -> Arc<Session> {
        let session = Arc::new(Session::new());
        {
            let mut latch = session.latch.lock();
            latch.client_id = client_id;
            latch.disconnected = false;
        }
        *session.req_stream.lock() = Some(tempfile::tempfile().unwrap());
        *session.notif_stream.lock() = Some(tempfile::tempfile().unwrap());
        let board = Board {
            width: 1,
            height: 1,
            tempo: 100,
            level_name: "t.lvl".into(),
            dirname: ".".into(),
            state: RwLock::new(BoardState {
                cells: vec![Position {
                    content: Content::Pacman,
                    has_dot: false,
                    has_portal: false,
                }],
                pacman: Pacman {
                    x: 0,
                    y: 0,
                    alive: true,
                    points,
                    step_offset: 0,
                    moves: vec![],
                    current_move: 0,
                    waiting: 0,
                },
                ghosts: vec![],
            }),
        };
        *session.board.lock() = Some(Arc::new(board));
        session
    }

    #[test]
    fn ties_break_by_ascending_client_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top5.txt");

        let sessions = vec![bound_session(9, 10), bound_session(3, 10)];
        dump_top_scores_to(&sessions, &path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "3 10\n9 10\n");
    }

    #[test]
    fn no_bound_sessions_produces_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top5.txt");

        dump_top_scores_to(&[], &path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "");
    }

    #[test]
    fn truncates_to_five() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top5.txt");

        let sessions: Vec<_> = (0..8).map(|i| bound_session(i, 100 - i)).collect();
        dump_top_scores_to(&sessions, &path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 5);
    }

    #[test]
    fn unbound_session_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top5.txt");

        let bound = bound_session(1, 50);
        let unbound = Arc::new(Session::new());
        dump_top_scores_to(&[bound, unbound], &path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1 50\n");
    }
}
