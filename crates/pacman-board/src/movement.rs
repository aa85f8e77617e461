//! `move_pacman`/`move_ghost`/`kill_pacman` — the board movement rules
//! spec §1 treats as an external collaborator. Kept deliberately simple: a
//! bounded grid walk, wall blocks movement, portal ends the level, a
//! pacman/ghost collision kills pacman, dots award one point on pickup.

use crate::board::{Board, BoardState, Content};

/// Outcome of one movement call, per spec §3/§4.4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    ValidMove,
    InvalidMove,
    ReachedPortal,
    DeadPacman,
}

fn delta_for(cmd: u8) -> Option<(i32, i32)> {
    match cmd.to_ascii_lowercase() {
        b'w' => Some((0, -1)),
        b's' => Some((0, 1)),
        b'a' => Some((-1, 0)),
        b'd' => Some((1, 0)),
        _ => None,
    }
}

/// Move the single pacman on `board` one step per `cmd`. Takes the board
/// write lock for the duration of the call (spec §4.4.1's concurrency
/// guarantee).
pub fn move_pacman(board: &Board, cmd: u8) -> MoveOutcome {
    let Some((dx, dy)) = delta_for(cmd) else {
        return MoveOutcome::InvalidMove;
    };

    let mut state = board.state.write();
    let (old_x, old_y) = (state.pacman.x, state.pacman.y);
    let Some((new_x, new_y)) = step(board, old_x, old_y, dx, dy) else {
        return MoveOutcome::InvalidMove;
    };
    let new_idx = board.index(new_x, new_y).expect("step stays in bounds");

    match state.cells[new_idx].content {
        Content::Wall => MoveOutcome::InvalidMove,
        Content::Ghost => {
            state.pacman.alive = false;
            MoveOutcome::DeadPacman
        }
        Content::Empty | Content::Pacman => {
            apply_pacman_move(&mut state, board, old_x, old_y, new_x, new_y, new_idx)
        }
    }
}

fn step(board: &Board, x: i32, y: i32, dx: i32, dy: i32) -> Option<(i32, i32)> {
    let (nx, ny) = (x + dx, y + dy);
    board.index(nx, ny).map(|_| (nx, ny))
}

fn apply_pacman_move(
    state: &mut BoardState,
    board: &Board,
    old_x: i32,
    old_y: i32,
    new_x: i32,
    new_y: i32,
    new_idx: usize,
) -> MoveOutcome {
    let old_idx = board.index(old_x, old_y).expect("pacman starts in bounds");
    state.cells[old_idx].content = Content::Empty;

    let had_dot = state.cells[new_idx].has_dot;
    if had_dot {
        state.cells[new_idx].has_dot = false;
        state.pacman.points += 1;
    }
    let reached_portal = state.cells[new_idx].has_portal;

    state.cells[new_idx].content = Content::Pacman;
    state.pacman.x = new_x;
    state.pacman.y = new_y;

    if reached_portal {
        MoveOutcome::ReachedPortal
    } else {
        MoveOutcome::ValidMove
    }
}

/// Advance `ghosts[ghost_index]` by its next scripted move. Takes the board
/// write lock for the duration of the call (spec §4.4.2).
pub fn move_ghost(board: &Board, ghost_index: usize) -> MoveOutcome {
    let mut state = board.state.write();
    let cmd = state.ghosts[ghost_index].next_move();
    let Some((dx, dy)) = delta_for(cmd) else {
        return MoveOutcome::InvalidMove;
    };

    let (old_x, old_y) = (state.ghosts[ghost_index].x, state.ghosts[ghost_index].y);
    let Some((new_x, new_y)) = step(board, old_x, old_y, dx, dy) else {
        return MoveOutcome::InvalidMove;
    };
    let new_idx = board.index(new_x, new_y).expect("step stays in bounds");

    match state.cells[new_idx].content {
        Content::Wall | Content::Ghost => MoveOutcome::InvalidMove,
        Content::Pacman => {
            state.pacman.alive = false;
            let old_idx = board.index(old_x, old_y).expect("ghost starts in bounds");
            state.cells[old_idx].content = Content::Empty;
            state.cells[new_idx].content = Content::Ghost;
            state.ghosts[ghost_index].x = new_x;
            state.ghosts[ghost_index].y = new_y;
            MoveOutcome::DeadPacman
        }
        Content::Empty => {
            let old_idx = board.index(old_x, old_y).expect("ghost starts in bounds");
            state.cells[old_idx].content = Content::Empty;
            state.cells[new_idx].content = Content::Ghost;
            state.ghosts[ghost_index].x = new_x;
            state.ghosts[ghost_index].y = new_y;
            MoveOutcome::ValidMove
        }
    }
}

/// Mark pacman dead without moving it (used when a level must be aborted,
/// e.g. on resource exhaustion — spec §7).
pub fn kill_pacman(board: &Board) {
    board.state.write().pacman.alive = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, Pacman, Position};
    use parking_lot::RwLock;

    fn tiny_board() -> Board {
        // 2x2: walls around nothing, portal at (1,1), pacman at (0,0).
        let mut cells = vec![Position::empty(); 4];
        cells[3].has_portal = true; // (1,1)
        cells[0].content = Content::Pacman;
        Board {
            width: 2,
            height: 2,
            tempo: 100,
            level_name: "t.lvl".into(),
            dirname: ".".into(),
            state: RwLock::new(BoardState {
                cells,
                pacman: Pacman {
                    x: 0,
                    y: 0,
                    alive: true,
                    points: 0,
                    step_offset: 0,
                    moves: vec![],
                    current_move: 0,
                    waiting: 0,
                },
                ghosts: vec![],
            }),
        }
    }

    #[test]
    fn scenario_one_from_spec() {
        let board = tiny_board();
        assert_eq!(move_pacman(&board, b'd'), MoveOutcome::ValidMove);
        assert_eq!(move_pacman(&board, b's'), MoveOutcome::ReachedPortal);
        let state = board.state.read();
        assert_eq!((state.pacman.x, state.pacman.y), (1, 1));
    }

    #[test]
    fn wall_blocks_movement() {
        let board = tiny_board();
        board.state.write().cells[1].content = Content::Wall; // (1,0)
        assert_eq!(move_pacman(&board, b'd'), MoveOutcome::InvalidMove);
        let state = board.state.read();
        assert_eq!((state.pacman.x, state.pacman.y), (0, 0));
    }

    #[test]
    fn out_of_bounds_is_invalid() {
        let board = tiny_board();
        assert_eq!(move_pacman(&board, b'w'), MoveOutcome::InvalidMove);
        assert_eq!(move_pacman(&board, b'a'), MoveOutcome::InvalidMove);
    }

    #[test]
    fn ghost_onto_pacman_kills_it() {
        let board = tiny_board();
        board.state.write().ghosts.push(crate::board::Ghost {
            x: 1,
            y: 0,
            step_offset: 0,
            moves: vec![b'a'],
            current_move: 0,
            charged: false,
            waiting: 0,
        });
        board.state.write().cells[1].content = Content::Ghost;
        assert_eq!(move_ghost(&board, 0), MoveOutcome::DeadPacman);
        assert!(!board.state.read().pacman.alive);
    }

    #[test]
    fn dot_pickup_awards_one_point() {
        let board = tiny_board();
        board.state.write().cells[1].has_dot = true; // (1,0)
        assert_eq!(move_pacman(&board, b'd'), MoveOutcome::ValidMove);
        let state = board.state.read();
        assert_eq!(state.pacman.points, 1);
        assert!(!state.cells[1].has_dot);
    }

    #[test]
    fn g_command_never_reaches_move_pacman() {
        // the command-reader actor filters 'G' before calling move_pacman;
        // if it ever did reach here, it must be a no-op InvalidMove.
        let board = tiny_board();
        assert_eq!(move_pacman(&board, b'G'), MoveOutcome::InvalidMove);
        let state = board.state.read();
        assert_eq!((state.pacman.x, state.pacman.y), (0, 0));
    }
}
