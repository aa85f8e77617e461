//! The board data model of spec §3: `Position`, `Pacman`, `Ghost`, `Board`.
//!
//! The reference design uses only the board-level reader/writer lock; the
//! per-cell mutex the data model reserves is an optimization hook left to
//! implementers, and is deliberately not built here (spec §3, §9).

use parking_lot::RwLock;

/// What currently occupies a cell. `Pacman`/`Ghost` are transient overlays;
/// `has_dot`/`has_portal` describe the terrain underneath and survive a
/// pacman or ghost passing through (except dot pickup, which clears it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Empty,
    Wall,
    Pacman,
    Ghost,
}

#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub content: Content,
    pub has_dot: bool,
    pub has_portal: bool,
}

impl Position {
    pub fn wall() -> Self {
        Position {
            content: Content::Wall,
            has_dot: false,
            has_portal: false,
        }
    }

    pub fn empty() -> Self {
        Position {
            content: Content::Empty,
            has_dot: false,
            has_portal: false,
        }
    }

    /// The byte a snapshot uses for this cell, per spec §4.4.3 / §6.
    pub fn to_cell_byte(self) -> u8 {
        match self.content {
            Content::Wall => b'#',
            Content::Pacman => b'C',
            Content::Ghost => b'M',
            Content::Empty if self.has_portal => b'@',
            Content::Empty if self.has_dot => b'.',
            Content::Empty => b' ',
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pacman {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    pub points: i32,
    /// Number of ticks to wait before the first action (spec §3 `step_offset`).
    pub step_offset: u32,
    /// Scripted moves; empty means commands come live from the client.
    pub moves: Vec<u8>,
    pub current_move: usize,
    pub waiting: u32,
}

impl Pacman {
    pub fn n_moves(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub x: i32,
    pub y: i32,
    pub step_offset: u32,
    /// Nonempty, cycled modulo length.
    pub moves: Vec<u8>,
    pub current_move: usize,
    /// Reserved for gameplay extension; never dispatched on (spec §9).
    pub charged: bool,
    pub waiting: u32,
}

impl Ghost {
    pub fn n_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn next_move(&mut self) -> u8 {
        let cmd = self.moves[self.current_move % self.moves.len()];
        self.current_move = self.current_move.wrapping_add(1);
        cmd
    }
}

/// All state mutated during a level's lifetime, behind the board's
/// reader/writer lock.
#[derive(Debug)]
pub struct BoardState {
    pub cells: Vec<Position>,
    pub pacman: Pacman,
    pub ghosts: Vec<Ghost>,
}

/// A loaded level. `width`/`height`/`tempo`/`level_name`/`dirname` are fixed
/// for the lifetime of the board and need no locking; everything else lives
/// under `state`.
#[derive(Debug)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub tempo: i32,
    pub level_name: String,
    pub dirname: String,
    pub state: RwLock<BoardState>,
}

impl Board {
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }

    /// Copy the cell content grid into a byte buffer for a snapshot. Caller
    /// must already hold at least a read lock on `state`.
    pub fn snapshot_cells(state: &BoardState) -> Vec<u8> {
        state.cells.iter().map(|p| p.to_cell_byte()).collect()
    }
}
