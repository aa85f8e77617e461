//! Level file loading (spec §4.4, §6). The wire format is intentionally
//! simple plain text — spec §6 calls the level file opaque to this
//! specification, so the exact grammar is a Design Decision (see
//! DESIGN.md), not a contract any other module depends on.
//!
//! ```text
//! TEMPO 250
//! #####
//! #P. #
//! #. G#
//! #####
//! PACMAN 0
//! GHOST 0 dsaw
//! ```
//!
//! Grid rows come right after the `TEMPO` line and run until a blank line,
//! EOF, or a `PACMAN`/`GHOST` line. `#` wall, `.` dot, `@` portal, `P`
//! pacman start, `G` ghost start (one per marker, in row-major order), ` `
//! empty. `PACMAN <step_offset> [moves]` seeds the pacman's scripted move
//! list (omit `moves` for live client commands). `GHOST <step_offset>
//! <moves>` is required, one per `G` marker, in the order they appear.

use std::fs;
use std::path::Path;

use crate::board::{Board, BoardState, Content, Ghost, Pacman, Position};
use crate::error::BoardError;

struct ParsedLevel {
    tempo: i32,
    cells: Vec<Position>,
    width: usize,
    height: usize,
    pacman_pos: Option<(i32, i32)>,
    ghost_positions: Vec<(i32, i32)>,
    pacman_descriptor: Option<(u32, Vec<u8>)>,
    ghost_descriptors: Vec<(u32, Vec<u8>)>,
}

fn parse_descriptor_line(
    name: &str,
    line: &str,
    level_name: &str,
) -> Result<(u32, Vec<u8>), BoardError> {
    let rest = line[name.len()..].trim();
    let mut parts = rest.split_whitespace();
    let step_offset: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| BoardError::MalformedDescriptor(level_name.into(), line.into()))?;
    let moves = parts.next().map(|s| s.bytes().collect()).unwrap_or_default();
    Ok((step_offset, moves))
}

fn parse(contents: &str, level_name: &str) -> Result<ParsedLevel, BoardError> {
    let mut lines = contents.lines();

    let tempo_line = lines
        .next()
        .ok_or_else(|| BoardError::EmptyLevel(level_name.into()))?;
    let tempo: i32 = tempo_line
        .strip_prefix("TEMPO ")
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| BoardError::MalformedDescriptor(level_name.into(), tempo_line.into()))?;

    let mut rows: Vec<&str> = Vec::new();
    let mut remainder: Vec<&str> = Vec::new();
    for line in lines {
        if line.is_empty() || line.starts_with("PACMAN") || line.starts_with("GHOST") {
            if !line.is_empty() {
                remainder.push(line);
            }
            break;
        }
        rows.push(line);
    }
    remainder.extend(lines);

    if rows.is_empty() {
        return Err(BoardError::EmptyLevel(level_name.into()));
    }
    let width = rows[0].chars().count();
    let height = rows.len();

    let mut cells = Vec::with_capacity(width * height);
    let mut pacman_pos = None;
    let mut ghost_positions = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let row_width = row.chars().count();
        if row_width != width {
            return Err(BoardError::RaggedRow(level_name.into(), width, row_width));
        }
        for (x, ch) in row.chars().enumerate() {
            let pos = match ch {
                '#' => Position::wall(),
                '.' => Position {
                    has_dot: true,
                    ..Position::empty()
                },
                '@' => Position {
                    has_portal: true,
                    ..Position::empty()
                },
                'P' => {
                    pacman_pos = Some((x as i32, y as i32));
                    Position::empty()
                }
                'G' => {
                    ghost_positions.push((x as i32, y as i32));
                    Position::empty()
                }
                _ => Position::empty(),
            };
            cells.push(pos);
        }
    }

    let mut pacman_descriptor = None;
    let mut ghost_descriptors = Vec::new();
    for line in remainder {
        if let Some(rest) = line.strip_prefix("PACMAN") {
            let _ = rest;
            pacman_descriptor = Some(parse_descriptor_line("PACMAN", line, level_name)?);
        } else if line.starts_with("GHOST") {
            ghost_descriptors.push(parse_descriptor_line("GHOST", line, level_name)?);
        }
    }

    Ok(ParsedLevel {
        tempo,
        cells,
        width,
        height,
        pacman_pos,
        ghost_positions,
        pacman_descriptor,
        ghost_descriptors,
    })
}

/// Load `<dirname>/<filename>` into a fresh `Board`, seeding
/// `pacman.points` from `accumulated_points` (spec §4.4b).
pub fn load_level(
    filename: &str,
    dirname: &str,
    accumulated_points: i32,
) -> Result<Board, BoardError> {
    let path = Path::new(dirname).join(filename);
    let contents = fs::read_to_string(&path)?;
    let parsed = parse(&contents, filename)?;

    let Some((px, py)) = parsed.pacman_pos else {
        return Err(BoardError::MissingPacman(filename.into()));
    };
    if parsed.ghost_descriptors.len() != parsed.ghost_positions.len() {
        return Err(BoardError::MalformedDescriptor(
            filename.into(),
            format!(
                "{} ghost markers but {} GHOST descriptor lines",
                parsed.ghost_positions.len(),
                parsed.ghost_descriptors.len()
            ),
        ));
    }
    for (step_offset_and_moves, _) in parsed.ghost_descriptors.iter().zip(&parsed.ghost_positions) {
        if step_offset_and_moves.1.is_empty() {
            return Err(BoardError::GhostWithoutMoves(filename.into()));
        }
    }

    let pacman_idx = (py * parsed.width as i32 + px) as usize;
    let mut cells = parsed.cells;
    cells[pacman_idx].content = Content::Pacman;

    let (pacman_step_offset, pacman_moves) = parsed.pacman_descriptor.unwrap_or((0, Vec::new()));
    let pacman = Pacman {
        x: px,
        y: py,
        alive: true,
        points: accumulated_points,
        step_offset: pacman_step_offset,
        moves: pacman_moves,
        current_move: 0,
        waiting: 0,
    };

    let mut ghosts = Vec::with_capacity(parsed.ghost_positions.len());
    for ((gx, gy), (step_offset, moves)) in parsed
        .ghost_positions
        .iter()
        .zip(parsed.ghost_descriptors.into_iter())
    {
        let idx = (*gy * parsed.width as i32 + *gx) as usize;
        cells[idx].content = Content::Ghost;
        ghosts.push(Ghost {
            x: *gx,
            y: *gy,
            step_offset,
            moves,
            current_move: 0,
            charged: false,
            waiting: 0,
        });
    }

    Ok(Board {
        width: parsed.width as i32,
        height: parsed.height as i32,
        tempo: parsed.tempo,
        level_name: filename.to_string(),
        dirname: dirname.to_string(),
        state: parking_lot::RwLock::new(BoardState {
            cells,
            pacman,
            ghosts,
        }),
    })
}

/// Unload a board. The reference design has nothing to release beyond
/// dropping the value; this exists so call sites mirror spec §4.4's
/// "unload exactly once per successful load on every exit path" discipline
/// with an explicit call site instead of relying on an implicit `Drop`.
pub fn unload_level(board: Board) {
    tracing::debug!(level = %board.level_name, "unloading level");
    drop(board);
}

/// Names level files are filtered by: does not start with `.`, ends in
/// `.lvl` (spec §4.4, §6).
pub fn is_level_file(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(".lvl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_level(dir: &tempfile::TempDir, name: &str, contents: &str) {
        let mut f = fs::File::create(dir.path().join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_a_simple_level() {
        let dir = tempfile::tempdir().unwrap();
        write_level(
            &dir,
            "one.lvl",
            "TEMPO 250\n#####\n#P. #\n#. G#\n#####\nPACMAN 0\nGHOST 0 dsaw\n",
        );
        let board = load_level("one.lvl", dir.path().to_str().unwrap(), 10).unwrap();
        assert_eq!(board.width, 5);
        assert_eq!(board.height, 4);
        assert_eq!(board.tempo, 250);
        let state = board.state.read();
        assert_eq!(state.pacman.points, 10);
        assert_eq!(state.ghosts.len(), 1);
        assert_eq!(state.ghosts[0].moves, b"dsaw".to_vec());
    }

    #[test]
    fn missing_pacman_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_level(&dir, "bad.lvl", "TEMPO 250\n###\n# #\n###\n");
        let err = load_level("bad.lvl", dir.path().to_str().unwrap(), 0).unwrap_err();
        assert!(matches!(err, BoardError::MissingPacman(_)));
    }

    #[test]
    fn ghost_without_moves_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_level(
            &dir,
            "bad.lvl",
            "TEMPO 250\n#####\n#P  #\n#  G#\n#####\nGHOST 0\n",
        );
        let err = load_level("bad.lvl", dir.path().to_str().unwrap(), 0).unwrap_err();
        assert!(matches!(err, BoardError::GhostWithoutMoves(_)));
    }

    #[test]
    fn filters_level_filenames() {
        assert!(is_level_file("one.lvl"));
        assert!(!is_level_file(".hidden.lvl"));
        assert!(!is_level_file("readme.txt"));
    }
}
