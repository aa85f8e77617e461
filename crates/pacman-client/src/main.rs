//! Client entry point (spec §6): `<program> <client_id> <register_path>
//! [commands_file]`. Rich terminal rendering is explicitly out of scope
//! (spec §1) — this prints each snapshot as a plain text grid.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;

use pacman_common::wire::{self, BoardFrame, OP_CONNECT_ACK};

#[derive(Parser, Debug)]
#[command(name = "pacman-client", about = "Pac-Man session client")]
struct Args {
    /// Numeric id embedded in this client's stream filenames.
    client_id: i32,

    /// Path of the server's rendezvous FIFO.
    register_path: PathBuf,

    /// Optional file of commands to play back instead of reading stdin.
    commands_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let req_path = format!("/tmp/{}_request", args.client_id);
    let notif_path = format!("/tmp/{}_notification", args.client_id);

    for path in [&req_path, &notif_path] {
        if std::path::Path::new(path).exists() {
            std::fs::remove_file(path)?;
        }
        mkfifo(path.as_str(), Mode::from_bits_truncate(0o666))?;
    }

    let mut rendezvous = OpenOptions::new().write(true).open(&args.register_path)?;
    wire::write_connect(
        &mut rendezvous,
        &wire::ConnectRequest {
            req_path: req_path.clone(),
            notif_path: notif_path.clone(),
        },
    )?;
    drop(rendezvous);

    // Open order matches the server worker's (req for read, then notif
    // for write) so neither side blocks waiting on the other.
    let req_stream = OpenOptions::new().write(true).open(&req_path)?;
    let mut notif_stream = OpenOptions::new().read(true).open(&notif_path)?;

    let opcode = wire::read_opcode(&mut notif_stream)?;
    anyhow::ensure!(opcode == OP_CONNECT_ACK, "expected CONNECT_ACK, got opcode {opcode}");
    let status = wire::read_connect_ack_payload(&mut notif_stream)?;
    anyhow::ensure!(status == 0, "server rejected connection (status {status})");
    println!("connected as client {}", args.client_id);

    let reader_handle = thread::Builder::new()
        .name("board-reader".to_string())
        .spawn(move || read_snapshots(notif_stream))?;

    send_commands(req_stream, args.commands_file)?;

    let _ = reader_handle.join();
    Ok(())
}

/// Reads BOARD frames until the stream closes, printing each as a grid.
fn read_snapshots(mut notif_stream: impl Read) {
    loop {
        let opcode = match wire::read_opcode(&mut notif_stream) {
            Ok(op) => op,
            Err(_) => return,
        };
        if opcode != wire::OP_BOARD {
            tracing::warn!(opcode, "unexpected opcode on notification stream");
            continue;
        }
        let frame = match wire::read_board_payload(&mut notif_stream) {
            Ok(frame) => frame,
            Err(_) => return,
        };
        render(&frame);
        if frame.victory || frame.game_over {
            return;
        }
    }
}

fn render(frame: &BoardFrame) {
    println!("--- points: {} ---", frame.points);
    for row in frame.cells.chunks(frame.width as usize) {
        println!("{}", String::from_utf8_lossy(row));
    }
    if frame.victory {
        println!("*** victory ***");
    }
    if frame.game_over {
        println!("*** game over ***");
    }
}

/// Sends PLAY/DISCONNECT frames sourced either from `commands_file`
/// (upper-cased, whitespace skipped, rewound at EOF) or from stdin.
fn send_commands(mut req_stream: File, commands_file: Option<PathBuf>) -> anyhow::Result<()> {
    match commands_file {
        Some(path) => send_from_file(&mut req_stream, &path),
        None => send_from_stdin(&mut req_stream, io::stdin().lock()),
    }
}

/// `'Q'` is a PLAY command like any other (spec §4.4.1's command-reader
/// treats it as `OP_PLAY` + `'Q'`, per spec §8 scenario 5) — never
/// `OP_DISCONNECT`, which carries a different latch meaning on the server
/// (`disconnected=1` vs. the driver's own `game_over=1` on `QUIT_GAME`).
fn send_from_file<W: Write>(req_stream: &mut W, path: &PathBuf) -> anyhow::Result<()> {
    loop {
        let contents = std::fs::read_to_string(path)?;
        for ch in contents.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let cmd = ch.to_ascii_uppercase() as u8;
            wire::write_play(req_stream, cmd)?;
            if cmd == b'Q' {
                return Ok(());
            }
        }
        // rewind at EOF: the file is re-read from the top (spec §6)
    }
}

fn send_from_stdin<R: BufRead, W: Write>(req_stream: &mut W, input: R) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        for ch in line.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let cmd = ch.to_ascii_uppercase() as u8;
            wire::write_play(req_stream, cmd)?;
            if cmd == b'Q' {
                return Ok(());
            }
        }
    }
    wire::write_disconnect(req_stream)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// An in-memory `Write` target shared across threads, for driving
    /// `send_from_file`'s rewind loop from outside.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Decodes a flat byte buffer of PLAY/DISCONNECT frames into opcodes
    /// paired with a command byte (0 for DISCONNECT, which has no payload).
    fn decode_frames(bytes: &[u8]) -> Vec<(u8, u8)> {
        let mut cursor = Cursor::new(bytes);
        let mut frames = Vec::new();
        while let Ok(opcode) = wire::read_opcode(&mut cursor) {
            match opcode {
                wire::OP_PLAY => {
                    let cmd = wire::read_play_payload(&mut cursor).unwrap();
                    frames.push((opcode, cmd));
                }
                wire::OP_DISCONNECT => frames.push((opcode, 0)),
                other => panic!("unexpected opcode {other} in frame stream"),
            }
        }
        frames
    }

    #[test]
    fn quit_command_sends_play_not_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.txt");
        std::fs::write(&path, "dq").unwrap();

        let mut buf = Vec::new();
        send_from_file(&mut buf, &path).unwrap();

        let frames = decode_frames(&buf);
        assert_eq!(frames, vec![(wire::OP_PLAY, b'D'), (wire::OP_PLAY, b'Q')]);
    }

    #[test]
    fn whitespace_is_skipped_and_commands_are_upper_cased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.txt");
        std::fs::write(&path, " d \n a \t q ").unwrap();

        let mut buf = Vec::new();
        send_from_file(&mut buf, &path).unwrap();

        let frames = decode_frames(&buf);
        assert_eq!(
            frames,
            vec![(wire::OP_PLAY, b'D'), (wire::OP_PLAY, b'A'), (wire::OP_PLAY, b'Q')]
        );
    }

    #[test]
    fn send_from_file_rewinds_at_eof_until_quit_appears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commands.txt");
        std::fs::write(&path, "a").unwrap();

        let shared = SharedBuf::default();
        let mut writer = shared.clone();
        let handle = thread::spawn(move || send_from_file(&mut writer, &path));

        // give the file-reader loop time to pass over the no-'Q' content
        // at least once before rewriting it with a quit command
        thread::sleep(Duration::from_millis(30));
        std::fs::write(dir.path().join("commands.txt"), "q").unwrap();

        handle.join().unwrap().unwrap();

        let frames = decode_frames(&shared.0.lock().unwrap());
        assert_eq!(frames.last(), Some(&(wire::OP_PLAY, b'Q')));
        assert!(
            frames.iter().filter(|f| *f == &(wire::OP_PLAY, b'A')).count() >= 1,
            "expected at least one rewound pass over the original content, got {frames:?}"
        );
        assert!(!frames.contains(&(wire::OP_DISCONNECT, 0)));
    }

    #[test]
    fn stdin_eof_without_quit_sends_trailing_disconnect() {
        let mut buf = Vec::new();
        send_from_stdin(&mut buf, Cursor::new(&b"d a\n"[..])).unwrap();

        let frames = decode_frames(&buf);
        assert_eq!(
            frames,
            vec![
                (wire::OP_PLAY, b'D'),
                (wire::OP_PLAY, b'A'),
                (wire::OP_DISCONNECT, 0)
            ]
        );
    }

    #[test]
    fn stdin_quit_sends_play_not_disconnect() {
        let mut buf = Vec::new();
        send_from_stdin(&mut buf, Cursor::new(&b"d q\n"[..])).unwrap();

        let frames = decode_frames(&buf);
        assert_eq!(frames, vec![(wire::OP_PLAY, b'D'), (wire::OP_PLAY, b'Q')]);
    }
}
