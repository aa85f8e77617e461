//! Server entry point (spec §6): `<program> <level_dir> <max_games>
//! <register_path>`. Exit code 0 on clean shutdown, 1 on startup error,
//! -1 on argument misuse.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;

use pacman_server::queue::ConnectionQueue;
use pacman_server::session::Session;
use pacman_server::{acceptor, signals, worker};

#[derive(Parser, Debug)]
#[command(name = "pacman-server", about = "Multi-client Pac-Man session server")]
struct Args {
    /// Directory containing `.lvl` level files.
    level_dir: PathBuf,

    /// Number of preallocated session workers.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    max_games: u32,

    /// Path of the rendezvous FIFO clients connect through.
    register_path: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(255); // spec §6's "-1" (u8 has no signed repr)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(args) {
        tracing::error!(error = %e, "startup failed");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> anyhow::Result<()> {
    signals::ignore_sigpipe()?;
    let dump_requested = signals::install_dump_signal()?;

    let register_path = args.register_path;
    if register_path.exists() {
        std::fs::remove_file(&register_path)?;
    }
    mkfifo(&register_path, Mode::from_bits_truncate(0o666))?;

    // Opening either end of a fresh FIFO blocks until the other end is
    // opened too, so opening both ends in sequence on this thread would
    // deadlock against itself. A background thread opens the dummy
    // writer and then parks forever, holding that handle open for the
    // process lifetime so the acceptor's read never observes EOF merely
    // because no client is currently connected (spec §7); its blocking
    // open is what unblocks the read-open below, and vice versa.
    let dummy_writer_path = register_path.clone();
    thread::Builder::new()
        .name("rendezvous-keepalive".to_string())
        .spawn(move || {
            let _writer: File = OpenOptions::new()
                .write(true)
                .open(&dummy_writer_path)
                .expect("open rendezvous FIFO for dummy write");
            loop {
                thread::park();
            }
        })?;
    let rendezvous_reader = OpenOptions::new().read(true).open(&register_path)?;

    let queue = Arc::new(ConnectionQueue::new());
    let level_dir = Arc::new(
        args.level_dir
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("level directory path is not valid UTF-8"))?
            .to_string(),
    );

    let sessions: Vec<Arc<Session>> = (0..args.max_games)
        .map(|_| Arc::new(Session::new()))
        .collect();

    for session in &sessions {
        let session = Arc::clone(session);
        let queue = Arc::clone(&queue);
        let level_dir = Arc::clone(&level_dir);
        thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || worker::run(session, queue, level_dir))?;
    }

    tracing::info!(max_games = args.max_games, level_dir = %level_dir, "server ready");
    acceptor::run(rendezvous_reader, &queue, &sessions, &dump_requested);

    Ok(())
}
