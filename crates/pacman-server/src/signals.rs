//! Signal handling of spec §4.5/§5: `SIGUSR1` requests a top-scores dump,
//! `SIGPIPE` must not kill the process on a write to a client that has
//! gone away.
//!
//! Unlike the C reference (spec §5's "install only on the acceptor
//! thread, mask it on all others"), `signal_hook::iterator::Signals`
//! already runs its own dedicated background thread that performs the
//! actual `sigwait`-style delivery and hands the signal number to us
//! through a self-pipe; no other thread ever observes it, so there is
//! nothing left to mask.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::{SIGPIPE, SIGUSR1};
use signal_hook::iterator::Signals;

/// Spawns the background thread that turns `SIGUSR1` into a flag the
/// acceptor polls between frames, and returns that flag.
pub fn install_dump_signal() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([SIGUSR1])?;
    let thread_flag = Arc::clone(&flag);
    thread::Builder::new()
        .name("signal-usr1".to_string())
        .spawn(move || {
            for _ in signals.forever() {
                thread_flag.store(true, Ordering::SeqCst);
            }
        })?;
    Ok(flag)
}

/// Prevents a write to a gone-away client from terminating the process.
pub fn ignore_sigpipe() -> anyhow::Result<()> {
    unsafe {
        signal_hook::low_level::register(SIGPIPE, || {})?;
    }
    Ok(())
}
