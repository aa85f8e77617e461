//! The acceptor of spec §4.2: reads CONNECT frames off the rendezvous
//! stream in a loop, services a pending top-scores dump between frames,
//! and enqueues completed requests for the session workers.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pacman_common::wire::{self, OP_CONNECT};

use crate::queue::ConnectionQueue;
use crate::session::Session;
use crate::top_scores::dump_top_scores;

/// Runs until the rendezvous stream reports EOF or an unrecoverable
/// read error.
pub fn run<R: Read>(
    mut rendezvous: R,
    queue: &ConnectionQueue,
    sessions: &[Arc<Session>],
    dump_requested: &AtomicBool,
) {
    loop {
        if dump_requested.swap(false, Ordering::SeqCst) {
            tracing::info!("dumping top scores");
            dump_top_scores(sessions);
        }

        let opcode = match wire::read_opcode(&mut rendezvous) {
            Ok(op) => op,
            Err(_) => {
                tracing::info!("rendezvous stream closed, acceptor exiting");
                return;
            }
        };

        if opcode != OP_CONNECT {
            tracing::warn!(opcode, "unknown opcode on rendezvous stream, skipping");
            continue;
        }

        let req = match wire::read_connect_payload(&mut rendezvous) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "malformed CONNECT frame, acceptor exiting");
                return;
            }
        };

        tracing::debug!(req_path = %req.req_path, notif_path = %req.notif_path, "accepted connection");
        if queue.enqueue(req).is_err() {
            tracing::error!("all session workers gone, acceptor exiting");
            return;
        }
    }
}
