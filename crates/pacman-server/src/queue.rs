//! The bounded connection queue of spec §4.1: single-producer (the
//! acceptor)/multi-consumer (the session workers) FIFO of pending
//! `ConnectRequest`s, blocking the producer on full and each consumer on
//! empty.
//!
//! Grounded on the teacher's `net_queue.rs`, which already reaches for a
//! `crossbeam_channel::bounded` channel to decouple a producer thread from
//! consumers. That queue uses `try_send`-drops-on-full semantics, which
//! fits UDP packets; ours must never drop a `ConnectRequest`, so `enqueue`
//! uses the blocking `send` instead — a bounded MPMC channel already gives
//! the two-semaphore-plus-mutex contract of spec §4.1 for free.

use crossbeam::channel::{bounded, Receiver, RecvError, SendError, Sender};
use pacman_common::limits::MAX_PENDING_CLIENTS;
use pacman_common::wire::ConnectRequest;

pub struct ConnectionQueue {
    sender: Sender<ConnectRequest>,
    receiver: Receiver<ConnectRequest>,
}

impl ConnectionQueue {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PENDING_CLIENTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        ConnectionQueue { sender, receiver }
    }

    /// Blocks until a free slot exists, then enqueues `req` and wakes one
    /// consumer. Only returns an error if every consumer has dropped.
    pub fn enqueue(&self, req: ConnectRequest) -> Result<(), SendError<ConnectRequest>> {
        self.sender.send(req)
    }

    /// Blocks until a request is available, then removes the oldest
    /// (FIFO) and wakes one producer. Only returns an error if the
    /// producer has dropped and the queue is drained.
    pub fn dequeue(&self) -> Result<ConnectRequest, RecvError> {
        self.receiver.recv()
    }

    /// Number of requests currently queued (for diagnostics/tests only —
    /// not part of the blocking contract).
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for ConnectionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConnectionQueue {
    fn clone(&self) -> Self {
        ConnectionQueue {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
        }
    }
}
