// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! World construction and process launch.
//!
//! A [`World`] wires the full link fabric up front: one duplex rendezvous
//! link for every unordered pair of ranks. [`World::launch`] then runs one
//! closure per rank, each on its own named OS thread with exclusive
//! ownership of that rank's [`Comm`], and joins them all. The thread
//! launcher plays the role `mpirun -np N` plays for a real
//! distributed-memory program.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use log::{debug, trace};

use crate::comm::{Comm, Envelope};
use crate::comm_error;
use crate::types::{CommError, Payload};

/// The full set of processes for one run.
pub struct World<T>
where
    T: Payload,
{
    comms: Vec<Comm<T>>,
}

impl<T> World<T>
where
    T: Payload,
{
    /// Wire the link fabric for `size` processes.
    ///
    /// Every link is a zero-capacity channel, so a send on it cannot
    /// complete until the matching receive is in progress. That rendezvous
    /// property is load-bearing: it is what the deadlock patternlet
    /// demonstrates and the corrected one avoids.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut links_out: Vec<Vec<Option<_>>> = (0..size)
            .map(|_| (0..size).map(|_| None).collect())
            .collect();
        let mut links_in: Vec<Vec<Option<_>>> = (0..size)
            .map(|_| (0..size).map(|_| None).collect())
            .collect();

        for from in 0..size {
            for to in 0..size {
                if from != to {
                    let (tx, rx) = bounded::<Envelope<T>>(0);
                    links_out[from][to] = Some(tx);
                    links_in[to][from] = Some(rx);
                }
            }
        }

        let comms = links_out
            .into_iter()
            .zip(links_in)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| Comm::new(rank, size, outgoing, incoming))
            .collect();
        debug!("world: fabric wired for {size} processes");

        Self { comms }
    }

    /// The number of processes in this world.
    #[must_use]
    pub fn size(&self) -> usize {
        self.comms.len()
    }

    /// Run `f` once per rank, each call on its own thread, and join them
    /// all.
    ///
    /// Each thread is named after its rank (`p0`, `p1`, ...) and owns that
    /// rank's [`Comm`]; dropping it on return closes the process's links,
    /// which is how a partner still blocked on this process learns it has
    /// terminated. Join order is rank order and the outcomes are returned
    /// in rank order. If any process fails, the error from the
    /// lowest-ranked failing process is returned; a panicked process is
    /// reported as a failure of that rank.
    ///
    /// This call does not return while any process is still blocked, so a
    /// deadlocked world hangs the caller. Bounding the observation time is
    /// the caller's job; see
    /// [`test_helpers::run_with_deadline`](crate::test_helpers::run_with_deadline).
    pub fn launch<R, F>(self, f: F) -> Result<Vec<R>, CommError>
    where
        R: Send + 'static,
        F: Fn(Comm<T>) -> Result<R, CommError> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let mut handles = Vec::with_capacity(self.comms.len());
        for comm in self.comms {
            let f = Arc::clone(&f);
            let name = format!("p{}", comm.rank());
            let handle = match thread::Builder::new().name(name).spawn(move || f(comm)) {
                Ok(handle) => handle,
                Err(e) => comm_error!(format!("failed to spawn process thread: {e}")),
            };
            handles.push(handle);
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for (rank, handle) in handles.into_iter().enumerate() {
            trace!("world: joining p{rank}");
            match handle.join() {
                Ok(Ok(outcome)) => outcomes.push(outcome),
                Ok(Err(e)) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(_) => {
                    if first_error.is_none() {
                        first_error = Some(CommError(format!("process {rank} panicked")));
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outcomes),
        }
    }
}

/// Wire a world of `size` processes and launch `f` on every rank.
///
/// Convenience wrapper around [`World::new`] plus [`World::launch`].
pub fn launch<T, R, F>(size: usize, f: F) -> Result<Vec<R>, CommError>
where
    T: Payload,
    R: Send + 'static,
    F: Fn(Comm<T>) -> Result<R, CommError> + Send + Sync + 'static,
{
    World::new(size).launch(f)
}
