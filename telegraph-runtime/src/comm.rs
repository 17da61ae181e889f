// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The per-process communication handle.
//!
//! A [`Comm`] is the only thing a process owns: its rank, the size of its
//! world and its endpoints of the rendezvous links to every other rank.
//! Processes share nothing else, which is what makes the patternlets built
//! on top of this runtime honest models of distributed-memory programs.

use std::cell::Cell;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};

use crate::comm_error;
use crate::types::{CommError, CommResult, Payload, Rank, Tag};

/// A tagged payload travelling on a link. The source rank is implied by
/// the link the envelope arrives on.
pub(crate) struct Envelope<T> {
    pub(crate) tag: Tag,
    pub(crate) payload: T,
}

/// One process's handle onto the world.
///
/// Every communication operation blocks: [`send`](Comm::send) does not
/// return until the destination's matching [`recv`](Comm::recv) is in
/// progress, and `recv` does not return until an envelope arrives. There
/// is no timeout and no cancellation; a call with no matching partner
/// waits forever.
pub struct Comm<T>
where
    T: Payload,
{
    rank: Rank,
    size: usize,

    /// Hierarchical name used in diagnostics, e.g. `world::p3`.
    name: String,

    /// Sending endpoints of the links to every other rank, indexed by
    /// destination. `None` at this process's own index.
    links_out: Vec<Option<Sender<Envelope<T>>>>,

    /// Receiving endpoints of the links from every other rank, indexed by
    /// source. `None` at this process's own index.
    links_in: Vec<Option<Receiver<Envelope<T>>>>,

    num_sent: Cell<usize>,
    num_received: Cell<usize>,
}

impl<T> Comm<T>
where
    T: Payload,
{
    pub(crate) fn new(
        rank: Rank,
        size: usize,
        links_out: Vec<Option<Sender<Envelope<T>>>>,
        links_in: Vec<Option<Receiver<Envelope<T>>>>,
    ) -> Self {
        Self {
            rank,
            size,
            name: format!("world::p{rank}"),
            links_out,
            links_in,
            num_sent: Cell::new(0),
            num_received: Cell::new(0),
        }
    }

    /// This process's identity, stable for the run.
    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The total number of processes in the world, identical across all of
    /// them.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of sends this process has completed.
    #[must_use]
    pub fn num_sent(&self) -> usize {
        self.num_sent.get()
    }

    /// The number of receives this process has completed.
    #[must_use]
    pub fn num_received(&self) -> usize {
        self.num_received.get()
    }

    /// Send `value` to `destination`, blocking until the destination's
    /// matching [`recv`](Comm::recv) takes the envelope.
    ///
    /// Fails if `destination` is out of range or names this process, or if
    /// the destination process has already terminated and can no longer
    /// match the send.
    pub fn send(&self, value: T, destination: Rank, tag: Tag) -> CommResult {
        let link = self.link_to(destination)?;
        trace!("{}: sending to p{destination} with tag {tag}", self.name);
        if link.send(Envelope { tag, payload: value }).is_err() {
            return comm_error!(format!(
                "{}: process {destination} terminated before matching the send",
                self.name
            ));
        }
        self.num_sent.set(self.num_sent.get() + 1);
        debug!("{}: send to p{destination} complete", self.name);
        Ok(())
    }

    /// Receive the next envelope from `source`, blocking until it arrives.
    ///
    /// Fails if `source` is out of range or names this process, if the
    /// source process has already terminated without sending, or if the
    /// arriving envelope's tag does not match `tag`.
    pub fn recv(&self, source: Rank, tag: Tag) -> Result<T, CommError> {
        let link = self.link_from(source)?;
        trace!("{}: receiving from p{source} with tag {tag}", self.name);
        let envelope = match link.recv() {
            Ok(envelope) => envelope,
            Err(_) => comm_error!(format!(
                "{}: process {source} terminated before sending",
                self.name
            )),
        };
        if envelope.tag != tag {
            return comm_error!(format!(
                "{}: tag mismatch on receive from p{source}: wanted {tag}, got {}",
                self.name, envelope.tag
            ));
        }
        self.num_received.set(self.num_received.get() + 1);
        debug!("{}: receive from p{source} complete", self.name);
        Ok(envelope.payload)
    }

    fn link_to(&self, destination: Rank) -> Result<&Sender<Envelope<T>>, CommError> {
        if destination >= self.size {
            return comm_error!(format!(
                "{}: destination p{destination} is out of range for a world of size {}",
                self.name, self.size
            ));
        }
        match &self.links_out[destination] {
            Some(link) => Ok(link),
            None => comm_error!(format!("{}: cannot send to self", self.name)),
        }
    }

    fn link_from(&self, source: Rank) -> Result<&Receiver<Envelope<T>>, CommError> {
        if source >= self.size {
            return comm_error!(format!(
                "{}: source p{source} is out of range for a world of size {}",
                self.name, self.size
            ));
        }
        match &self.links_in[source] {
            Some(link) => Ok(link),
            None => comm_error!(format!("{}: cannot receive from self", self.name)),
        }
    }
}
