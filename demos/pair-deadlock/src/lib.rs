// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Show how blocking send and receive ordering can lead to deadlock.
//!
//! Adjacent processes form the pairs (0,1), (2,3), ... and each member
//! tries to send its own rank to its partner while receiving the
//! partner's rank in return, exactly as in `demos/pair-exchange`. The one
//! difference is that here *both* members of every pair receive first and
//! send second. Under rendezvous semantics each receive blocks until the
//! partner sends, and each partner's send is postponed behind its own
//! blocked receive: a circular wait. Every valid run hangs; that is the
//! program's purpose.
//!
//! The `main.rs` in this folder shows how it is launched.
//!
//! # Exercise
//!
//! - Run with `--num-processes 1`, then `2`. (Use Ctrl-C to terminate.)
//! - Use the source code to trace execution.
//! - Why does this fail?

use telegraph_runtime::types::{CommError, Rank, Tag};
use telegraph_runtime::{Comm, launch};

/// The tag carried by every message; the patternlet only ever has one
/// message in flight per direction.
const EXCHANGE_TAG: Tag = 0;

/// Guidance printed by rank 0 when the process count cannot be paired up.
pub const USAGE: &str =
    "Please run this program using --num-processes N where N is positive and even.";

/// What one process saw during its exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub rank: Rank,
    pub sent: usize,
    pub received: usize,
}

/// The report line a process prints after its exchange, e.g.
/// `Process 0 sent '0' and received '1'`.
#[must_use]
pub fn report_line(exchange: &Exchange) -> String {
    format!(
        "Process {} sent '{}' and received '{}'",
        exchange.rank, exchange.sent, exchange.received
    )
}

/// The partner a process exchanges with: odd ranks pair with their left
/// neighbour, even ranks with their right.
#[must_use]
pub fn partner_of(rank: Rank) -> Rank {
    if odd(rank) { rank - 1 } else { rank + 1 }
}

fn odd(rank: Rank) -> bool {
    rank % 2 != 0
}

/// Whether a world of `size` processes can pair up at all.
#[must_use]
pub fn can_pair(size: usize) -> bool {
    size > 1 && size % 2 == 0
}

/// Try to exchange rank numbers with this process's partner.
///
/// Both parities receive before sending, so every process blocks waiting
/// for a message whose send its partner only issues after that partner's
/// own blocking receive returns. Nothing below ever runs to completion in
/// a valid world.
pub fn exchange(comm: &Comm<usize>) -> Result<Exchange, CommError> {
    let rank = comm.rank();
    let partner = partner_of(rank);

    // Both parities receive from their partner first, then send: the
    // symmetric ordering is the bug on display.
    let received = comm.recv(partner, EXCHANGE_TAG)?;
    comm.send(rank, partner, EXCHANGE_TAG)?;

    Ok(Exchange {
        rank,
        sent: rank,
        received,
    })
}

/// The outcome of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The precondition check failed: rank 0 printed the usage guidance
    /// and no communication was attempted.
    Guided,
    /// Every process completed its exchange; entries are in rank order.
    /// Unreachable for a pairable size: the run deadlocks first.
    Exchanged(Vec<Exchange>),
}

/// Launch `size` processes and have each try to exchange rank numbers
/// with its partner.
///
/// For any pairable size this call never returns; callers that need to
/// observe the hang should bound it with
/// [`test_helpers::run_with_deadline`](telegraph_runtime::test_helpers::run_with_deadline).
pub fn run(size: usize) -> Result<Outcome, CommError> {
    // With no processes at all there is no rank 0 to print the guidance.
    if size == 0 {
        println!("\n{USAGE}\n");
        return Ok(Outcome::Guided);
    }

    let outcomes = launch(size, |comm| {
        if !can_pair(comm.size()) {
            if comm.rank() == 0 {
                println!("\n{USAGE}\n");
            }
            return Ok(None);
        }

        let exchange = exchange(&comm)?;
        println!("{}", report_line(&exchange));
        Ok(Some(exchange))
    })?;

    Ok(match outcomes.into_iter().collect::<Option<Vec<_>>>() {
        Some(exchanges) => Outcome::Exchanged(exchanges),
        None => Outcome::Guided,
    })
}
