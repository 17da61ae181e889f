// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Have processes pair up and exchange their rank numbers.
//!
//! Adjacent processes form the pairs (0,1), (2,3), ... and each member
//! sends its own rank to its partner while receiving the partner's rank
//! in return. The two blocking calls are ordered asymmetrically: odd
//! ranks send then receive while even ranks receive then send, so within
//! every pair one send is always free to proceed and the exchange
//! completes. Compare `demos/pair-deadlock`, where the symmetric ordering
//! hangs.
//!
//! The `main.rs` in this folder shows how it is launched.
//!
//! # Exercise
//!
//! - Run with `--num-processes` set to 4, 6, 8 and 10.
//! - Use the source code to trace execution.
//! - Explain what each process sends, receives and outputs.
//! - Run with `--num-processes 5`. What happens?

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

/// Exchange rank numbers with this process's partner.
///
/// The asymmetry between the parities is the whole point: the even
/// member's receive matches the odd member's immediate send, then the
/// even member's send matches the odd member's receive. No process ever
/// waits on an action contingent on its own further progress.
pub fn exchange(comm: &Comm<usize>) -> Result<Exchange, CommError> {
    let rank = comm.rank();
    let partner = partner_of(rank);

    let received = if odd(rank) {
        // Odd processes send to their 'left' neighbour, then receive
        comm.send(rank, partner, EXCHANGE_TAG)?;
        comm.recv(partner, EXCHANGE_TAG)?
    } else {
        // Even processes receive from their 'right' neighbour, then send
        let received = comm.recv(partner, EXCHANGE_TAG)?;
        comm.send(rank, partner, EXCHANGE_TAG)?;
        received
    };

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
    Exchanged(Vec<Exchange>),
}

/// Launch `size` processes and have each exchange rank numbers with its
/// partner, printing one report line per process.
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
