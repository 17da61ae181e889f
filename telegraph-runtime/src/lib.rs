// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `Telegraph` - a rendezvous message-passing runtime for patternlets
//!
//! This library provides the messaging runtime underneath the Telegraph
//! patternlets: a fixed-size [world](crate::world::World) of processes
//! that share no state and interact only through blocking point-to-point
//! [send and receive](crate::comm::Comm) calls. Processes are simulated
//! with one OS thread per rank and every link is a zero-capacity channel,
//! so `send` and `recv` are true rendezvous operations: neither returns
//! until the partner's matching call is in progress, and a call with no
//! matching partner waits forever.
//!
//! That last property is deliberate. The patternlets built on this
//! runtime teach the classic blocking send/receive ordering pitfall, and
//! a runtime that buffered sends or timed out would quietly hide the
//! deadlock they exist to demonstrate.
//!
//! # Examples
//!
//! Make sure you look at the **demos/** folder which includes
//! worked/documented examples. The current demos are:
//!  - **demos/pair-exchange**: processes pair up and exchange their rank
//!    numbers, ordering their calls so the exchange completes.
//!  - **demos/pair-deadlock**: the same exchange with both members of
//!    every pair receiving first, which deadlocks by construction.
//!
//! # Simple Application
//!
//! A very simple application would look like:
//!
//! ```rust
//! use telegraph_runtime::launch;
//!
//! let received = launch(2, |comm| {
//!     let partner = 1 - comm.rank();
//!     if comm.rank() == 0 {
//!         comm.send(comm.rank(), partner, 0)?;
//!         comm.recv(partner, 0)
//!     } else {
//!         let value = comm.recv(partner, 0)?;
//!         comm.send(comm.rank(), partner, 0)?;
//!         Ok(value)
//!     }
//! })
//! .unwrap();
//! assert_eq!(received, vec![1, 0]);
//! ```
//!
//! Note the asymmetry: rank 0 sends first while rank 1 receives first.
//! Launching the symmetric version, with both ranks receiving before
//! sending, never returns.

pub mod comm;
pub mod test_helpers;
pub mod types;
pub mod world;

pub use comm::Comm;
pub use types::{CommError, CommResult, Payload, Rank, Tag};
pub use world::{World, launch};
