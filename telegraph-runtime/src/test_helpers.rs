// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module provides helper functions for testing worlds of processes
//!
//! The aim of this module is to provide commonly-used functions for tests
//! that launch whole worlds: bringing the logger up, and observing runs
//! that may legitimately never finish.
//!
//! *Note:* all tests using these helpers should be run in a
//! [serial](https://docs.rs/serial_test) manner because the logger
//! involves shared global state that will otherwise give unpredictable
//! results.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, bounded};
use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// A generous deadline for liveness checks.
///
/// Long enough that a healthy world of a handful of processes has
/// finished orders of magnitude earlier; a run still going after this is
/// treated as hung.
pub const DEADLINE: Duration = Duration::from_secs(5);

/// Initialise the logging system for tests
///
/// Installs a stdout logger at `Trace` level with timestamps, locations,
/// thread and target information all switched off, so test logs read the
/// same as the binaries' `--stdout` output. The global logger can only be
/// installed once per test binary, so a second call is a no-op.
pub fn start_test() {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = SimpleLogger::init(LevelFilter::Trace, config);
}

/// Run `f` on a worker thread and wait at most `deadline` for its result.
///
/// Returns `Some(result)` if `f` finished in time and `None` if the
/// deadline expired, in which case the worker is abandoned, still blocked,
/// and cleaned up when the test process exits. This is how a test observes
/// "hangs forever" without hanging the suite: for the deadlock patternlet
/// `None` is the expected, passing outcome.
///
/// # Panics
///
/// Panics if the worker thread itself panicked.
pub fn run_with_deadline<F, R>(deadline: Duration, f: F) -> Option<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = bounded(1);
    thread::Builder::new()
        .name("deadline-worker".to_string())
        .spawn(move || {
            let _ = tx.send(f());
        })
        .unwrap();

    match rx.recv_timeout(deadline) {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => panic!("deadline worker panicked"),
    }
}
