// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use serial_test::serial;
use telegraph_runtime::test_helpers::start_test;
use telegraph_runtime::types::CommError;
use telegraph_runtime::{Comm, launch};

#[test]
#[serial]
fn destination_out_of_range_is_fatal() {
    start_test();

    let outcome = launch(1, |comm: Comm<usize>| comm.send(comm.rank(), 5, 0));

    let error = outcome.unwrap_err();
    assert!(error.0.contains("out of range"), "{error}");
}

#[test]
#[serial]
fn source_out_of_range_is_fatal() {
    start_test();

    let outcome = launch(1, |comm: Comm<usize>| comm.recv(5, 0));

    let error = outcome.unwrap_err();
    assert!(error.0.contains("out of range"), "{error}");
}

#[test]
#[serial]
fn send_to_self_is_fatal() {
    start_test();

    let outcome = launch(1, |comm: Comm<usize>| comm.send(comm.rank(), 0, 0));

    let error = outcome.unwrap_err();
    assert!(error.0.contains("self"), "{error}");
}

#[test]
#[serial]
fn recv_from_terminated_partner_is_fatal() {
    start_test();

    // Rank 0 terminates without sending; rank 1's blocked recv must fail
    // rather than wait on a process that can no longer match it.
    let outcome = launch(2, |comm: Comm<usize>| {
        if comm.rank() == 1 {
            comm.recv(0, 0)?;
        }
        Ok(())
    });

    let error = outcome.unwrap_err();
    assert!(error.0.contains("terminated"), "{error}");
}

#[test]
#[serial]
fn send_to_terminated_partner_is_fatal() {
    start_test();

    let outcome = launch(2, |comm: Comm<usize>| {
        if comm.rank() == 1 {
            comm.send(comm.rank(), 0, 0)?;
        }
        Ok(())
    });

    let error = outcome.unwrap_err();
    assert!(error.0.contains("terminated"), "{error}");
}

#[test]
#[serial]
fn tag_mismatch_is_fatal() {
    start_test();

    let outcome = launch(2, |comm: Comm<usize>| {
        if comm.rank() == 0 {
            comm.send(comm.rank(), 1, 7)?;
            Ok(0)
        } else {
            comm.recv(0, 8)
        }
    });

    let error = outcome.unwrap_err();
    assert!(error.0.contains("tag mismatch"), "{error}");
}

#[test]
#[serial]
fn lowest_ranked_error_wins() {
    start_test();

    let outcome = launch::<usize, (), _>(3, |comm| {
        comm_failure(comm.rank())
    });

    let error = outcome.unwrap_err();
    assert!(error.0.contains("process 0 failed"), "{error}");
}

fn comm_failure(rank: usize) -> Result<(), CommError> {
    Err(CommError(format!("process {rank} failed")))
}

#[test]
#[serial]
fn panicked_process_is_reported() {
    start_test();

    let outcome = launch::<usize, (), _>(1, |_comm| panic!("no comms today"));

    let error = outcome.unwrap_err();
    assert!(error.0.contains("process 0 panicked"), "{error}");
}
