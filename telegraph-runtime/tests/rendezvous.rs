// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::thread;
use std::time::Duration;

use serial_test::serial;
use telegraph_runtime::test_helpers::{run_with_deadline, start_test};
use telegraph_runtime::{Comm, CommError, World, launch};

/// Short deadline for runs that are expected to still be blocked when it
/// expires.
const SHORT_DEADLINE: Duration = Duration::from_millis(500);

#[test]
#[serial]
fn rank_and_size_visible_everywhere() {
    start_test();

    let seen = launch::<usize, _, _>(3, |comm| Ok((comm.rank(), comm.size()))).unwrap();

    assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3)]);
}

#[test]
#[serial]
fn world_reports_its_size() {
    start_test();

    let world: World<usize> = World::new(4);
    assert_eq!(world.size(), 4);

    let outcomes = world.launch(|comm| Ok(comm.rank())).unwrap();
    assert_eq!(outcomes, vec![0, 1, 2, 3]);
}

#[test]
#[serial]
fn outcomes_returned_in_rank_order() {
    start_test();

    let outcomes = launch::<usize, _, _>(5, |comm| Ok(comm.rank() * 10)).unwrap();

    assert_eq!(outcomes, vec![0, 10, 20, 30, 40]);
}

#[test]
#[serial]
fn matched_send_and_recv_exchange_payloads() {
    start_test();

    let received = launch(2, |comm| {
        let partner = 1 - comm.rank();
        if comm.rank() == 0 {
            comm.send(comm.rank(), partner, 0)?;
            comm.recv(partner, 0)
        } else {
            let value = comm.recv(partner, 0)?;
            comm.send(comm.rank(), partner, 0)?;
            Ok(value)
        }
    })
    .unwrap();

    assert_eq!(received, vec![1, 0]);
}

#[test]
#[serial]
fn delivery_ordered_within_a_link() {
    start_test();

    let received = launch(2, |comm| {
        if comm.rank() == 0 {
            for value in [10, 20, 30] {
                comm.send(value, 1, 0)?;
            }
            Ok(Vec::new())
        } else {
            let mut values = Vec::new();
            for _ in 0..3 {
                values.push(comm.recv(0, 0)?);
            }
            Ok(values)
        }
    })
    .unwrap();

    assert_eq!(received[1], vec![10, 20, 30]);
}

#[test]
#[serial]
fn send_blocks_until_matching_recv() {
    start_test();

    // Rank 1 never posts a receive but stays alive, so rank 0's send can
    // neither complete nor fail: the whole world is still running when the
    // deadline expires.
    let outcome = run_with_deadline(SHORT_DEADLINE, || {
        launch(2, |comm: Comm<usize>| {
            if comm.rank() == 0 {
                comm.send(comm.rank(), 1, 0)?;
            } else {
                thread::sleep(Duration::from_secs(3600));
            }
            Ok(())
        })
    });

    assert!(outcome.is_none());
}

#[test]
#[serial]
fn deadline_returns_result_when_work_finishes() {
    start_test();

    let outcome = run_with_deadline(SHORT_DEADLINE, || 17);

    assert_eq!(outcome, Some(17));
}

#[test]
#[serial]
fn counters_track_completed_operations() {
    start_test();

    let counts = launch(2, |comm| {
        let partner = 1 - comm.rank();
        if comm.rank() == 0 {
            comm.send(comm.rank(), partner, 0)?;
            comm.send(comm.rank(), partner, 0)?;
        } else {
            comm.recv(partner, 0)?;
            comm.recv(partner, 0)?;
        }
        Ok::<_, CommError>((comm.num_sent(), comm.num_received()))
    })
    .unwrap();

    assert_eq!(counts, vec![(2, 0), (0, 2)]);
}
