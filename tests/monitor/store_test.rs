/*!
 * Process Store Tests
 */

use pretty_assertions::assert_eq;
use process_monitor::core::ManualClock;
use process_monitor::monitor::{ProcessStatus, ProcessStore};
use std::sync::Arc;
use std::time::Duration;

fn store(capacity: usize) -> (Arc<ProcessStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let store = ProcessStore::builder()
        .with_capacity(capacity)
        .with_clock(clock.clone())
        .build();
    (Arc::new(store), clock)
}

#[test]
fn test_start_start_exit_scenario() {
    let (store, _) = store(100);
    store.record_start(100, 1, "a");
    store.record_start(101, 1, "b");
    store.record_exit(100, 0);

    let snap = store.snapshot();
    assert_eq!((snap.created, snap.exited, snap.current), (2, 1, 1));

    let rows: Vec<_> = store
        .list(50)
        .records
        .iter()
        .map(|r| (r.pid, r.status, r.exit_code))
        .collect();
    assert_eq!(
        rows,
        vec![
            (100, ProcessStatus::Exited, 0),
            (101, ProcessStatus::Running, 0)
        ]
    );
}

#[test]
fn test_capacity_two_evicts_oldest() {
    let (store, _) = store(2);
    store.record_start(1, 0, "A");
    store.record_start(2, 0, "B");
    store.record_start(3, 0, "C");

    let names: Vec<String> = store
        .list(50)
        .records
        .iter()
        .map(|r| r.name.to_string())
        .collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(store.lookup(1).is_none());
    assert_eq!(store.len(), 2);
    assert!(store.is_consistent());
}

#[test]
fn test_pid_reuse_retires_newest() {
    let (store, clock) = store(10);
    store.record_start(7, 1, "first");
    clock.advance(Duration::from_secs(1));
    store.record_start(7, 1, "second");

    assert_eq!(store.lookup(7).map(|r| r.name.to_string()), Some("second".into()));

    store.record_exit(7, 9);
    let records = store.list(10).records;
    assert_eq!(records[0].status, ProcessStatus::Running);
    assert_eq!(records[1].status, ProcessStatus::Exited);
    assert_eq!(records[1].exit_code, 9);

    // The older record becomes the live one again
    assert_eq!(store.lookup(7).map(|r| r.name.to_string()), Some("first".into()));
    assert!(store.is_consistent());
}

#[test]
fn test_second_exit_is_ignored() {
    let (store, _) = store(10);
    store.record_start(5, 1, "x");
    store.record_exit(5, 0);
    store.record_exit(5, 1);

    let snap = store.snapshot();
    assert_eq!(snap.exited, 1);
    assert_eq!(store.list(10).records[0].exit_code, 0);
}

#[test]
fn test_clear_keeps_statistics() {
    let (store, _) = store(10);
    store.record_start(1, 0, "a");
    store.record_start(2, 0, "b");
    store.record_exit(1, 0);
    store.clear();

    let snap = store.snapshot();
    assert_eq!(snap.records_in_memory, 0);
    assert_eq!((snap.created, snap.exited), (2, 1));

    // Records are gone, so a late exit has nothing to retire
    store.record_exit(2, 0);
    assert_eq!(store.snapshot().exited, 1);
    assert!(store.is_consistent());
}

#[test]
fn test_reset_statistics_keeps_records() {
    let (store, _) = store(10);
    store.record_start(1, 0, "a");
    store.record_start(2, 0, "b");
    store.reset_statistics();

    let snap = store.snapshot();
    assert_eq!((snap.created, snap.exited, snap.current, snap.peak), (0, 0, 0, 0));
    assert_eq!(snap.records_in_memory, 2);
    assert_eq!(snap.min_lifetime(), Duration::ZERO);
}

#[test]
fn test_lifetimes_three_five_four() {
    let (store, clock) = store(10);
    for (pid, secs) in [(1, 3), (2, 5), (3, 4)] {
        store.record_start(pid, 0, "job");
        clock.advance(Duration::from_secs(secs));
        store.record_exit(pid, 0);
    }

    let snap = store.snapshot();
    assert_eq!(snap.avg_lifetime().as_secs(), 4);
    assert_eq!(snap.min_lifetime().as_secs(), 3);
    assert_eq!(snap.max_lifetime().as_secs(), 5);
}

#[test]
fn test_recent_returns_newest_oldest_first() {
    let (store, _) = store(10);
    for pid in 1..=6 {
        store.record_start(pid, 0, "r");
    }

    let pids: Vec<_> = store.list_recent(3).records.iter().map(|r| r.pid).collect();
    assert_eq!(pids, vec![4, 5, 6]);
}

#[test]
fn test_turnover_rate() {
    let (store, clock) = store(10);
    for pid in 1..=4 {
        store.record_start(pid, 0, "t");
        store.record_exit(pid, 0);
    }
    assert_eq!(store.snapshot().turnover_rate(), None);

    clock.advance(Duration::from_secs(2));
    assert_eq!(store.snapshot().turnover_rate(), Some(2));
}
