/*!
 * Filter Tests
 */

use pretty_assertions::assert_eq;
use process_monitor::core::ManualClock;
use process_monitor::monitor::{FilterConfig, FilterField, ProcessStore};
use process_monitor::FilterError;
use std::sync::Arc;
use std::time::Duration;

fn pids(store: &ProcessStore) -> Vec<u32> {
    store.list(50).records.iter().map(|r| r.pid).collect()
}

#[test]
fn test_pid_filter_enabled_and_disabled() {
    let store = ProcessStore::new();
    for pid in [40, 41, 42, 43] {
        store.record_start(pid, 1, "svc");
    }

    store.filter().set(FilterField::Pid, "42").unwrap();
    assert_eq!(pids(&store), vec![40, 41, 42, 43]);

    store.filter().enable();
    assert_eq!(pids(&store), vec![42]);

    store.filter().disable();
    assert_eq!(pids(&store).len(), 4);
}

#[test]
fn test_command_and_parent_filters_combine() {
    let store = ProcessStore::new();
    store.record_start(10, 1, "bash");
    store.record_start(11, 2, "bash");
    store.record_start(12, 1, "zsh");

    store
        .filter()
        .configure(FilterConfig::new().enabled().command("bash").parent_pid(1));
    assert_eq!(pids(&store), vec![10]);
}

#[test]
fn test_lifetime_window() {
    let clock = Arc::new(ManualClock::new());
    let store = ProcessStore::builder().with_clock(clock.clone()).build();

    for (pid, secs) in [(1, 1), (2, 3), (3, 10)] {
        store.record_start(pid, 0, "job");
        clock.advance(Duration::from_secs(secs));
        store.record_exit(pid, 0);
    }
    store.record_start(4, 0, "alive");

    store.filter().set(FilterField::MinLifetime, "2").unwrap();
    store.filter().set(FilterField::MaxLifetime, "5").unwrap();
    store.filter().enable();

    // Running records are not subject to lifetime bounds
    assert_eq!(pids(&store), vec![2, 4]);
}

#[test]
fn test_filter_does_not_change_statistics() {
    let store = ProcessStore::new();
    store.filter().configure(FilterConfig::new().enabled().pid(999));
    store.record_start(1, 0, "a");
    store.record_exit(1, 0);

    let snap = store.snapshot();
    assert_eq!((snap.created, snap.exited), (1, 1));
    assert_eq!(store.list(50).total_matched, 0);
}

#[test]
fn test_invalid_values_are_rejected() {
    let store = ProcessStore::new();
    let filter = store.filter();

    assert!(matches!(
        filter.set(FilterField::ParentPid, "one"),
        Err(FilterError::InvalidNumber { .. })
    ));
    assert_eq!(filter.set(FilterField::Command, "  "), Err(FilterError::EmptyCommand));
    assert_eq!(filter.current(), FilterConfig::default());
}

#[test]
fn test_typed_setters_drive_listing() {
    let clock = Arc::new(ManualClock::new());
    let store = ProcessStore::builder().with_clock(clock.clone()).build();
    for (pid, ppid, secs) in [(1, 10, 1), (2, 10, 4), (3, 20, 4)] {
        store.record_start(pid, ppid, "job");
        clock.advance(Duration::from_secs(secs));
        store.record_exit(pid, 0);
    }

    let filter = store.filter();
    filter.enable();
    filter.set_parent_pid(10);
    filter.set_min_lifetime(2);
    filter.set_max_lifetime(5);
    assert_eq!(pids(&store), vec![2]);

    filter.set_min_lifetime(0);
    assert_eq!(pids(&store), vec![1, 2]);

    filter.set_parent_pid(0);
    filter.set_max_lifetime(0);
    assert_eq!(pids(&store), vec![1, 2, 3]);
}
