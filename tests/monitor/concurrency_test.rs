/*!
 * Concurrency and Invariant Tests
 */

use process_monitor::monitor::{ChannelSource, ProcessStore};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_parallel_start_exit_keeps_invariants() {
    let store = Arc::new(ProcessStore::builder().with_capacity(256).build());
    let threads = 8;
    let per_thread = 500u32;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                let base = t * 10_000;
                for i in 0..per_thread {
                    store.record_start(base + i, t, "worker");
                    if i % 2 == 0 {
                        store.record_exit(base + i, 0);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snap = store.snapshot();
    assert_eq!(snap.created, u64::from(threads * per_thread));
    assert_eq!(snap.current, snap.created - snap.exited);
    assert!(snap.records_in_memory <= 256);
    assert!(store.is_consistent());
}

#[test]
fn test_nothing_commits_after_stop_returns() {
    let store = Arc::new(ProcessStore::builder().with_capacity(128).build());
    let running = Arc::new(AtomicBool::new(true));

    let writer = {
        let store = store.clone();
        let running = running.clone();
        thread::spawn(move || {
            let mut pid = 0u32;
            while running.load(Ordering::Relaxed) {
                pid = pid.wrapping_add(1);
                store.record_start(pid, 1, "w");
                store.record_exit(pid, 0);
            }
        })
    };

    while store.snapshot().created < 100 {
        thread::yield_now();
    }
    store.set_monitoring(false);
    let frozen = store.snapshot();

    for _ in 0..1_000 {
        thread::yield_now();
    }
    running.store(false, Ordering::Relaxed);
    writer.join().unwrap();

    let after = store.snapshot();
    assert_eq!(after.created, frozen.created);
    assert_eq!(after.exited, frozen.exited);
    assert!(store.is_consistent());
}

#[test]
fn test_clear_racing_inserts() {
    let store = Arc::new(ProcessStore::builder().with_capacity(64).build());

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for pid in 0..5_000 {
                store.record_start(pid, 1, "w");
                store.record_exit(pid, 0);
            }
        })
    };
    let clearer = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                store.clear();
                let _ = store.list(16);
            }
        })
    };

    writer.join().unwrap();
    clearer.join().unwrap();

    assert!(store.is_consistent());
    assert!(store.len() <= 64);
}

#[test]
fn test_channel_source_from_many_producers() {
    let store = Arc::new(ProcessStore::new());
    let source = ChannelSource::with_capacity(store.clone(), 100_000).unwrap();

    let producers: Vec<_> = (0..4u32)
        .map(|t| {
            let sender = source.sender();
            thread::spawn(move || {
                for i in 0..100 {
                    sender.on_start(t * 1000 + i, t, "p");
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    assert_eq!(source.shutdown(), 400);
    assert_eq!(store.snapshot().created, 400);
}

#[derive(Debug, Clone)]
enum Op {
    Start(u32),
    Exit(u32),
    Clear,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..16).prop_map(Op::Start),
        4 => (0u32..16).prop_map(Op::Exit),
        1 => Just(Op::Clear),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn prop_counters_balance(ops in prop::collection::vec(op(), 1..200), capacity in 1usize..8) {
        let store = ProcessStore::builder().with_capacity(capacity).build();

        for op in ops {
            match op {
                Op::Start(pid) => {
                    store.record_start(pid, 0, "p");
                }
                Op::Exit(pid) => store.record_exit(pid, 0),
                Op::Clear => store.clear(),
                Op::Reset => store.reset_statistics(),
            }

            let snap = store.snapshot();
            prop_assert_eq!(snap.current, snap.created - snap.exited);
            prop_assert!(snap.peak >= snap.current);
            prop_assert!(snap.records_in_memory <= capacity);
            prop_assert!(store.is_consistent());
        }
    }
}
