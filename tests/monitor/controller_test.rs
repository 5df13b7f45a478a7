/*!
 * Controller Tests
 */

use pretty_assertions::assert_eq;
use process_monitor::monitor::{ControlCommand, MonitorController, ProcessStore};
use std::sync::Arc;

fn controller() -> MonitorController {
    MonitorController::new(Arc::new(ProcessStore::builder().with_capacity(4).build()))
}

#[test]
fn test_stopped_store_ignores_events() {
    let controller = controller();
    let store = controller.store().clone();

    store.record_start(1, 0, "a");
    controller.apply(ControlCommand::Stop);
    store.record_start(2, 0, "b");
    store.record_exit(1, 0);
    controller.apply(ControlCommand::Start);

    let snap = store.snapshot();
    assert_eq!((snap.created, snap.exited), (1, 0));
    assert!(store.lookup(1).is_some());
}

#[test]
fn test_clear_then_reset() {
    let controller = controller();
    let store = controller.store().clone();
    for pid in 1..=3 {
        store.record_start(pid, 0, "p");
    }

    controller.apply(ControlCommand::Clear);
    let status = controller.status();
    assert_eq!((status.records, status.capacity), (0, 4));
    assert_eq!(store.snapshot().created, 3);

    controller.apply(ControlCommand::ResetStatistics);
    assert_eq!(store.snapshot().created, 0);
}

#[test]
fn test_commands_are_idempotent() {
    let controller = controller();
    for command in [ControlCommand::Clear, ControlCommand::Clear] {
        controller.apply(command);
    }
    for command in [ControlCommand::ResetStatistics, ControlCommand::ResetStatistics] {
        controller.apply(command);
    }
    assert_eq!(controller.status().records, 0);
    assert!(controller.is_monitoring());
}
