/*!
 * Front-End Tests
 */

use pretty_assertions::assert_eq;
use process_monitor::frontend::{Frontend, Reply};
use process_monitor::monitor::{ChannelSource, MonitorController, ProcessStore};
use process_monitor::{CommandError, ListResult};
use std::sync::Arc;

fn setup() -> (Frontend, Arc<ProcessStore>) {
    let store = Arc::new(ProcessStore::builder().with_capacity(32).build());
    let frontend = Frontend::new(MonitorController::new(store.clone()), 2);
    (frontend, store)
}

fn run(frontend: &Frontend, line: &str) -> String {
    match frontend.execute_line(line) {
        Ok(Reply::Text(text)) => text,
        other => panic!("{line}: {other:?}"),
    }
}

#[test]
fn test_processes_report_uses_default_limit() {
    let (fe, _) = setup();
    for pid in 1..=3 {
        run(&fe, &format!("fork {pid} 1 job"));
    }

    let text = run(&fe, "processes");
    assert!(text.contains("showing first 2 matching records"));
    assert!(text.contains("Total matching records: 3"));

    let text = run(&fe, "processes 10");
    assert!(!text.contains("showing first"));
}

#[test]
fn test_filter_commands_drive_listing() {
    let (fe, store) = setup();
    run(&fe, "fork 42 1 target");
    run(&fe, "fork 43 1 other");
    run(&fe, "pid 42");
    run(&fe, "enable");

    let filter = run(&fe, "filter");
    assert!(filter.contains("Filter Enabled: YES"));
    assert!(filter.contains("Target PID: 42"));
    assert_eq!(store.list(10).total_matched, 1);

    run(&fe, "reset");
    assert_eq!(store.list(10).total_matched, 2);
}

#[test]
fn test_control_commands() {
    let (fe, store) = setup();
    run(&fe, "stop");
    run(&fe, "fork 1 0 ignored");
    assert!(store.is_empty());
    assert!(run(&fe, "control").contains("Monitoring: DISABLED"));

    run(&fe, "start");
    run(&fe, "fork 1 0 kept");
    run(&fe, "clear");
    assert!(store.is_empty());
    assert_eq!(store.snapshot().created, 1);

    run(&fe, "reset_stats");
    assert_eq!(store.snapshot().created, 0);
}

#[test]
fn test_json_listing() {
    let (fe, _) = setup();
    run(&fe, "fork 9 1 jq");
    run(&fe, "exit 9 3");

    let parsed: ListResult = serde_json::from_str(&run(&fe, "json")).unwrap();
    assert_eq!(parsed.total_matched, 1);
    assert_eq!(parsed.records[0].exit_code, 3);
}

#[test]
fn test_malformed_lines_change_nothing() {
    let (fe, store) = setup();
    run(&fe, "minlife 5");

    for line in ["minlife five", "fork 1 x y", "exit 1", "recent 0", "stats all", "launch"] {
        assert!(fe.execute_line(line).is_err(), "{line}");
    }
    assert_eq!(store.filter().current().min_lifetime_secs, Some(5));
    assert!(store.is_empty());
    assert!(matches!(
        fe.execute_line("comm"),
        Err(CommandError::MissingArgument("comm"))
    ));
}

#[test]
fn test_events_through_channel_sink() {
    let store = Arc::new(ProcessStore::new());
    let source = ChannelSource::spawn(store.clone()).unwrap();
    let sink = Arc::new(source.sender());
    let fe = Frontend::new(MonitorController::new(store.clone()), 50).with_sink(sink.clone());

    run(&fe, "fork 5 1 piped");
    run(&fe, "exit 5 0");
    drop(fe);
    drop(sink);

    assert_eq!(source.shutdown(), 2);
    assert_eq!(store.snapshot().exited, 1);
}
