use serde_json::json;
use storage::{KeyValueStore, MemoryStore};

use super::*;
use crate::{Severity, ViolationType};

fn stored_log(store: &MemoryStore, interview_id: &str) -> serde_json::Value {
    let raw = store.get(&proctoring_events_key(interview_id)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================
// parse_event_log / load_events
// =============================================================

#[test]
fn parse_corrupt_log_is_empty() {
    assert!(parse_event_log("{oops").is_empty());
    assert!(parse_event_log("{\"type\":\"TAB_BLUR\"}").is_empty());
}

#[test]
fn parse_drops_entries_missing_timestamp() {
    let raw = json!([
        { "type": "TAB_BLUR", "timestamp": 10 },
        { "type": "TAB_FOCUS" },
        { "timestamp": 30 },
        { "type": "WINDOW_BLUR", "timestamp": 40, "details": { "reason": "alt-tab" } },
    ])
    .to_string();
    let events = parse_event_log(&raw);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventType::TabBlur);
    assert_eq!(events[1].details.as_ref().unwrap()["reason"], "alt-tab");
}

#[test]
fn load_events_missing_key_is_empty() {
    let store = MemoryStore::new();
    assert!(load_events(&store, "none").is_empty());
}

// =============================================================
// EventRecorder
// =============================================================

#[test]
fn record_persists_full_log_under_interview_key() {
    let mut store = MemoryStore::new();
    let mut recorder = EventRecorder::open(&mut store, "iv-1");
    recorder.visibility_changed(true, 1_000).unwrap();
    recorder.visibility_changed(false, 3_000).unwrap();
    drop(recorder);

    let log = stored_log(&store, "iv-1");
    assert_eq!(
        log,
        json!([
            { "type": "TAB_BLUR", "timestamp": 1000 },
            { "type": "TAB_FOCUS", "timestamp": 3000 },
        ])
    );
}

#[test]
fn reopen_resumes_existing_log() {
    let mut store = MemoryStore::new();
    {
        let mut recorder = EventRecorder::open(&mut store, "iv-2");
        recorder.window_focus_changed(false, 100).unwrap();
    }
    let mut recorder = EventRecorder::open(&mut store, "iv-2");
    assert_eq!(recorder.events().len(), 1);
    recorder.window_focus_changed(true, 600).unwrap();

    let summary = recorder.summary(1_000);
    assert_eq!(summary.stats.window_switches.count, 1);
    assert_eq!(summary.stats.window_switches.total_time_away, 500);
}

#[test]
fn out_of_order_timestamps_are_clamped() {
    let mut recorder = EventRecorder::open(MemoryStore::new(), "iv-3");
    recorder.record(EventType::TabBlur, 5_000).unwrap();
    recorder.record(EventType::TabFocus, 4_000).unwrap();
    assert_eq!(recorder.events()[1].timestamp, 5_000);
    assert_eq!(recorder.summary(6_000).stats.tab_switches.total_time_away, 0);
}

#[test]
fn screen_share_transitions_deduplicate() {
    let mut recorder = EventRecorder::open(MemoryStore::new(), "iv-4");
    assert!(!recorder.is_screen_sharing());
    assert!(!recorder.screen_share_changed(false, 10).unwrap());
    assert!(recorder.screen_share_changed(true, 20).unwrap());
    assert!(!recorder.screen_share_changed(true, 30).unwrap());
    assert!(recorder.screen_share_changed(false, 40).unwrap());
    assert_eq!(recorder.events().len(), 2);

    let summary = recorder.summary(50);
    assert_eq!(summary.counts.screen_share_stop, 1);
    assert_eq!(summary.violations[0].kind, ViolationType::ScreenShareStop);
    assert_eq!(summary.violations[0].severity, Severity::High);
}

#[test]
fn reopen_restores_screen_share_state() {
    let mut store = MemoryStore::new();
    {
        let mut recorder = EventRecorder::open(&mut store, "iv-5");
        recorder.screen_share_changed(true, 10).unwrap();
    }
    let recorder = EventRecorder::open(&mut store, "iv-5");
    assert!(recorder.is_screen_sharing());
}

#[test]
fn record_with_details_round_trips() {
    let mut recorder = EventRecorder::open(MemoryStore::new(), "iv-6");
    let mut details = serde_json::Map::new();
    details.insert("source".into(), json!("visibilitychange"));
    recorder
        .record_with_details(EventType::TabBlur, 1, details)
        .unwrap();
    let store = recorder.into_store();
    let log = stored_log(&store, "iv-6");
    assert_eq!(log[0]["details"]["source"], "visibilitychange");
}
