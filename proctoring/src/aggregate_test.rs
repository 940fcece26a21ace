use serde_json::json;

use super::*;

fn ev(kind: EventType, timestamp: i64) -> ProctoringEvent {
    ProctoringEvent::new(kind, timestamp)
}

const NOW: i64 = 1_700_000_100_000;

// =============================================================
// Pairing
// =============================================================

#[test]
fn empty_log_yields_empty_summary() {
    let summary = aggregate(&[], NOW);
    assert!(summary.violations.is_empty());
    assert_eq!(summary.stats, ProctoringStats::default());
    assert_eq!(summary.counts, ViolationCounts::default());
}

#[test]
fn matched_tab_switch_counts_without_violation() {
    let t0 = 1_700_000_000_000;
    let t1 = t0 + 4_500;
    let summary = aggregate(&[ev(EventType::TabBlur, t0), ev(EventType::TabFocus, t1)], NOW);

    assert_eq!(summary.stats.tab_switches.count, 1);
    assert_eq!(summary.stats.tab_switches.total_time_away, t1 - t0);
    assert_eq!(summary.counts.tab_switch, 0);
    assert!(summary.violations.iter().all(|v| v.kind != ViolationType::TabSwitch));
}

#[test]
fn unmatched_tab_blur_is_pending_violation() {
    let t0 = NOW - 12_000;
    let summary = aggregate(&[ev(EventType::TabBlur, t0)], NOW);

    assert_eq!(summary.stats.tab_switches.count, 0);
    assert_eq!(summary.stats.tab_switches.total_time_away, 12_000);
    assert_eq!(summary.violations.len(), 1);
    let v = &summary.violations[0];
    assert_eq!(v.kind, ViolationType::TabSwitch);
    assert_eq!(v.severity, Severity::High);
    assert_eq!(v.duration, Some(12_000));
    assert_eq!(v.timestamp, t0);
    assert_eq!(v.id, format!("tab_switch_pending_{t0}"));
}

#[test]
fn live_pending_duration_tracks_wall_clock() {
    let t0 = now_ms() - 2_000;
    let summary = aggregate_live(&[ev(EventType::TabBlur, t0)]);
    let duration = summary.violations[0].duration.unwrap();
    assert!(duration >= 2_000);
    assert!(duration < 60_000);
}

#[test]
fn interleaved_categories_pair_independently() {
    let (t0, t1, t2, t3) = (1_000, 2_000, 3_500, 7_000);
    let log = [
        ev(EventType::WindowBlur, t0),
        ev(EventType::TabBlur, t1),
        ev(EventType::WindowFocus, t2),
        ev(EventType::TabFocus, t3),
    ];
    let summary = aggregate(&log, NOW);

    assert_eq!(summary.stats.window_switches.count, 1);
    assert_eq!(summary.stats.tab_switches.count, 1);
    assert_eq!(summary.stats.window_switches.total_time_away, t2 - t0);
    assert_eq!(summary.stats.tab_switches.total_time_away, t3 - t1);
    assert!(summary.violations.is_empty());
}

#[test]
fn later_blur_overwrites_pending_blur() {
    let log = [
        ev(EventType::TabBlur, 1_000),
        ev(EventType::TabBlur, 5_000),
        ev(EventType::TabFocus, 6_000),
    ];
    let summary = aggregate(&log, NOW);
    assert_eq!(summary.stats.tab_switches.count, 1);
    assert_eq!(summary.stats.tab_switches.total_time_away, 1_000);
}

#[test]
fn focus_without_blur_is_noop() {
    let log = [ev(EventType::TabFocus, 1_000), ev(EventType::WindowFocus, 2_000)];
    let summary = aggregate(&log, NOW);
    assert_eq!(summary.stats, ProctoringStats::default());
    assert!(summary.violations.is_empty());
}

#[test]
fn focus_of_other_category_does_not_close_blur() {
    let log = [ev(EventType::TabBlur, 1_000), ev(EventType::WindowFocus, 2_000)];
    let summary = aggregate(&log, 3_000);
    assert_eq!(summary.stats.tab_switches.count, 0);
    assert_eq!(summary.stats.window_switches.count, 0);
    assert_eq!(summary.counts.tab_switch, 1);
    assert_eq!(summary.violations[0].duration, Some(2_000));
}

#[test]
fn completed_and_pending_time_accumulate() {
    let log = [
        ev(EventType::WindowBlur, 1_000),
        ev(EventType::WindowFocus, 1_500),
        ev(EventType::WindowBlur, 9_000),
    ];
    let summary = aggregate(&log, 10_000);
    assert_eq!(summary.stats.window_switches.count, 1);
    assert_eq!(summary.stats.window_switches.total_time_away, 500 + 1_000);
    assert_eq!(summary.counts.window_switch, 1);
    assert_eq!(summary.violations[0].id, "window_switch_pending_9000");
}

#[test]
fn pending_duration_never_negative() {
    let summary = aggregate(&[ev(EventType::TabBlur, 5_000)], 4_000);
    assert_eq!(summary.violations[0].duration, Some(0));
    assert_eq!(summary.stats.tab_switches.total_time_away, 0);
}

// =============================================================
// Screen share
// =============================================================

#[test]
fn screen_share_stop_always_high_violation() {
    let summary = aggregate(&[ev(EventType::ScreenShareStop, 4_000)], NOW);
    assert_eq!(summary.violations.len(), 1);
    let v = &summary.violations[0];
    assert_eq!(v.kind, ViolationType::ScreenShareStop);
    assert_eq!(v.severity, Severity::High);
    assert_eq!(v.id, "screen_share_stop_4000");
    assert!(v.duration.is_none());
}

#[test]
fn screen_share_start_produces_nothing() {
    let log = [ev(EventType::ScreenShareStart, 1_000), ev(EventType::ScreenShareStop, 2_000)];
    let summary = aggregate(&log, NOW);
    assert_eq!(summary.counts.screen_share_stop, 1);
    assert_eq!(summary.counts.total, 1);
}

// =============================================================
// Ordering, counts, tolerance
// =============================================================

#[test]
fn violations_sorted_most_recent_first() {
    let log = [
        ev(EventType::ScreenShareStop, 1_000),
        ev(EventType::WindowBlur, 2_000),
        ev(EventType::ScreenShareStop, 3_000),
        ev(EventType::TabBlur, 4_000),
    ];
    let summary = aggregate(&log, 10_000);
    let stamps: Vec<i64> = summary.violations.iter().map(|v| v.timestamp).collect();
    assert_eq!(stamps, vec![4_000, 3_000, 2_000, 1_000]);
}

#[test]
fn counts_derive_from_final_list() {
    let log = [
        ev(EventType::ScreenShareStop, 1_000),
        ev(EventType::ScreenShareStop, 2_000),
        ev(EventType::TabBlur, 3_000),
        ev(EventType::WindowBlur, 3_500),
    ];
    let summary = aggregate(&log, 10_000);
    assert_eq!(summary.counts.total, 4);
    assert_eq!(summary.counts.high, 4);
    assert_eq!(summary.counts.medium, 0);
    assert_eq!(summary.counts.low, 0);
    assert_eq!(summary.counts.screen_share_stop, 2);
    assert_eq!(summary.counts.tab_switch, 1);
    assert_eq!(summary.counts.window_switch, 1);
}

#[test]
fn unknown_events_are_skipped() {
    let log: Vec<ProctoringEvent> = serde_json::from_value(json!([
        { "type": "TAB_BLUR", "timestamp": 1000 },
        { "type": "CAMERA_OFF", "timestamp": 1500 },
        { "type": "TAB_FOCUS", "timestamp": 2000 },
    ]))
    .unwrap();
    let summary = aggregate(&log, NOW);
    assert_eq!(summary.stats.tab_switches.count, 1);
    assert!(summary.violations.is_empty());
}

#[test]
fn repeated_calls_are_identical_for_closed_logs() {
    let log = [
        ev(EventType::TabBlur, 1_000),
        ev(EventType::TabFocus, 2_000),
        ev(EventType::ScreenShareStop, 3_000),
    ];
    assert_eq!(aggregate(&log, NOW), aggregate(&log, NOW + 50_000));
}

// =============================================================
// Extreme stored timestamps
// =============================================================

#[test]
fn extreme_pending_blur_saturates() {
    let log = crate::parse_event_log(r#"[{"type":"TAB_BLUR","timestamp":-9223372036854775808}]"#);
    assert_eq!(log.len(), 1);

    let summary = aggregate(&log, NOW);
    assert_eq!(summary.violations[0].duration, Some(i64::MAX));
    assert_eq!(summary.stats.tab_switches.total_time_away, i64::MAX);
}

#[test]
fn extreme_matched_switches_saturate_total() {
    let log = [
        ev(EventType::WindowBlur, i64::MIN),
        ev(EventType::WindowFocus, i64::MAX),
        ev(EventType::WindowBlur, 0),
        ev(EventType::WindowFocus, i64::MAX),
    ];
    let summary = aggregate(&log, NOW);
    assert_eq!(summary.stats.window_switches.count, 2);
    assert_eq!(summary.stats.window_switches.total_time_away, i64::MAX);
}

#[test]
fn blur_after_now_has_zero_duration() {
    let summary = aggregate(&[ev(EventType::TabBlur, i64::MAX)], i64::MIN);
    assert_eq!(summary.violations[0].duration, Some(0));
    assert_eq!(summary.stats.tab_switches.total_time_away, 0);
}
