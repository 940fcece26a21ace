//! Event log → violations + statistics.
//!
//! DESIGN
//! ======
//! A single left-to-right fold over the log in append order. The fold state
//! has one pending-blur slot per switch category (tab, window); a FOCUS of
//! the same category closes the slot and counts one switch. Blurs still open
//! when the log ends are reported as pending violations timed against `now`,
//! so repeated calls on a live interview report a growing duration.

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;

use std::cmp::Reverse;

use tracing::debug;

use crate::{
    EventType, ProctoringEvent, ProctoringStats, ProctoringSummary, Severity, SwitchStats, Violation, ViolationCounts,
    ViolationType, now_ms,
};

/// Fold state threaded through the log.
#[derive(Default)]
struct Pairing<'a> {
    pending_tab: Option<&'a ProctoringEvent>,
    pending_window: Option<&'a ProctoringEvent>,
    stats: ProctoringStats,
    violations: Vec<Violation>,
}

impl<'a> Pairing<'a> {
    fn step(mut self, event: &'a ProctoringEvent) -> Self {
        match event.kind {
            EventType::TabBlur => self.pending_tab = Some(event),
            EventType::TabFocus => close_switch(&mut self.pending_tab, &mut self.stats.tab_switches, event),
            EventType::WindowBlur => self.pending_window = Some(event),
            EventType::WindowFocus => close_switch(&mut self.pending_window, &mut self.stats.window_switches, event),
            EventType::ScreenShareStop => self.violations.push(screen_share_violation(event)),
            EventType::ScreenShareStart => {}
            EventType::Unknown => debug!(timestamp = event.timestamp, "skipping unknown proctoring event"),
        }
        self
    }

    fn finish(mut self, now: i64) -> ProctoringSummary {
        if let Some(blur) = self.pending_tab.take() {
            let violation = pending_violation(ViolationType::TabSwitch, blur, now);
            add_time_away(&mut self.stats.tab_switches, violation.duration.unwrap_or(0));
            self.violations.push(violation);
        }
        if let Some(blur) = self.pending_window.take() {
            let violation = pending_violation(ViolationType::WindowSwitch, blur, now);
            add_time_away(&mut self.stats.window_switches, violation.duration.unwrap_or(0));
            self.violations.push(violation);
        }

        self.violations.sort_by_key(|v| Reverse(v.timestamp));
        let counts = ViolationCounts::from_violations(&self.violations);

        ProctoringSummary { violations: self.violations, stats: self.stats, counts }
    }
}

fn close_switch(pending: &mut Option<&ProctoringEvent>, stats: &mut SwitchStats, focus: &ProctoringEvent) {
    let Some(blur) = pending.take() else {
        return;
    };
    stats.count = stats.count.saturating_add(1);
    add_time_away(stats, focus.timestamp.saturating_sub(blur.timestamp));
}

/// Totals saturate; stored timestamps may be any i64.
fn add_time_away(stats: &mut SwitchStats, ms: i64) {
    stats.total_time_away = stats.total_time_away.saturating_add(ms);
}

fn screen_share_violation(event: &ProctoringEvent) -> Violation {
    Violation {
        id: format!("{}_{}", ViolationType::ScreenShareStop.as_str(), event.timestamp),
        kind: ViolationType::ScreenShareStop,
        timestamp: event.timestamp,
        description: "Screen sharing was stopped during the interview".to_owned(),
        severity: Severity::High,
        duration: None,
    }
}

fn pending_violation(kind: ViolationType, blur: &ProctoringEvent, now: i64) -> Violation {
    let description = match kind {
        ViolationType::TabSwitch => "Candidate left the interview tab and has not returned",
        ViolationType::WindowSwitch => "Candidate left the interview window and has not returned",
        ViolationType::ScreenShareStop => "Screen sharing was stopped during the interview",
    };
    Violation {
        id: format!("{}_pending_{}", kind.as_str(), blur.timestamp),
        kind,
        timestamp: blur.timestamp,
        description: description.to_owned(),
        severity: Severity::High,
        duration: Some(now.saturating_sub(blur.timestamp).max(0)),
    }
}

/// Aggregate `events` (in append order) using `now` as the end time of any
/// still-open blur.
#[must_use]
pub fn aggregate(events: &[ProctoringEvent], now: i64) -> ProctoringSummary {
    events
        .iter()
        .fold(Pairing::default(), Pairing::step)
        .finish(now)
}

/// [`aggregate`] against the current wall-clock time.
#[must_use]
pub fn aggregate_live(events: &[ProctoringEvent]) -> ProctoringSummary {
    aggregate(events, now_ms())
}
