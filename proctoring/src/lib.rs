//! Proctoring data model and violation aggregation for interview sessions.
//!
//! The browser-side provider appends [`ProctoringEvent`]s to a per-interview
//! log ([`recorder::EventRecorder`]). Reporting code folds that log into a
//! [`ProctoringSummary`] with [`aggregate::aggregate`]. Nothing here holds
//! state between aggregation calls.

pub mod aggregate;
pub mod recorder;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use aggregate::{aggregate, aggregate_live};
pub use recorder::{EventRecorder, load_events, parse_event_log};

/// Kind of a raw focus / visibility / screen-share event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    TabBlur,
    TabFocus,
    WindowBlur,
    WindowFocus,
    ScreenShareStart,
    ScreenShareStop,
    /// Any type string this build does not know. Skipped by the aggregator.
    #[serde(other)]
    Unknown,
}

/// A single entry of the proctoring event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProctoringEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ProctoringEvent {
    #[must_use]
    pub fn new(kind: EventType, timestamp: i64) -> Self {
        Self { kind, timestamp, details: None }
    }

    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Category of a derived violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    TabSwitch,
    WindowSwitch,
    ScreenShareStop,
}

impl ViolationType {
    /// Wire name, also used as the violation id prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TabSwitch => "tab_switch",
            Self::WindowSwitch => "window_switch",
            Self::ScreenShareStop => "screen_share_stop",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A violation derived from the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Derived from type and timestamp; unique within one summary.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub timestamp: i64,
    pub description: String,
    pub severity: Severity,
    /// Time away in milliseconds, for switch violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

/// Count and accumulated time away for one switch category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchStats {
    /// Completed blur → focus round trips.
    pub count: u32,
    /// Milliseconds away, including a still-open blur.
    pub total_time_away: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctoringStats {
    pub tab_switches: SwitchStats,
    pub window_switches: SwitchStats,
}

/// Violation totals by severity and by type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCounts {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub tab_switch: usize,
    pub window_switch: usize,
    pub screen_share_stop: usize,
}

impl ViolationCounts {
    /// Recount from a finished violation list.
    #[must_use]
    pub fn from_violations(violations: &[Violation]) -> Self {
        let by_severity = |s: Severity| violations.iter().filter(|v| v.severity == s).count();
        let by_type = |t: ViolationType| violations.iter().filter(|v| v.kind == t).count();
        Self {
            total: violations.len(),
            high: by_severity(Severity::High),
            medium: by_severity(Severity::Medium),
            low: by_severity(Severity::Low),
            tab_switch: by_type(ViolationType::TabSwitch),
            window_switch: by_type(ViolationType::WindowSwitch),
            screen_share_stop: by_type(ViolationType::ScreenShareStop),
        }
    }
}

/// Everything a report needs from one interview's event log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctoringSummary {
    /// Most recent first.
    pub violations: Vec<Violation>,
    pub stats: ProctoringStats,
    pub counts: ViolationCounts,
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
