//! State threaded through the watch loop and the per-cycle report.

use crate::core::Snapshot;
use crate::sources::Target;
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, HashSet};

/// Everything the loop remembers between cycles.
///
/// A target without an entry is uninitialized; its first successful fetch
/// stores a baseline without notifying. Entries are only replaced by a
/// successful fetch, so a failed fetch is later compared against the last
/// known-good content.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    pub(crate) snapshots: BTreeMap<String, Snapshot>,
    pub(crate) last_notified: Option<DateTime<FixedOffset>>,
}

impl WatchState {
    /// Create an empty state (every target uninitialized).
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored snapshot for a target, if it has been fetched successfully.
    pub fn snapshot(&self, target: &str) -> Option<&Snapshot> {
        self.snapshots.get(target)
    }

    /// Iterate over `(target, snapshot)` pairs in name order.
    pub fn snapshots(&self) -> impl Iterator<Item = (&str, &Snapshot)> {
        self.snapshots.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Number of targets being tracked.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no target has been fetched successfully yet.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// When the last notification was delivered.
    pub fn last_notified(&self) -> Option<DateTime<FixedOffset>> {
        self.last_notified
    }

    /// Forget targets that dropped out of the current expansion (dates that
    /// slid out of the window). Returns how many were removed.
    pub(crate) fn retain_targets(&mut self, targets: &[Target]) -> usize {
        let current: HashSet<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        let before = self.snapshots.len();
        self.snapshots.retain(|name, _| current.contains(name.as_str()));
        before - self.snapshots.len()
    }
}

/// A target whose content differs from its stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Target name
    pub target: String,
    /// URL that was fetched
    pub url: String,
    /// Snapshot before this cycle
    pub previous: Snapshot,
    /// Snapshot now stored
    pub current: Snapshot,
}

/// What happened to the notification of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Nothing changed, nothing to send.
    #[default]
    NotSent,
    /// Delivered.
    Sent,
    /// Changes detected but the previous notification is too recent.
    SkippedCooldown,
    /// Delivery failed; the error has been logged.
    Failed(String),
}

/// Summary of one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Targets attempted
    pub checked: usize,
    /// Targets whose fetch failed
    pub failed: usize,
    /// Targets whose content changed
    pub changes: Vec<Change>,
    /// Notification result
    pub notification: NotificationOutcome,
}

impl CycleReport {
    /// Whether a notification was delivered this cycle.
    pub fn notified(&self) -> bool {
        self.notification == NotificationOutcome::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> Target {
        Target {
            name: name.to_string(),
            url: format!("https://example.com/{}", name),
        }
    }

    #[test]
    fn test_new_state_is_uninitialized() {
        let state = WatchState::new();
        assert!(state.is_empty());
        assert!(state.snapshot("court").is_none());
        assert!(state.last_notified().is_none());
    }

    #[test]
    fn test_retain_targets() {
        let mut state = WatchState::new();
        state
            .snapshots
            .insert("sessions_2026-10-16".to_string(), Snapshot::of("old"));
        state
            .snapshots
            .insert("sessions_2026-10-17".to_string(), Snapshot::of("today"));

        let removed = state.retain_targets(&[target("sessions_2026-10-17"), target("new")]);
        assert_eq!(removed, 1);
        assert_eq!(state.len(), 1);
        assert!(state.snapshot("sessions_2026-10-17").is_some());
    }

    #[test]
    fn test_report_notified() {
        let mut report = CycleReport::default();
        assert!(!report.notified());
        report.notification = NotificationOutcome::Sent;
        assert!(report.notified());
    }
}
