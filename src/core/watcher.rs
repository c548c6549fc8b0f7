//! The poll-compare-notify loop.

use crate::core::{Change, CycleReport, NotificationOutcome, Snapshot, WatchState};
use crate::notify::Notifier;
use crate::notify::message::{STARTUP_MESSAGE, change_message};
use crate::sources::{Fetcher, Target, TargetSpec, expand_all, window};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Behaviour of the watch loop.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Time between the starts of two cycles. Must be non-zero.
    pub interval: Duration,
    /// What to fetch each cycle.
    pub targets: Vec<TargetSpec>,
    /// Days covered by `{date}` targets, today included.
    pub lookahead_days: u32,
    /// Zone used to decide what "today" is.
    pub utc_offset: FixedOffset,
    /// Minimum time between two delivered notifications.
    pub cooldown: Option<Duration>,
    /// Appended to change notifications.
    pub alert_link: Option<String>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            targets: Vec::new(),
            lookahead_days: 7,
            utc_offset: Utc.fix(),
            cooldown: None,
            alert_link: None,
        }
    }
}

/// Periodically fetches every target and notifies when content changes.
///
/// The watcher owns no mutable state of its own: [`Watcher::cycle`] takes
/// the previous [`WatchState`] and hands back the next one, and
/// [`Watcher::run`] threads it from cycle to cycle.
///
/// # Examples
///
/// ```rust,no_run
/// use padel_watch::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> padel_watch::error::Result<()> {
/// let fetcher = HttpFetcher::builder().build()?;
/// let notifier = TelegramNotifier::new("123:ABC", "-1001", Duration::from_secs(30))?;
/// let options = WatchOptions {
///     targets: TargetSpec::parse_list("court=https://example.com/courts")?,
///     ..WatchOptions::default()
/// };
///
/// let watcher = Watcher::new(Box::new(fetcher), Box::new(notifier), options);
/// watcher.run().await;
/// # Ok(())
/// # }
/// ```
pub struct Watcher {
    fetcher: Box<dyn Fetcher>,
    notifier: Box<dyn Notifier>,
    options: WatchOptions,
}

impl Watcher {
    /// Create a watcher from its two collaborators.
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        notifier: Box<dyn Notifier>,
        options: WatchOptions,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            options,
        }
    }

    /// Options this watcher was built with.
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.options.utc_offset)
    }

    /// Targets fetched by a cycle running at `now`.
    pub fn targets_at(&self, now: DateTime<FixedOffset>) -> Vec<Target> {
        expand_all(
            &self.options.targets,
            now.date_naive(),
            self.options.lookahead_days,
        )
    }

    /// Run one fetch/compare/notify pass.
    ///
    /// Fetch failures are logged and leave the stored snapshot untouched.
    /// All changes of the cycle are reported in a single notification. A
    /// changed snapshot is stored whether or not that notification is
    /// delivered, so the same change is never announced twice.
    pub async fn cycle(
        &self,
        mut state: WatchState,
        now: DateTime<FixedOffset>,
    ) -> (WatchState, CycleReport) {
        let targets = self.targets_at(now);
        let mut report = CycleReport::default();

        for target in &targets {
            report.checked += 1;

            let body = match self.fetcher.fetch(target).await {
                Ok(body) => body,
                Err(e) => {
                    report.failed += 1;
                    warn!(target = %target.name, error = %e, "Fetch failed, keeping previous snapshot");
                    continue;
                }
            };

            let current = Snapshot::of(&body);
            match state.snapshots.insert(target.name.clone(), current.clone()) {
                None => {
                    info!(target = %target.name, digest = current.short(), "Stored initial snapshot");
                }
                Some(previous) if previous == current => {
                    debug!(target = %target.name, digest = current.short(), "No change");
                }
                Some(previous) => {
                    warn!(
                        target = %target.name,
                        url = %target.url,
                        from = previous.short(),
                        to = current.short(),
                        "Change detected"
                    );
                    report.changes.push(Change {
                        target: target.name.clone(),
                        url: target.url.clone(),
                        previous,
                        current,
                    });
                }
            }
        }

        let dropped = state.retain_targets(&targets);
        if dropped > 0 {
            debug!(dropped, "Forgot snapshots of targets outside the window");
        }

        if !report.changes.is_empty() {
            report.notification = self.notify_changes(&mut state, &report.changes, now).await;
        }

        (state, report)
    }

    async fn notify_changes(
        &self,
        state: &mut WatchState,
        changes: &[Change],
        now: DateTime<FixedOffset>,
    ) -> NotificationOutcome {
        if let (Some(cooldown), Some(last)) = (self.options.cooldown, state.last_notified) {
            let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
            if elapsed < cooldown {
                info!(
                    changes = changes.len(),
                    since_last = ?elapsed,
                    "Skipping notification, previous one is too recent"
                );
                return NotificationOutcome::SkippedCooldown;
            }
        }

        let text = change_message(changes, self.options.alert_link.as_deref());
        match self.notifier.send(&text).await {
            Ok(()) => {
                info!(changes = changes.len(), notifier = %self.notifier.name(), "Change notification sent");
                state.last_notified = Some(now);
                NotificationOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, notifier = %self.notifier.name(), "Failed to send change notification");
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Loop forever: a cycle every `interval`, measured between cycle starts.
    ///
    /// Nothing inside a cycle can end the loop; stop it by dropping the
    /// future (process exit, `select!` on a shutdown signal).
    pub async fn run(&self) {
        let period = self.options.interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval = ?period,
            fetcher = %self.fetcher.name(),
            notifier = %self.notifier.name(),
            "Starting watch loop"
        );

        let mut state = WatchState::new();
        loop {
            ticker.tick().await;

            let now = self.now();
            let (next, report) = self.cycle(state, now).await;
            state = next;

            if report.changes.is_empty() {
                info!(
                    checked = report.checked,
                    failed = report.failed,
                    at = %now.format(TIME_FORMAT),
                    "No changes"
                );
            }
        }
    }

    /// Tell the destination the monitor is up. Failure is logged only.
    pub async fn announce_start(&self) {
        match self.notifier.send(STARTUP_MESSAGE).await {
            Ok(()) => info!("Startup notification sent"),
            Err(e) => error!(error = %e, "Failed to send startup notification"),
        }
    }

    /// Human-readable overview of what is being watched.
    pub fn status_summary(&self, state: &WatchState, now: DateTime<FixedOffset>) -> String {
        let targets = self.targets_at(now);
        let mut text = String::from("Padel monitor status\n\n");

        let _ = writeln!(text, "Local time: {}", now.format(TIME_FORMAT));
        if self.options.targets.iter().any(TargetSpec::is_dated) {
            let dates: Vec<String> = window(now.date_naive(), self.options.lookahead_days)
                .iter()
                .map(|d| d.to_string())
                .collect();
            let _ = writeln!(text, "Monitoring dates: {}", dates.join(", "));
        }
        let _ = writeln!(text, "Targets watched: {}", targets.len());
        for target in &targets {
            let _ = writeln!(text, "   • {}: {}", target.name, target.url);
        }

        let _ = write!(text, "\nStored snapshots: {}", state.len());
        for (name, snapshot) in state.snapshots() {
            let _ = write!(text, "\n   • {}: {}...", name, snapshot.short());
        }
        text
    }
}
