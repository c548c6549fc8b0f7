//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use padel_watch::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail,
}

pub fn body(text: &str) -> Reply {
    Reply::Body(text.to_string())
}

/// Returns scripted replies in order, repeating the last one once the script
/// runs out. Records when each fetch happened.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    last: Arc<Mutex<Option<Reply>>>,
    pub calls: Arc<Mutex<Vec<Instant>>>,
}

impl ScriptedFetcher {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, target: &Target) -> Result<String> {
        self.calls.lock().unwrap().push(Instant::now());

        let next = self.replies.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self.last.lock().unwrap().clone().unwrap_or(Reply::Fail),
        };

        match reply {
            Reply::Body(text) => Ok(text),
            Reply::Fail => Err(WatchError::Fetch {
                target: target.name.clone(),
                reason: "connection reset".to_string(),
            }),
        }
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }
}

/// Keeps every delivered message; can be switched to fail.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(WatchError::Notify("Bot API returned HTTP 502".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> String {
        "recording".to_string()
    }
}

pub fn moscow() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

/// 2026-10-17 12:00 Moscow time plus `minutes`.
pub fn at_minute(minutes: i64) -> DateTime<FixedOffset> {
    moscow().with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap() + chrono::TimeDelta::minutes(minutes)
}

pub fn single_court() -> WatchOptions {
    WatchOptions {
        targets: TargetSpec::parse_list("court_a=https://example.com/courts/a").unwrap(),
        utc_offset: moscow(),
        ..WatchOptions::default()
    }
}

pub fn watcher(
    fetcher: &ScriptedFetcher,
    notifier: &RecordingNotifier,
    options: WatchOptions,
) -> Watcher {
    Watcher::new(Box::new(fetcher.clone()), Box::new(notifier.clone()), options)
}

/// Run `cycles` cycles one minute apart and return the number of
/// notifications delivered by each.
pub async fn notifications_per_cycle(
    watcher: &Watcher,
    notifier: &RecordingNotifier,
    cycles: usize,
) -> (WatchState, Vec<usize>) {
    let mut state = WatchState::new();
    let mut counts = Vec::with_capacity(cycles);

    for i in 0..cycles {
        let before = notifier.count();
        let (next, _) = watcher.cycle(state, at_minute(i as i64)).await;
        state = next;
        counts.push(notifier.count() - before);
    }
    (state, counts)
}
