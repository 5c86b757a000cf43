//! Fetch-on-interval subscription to one backend endpoint.
//!
//! The timer and the requests run as tokio tasks, but none of them touch the
//! poller's state: each finished request is sent back over a channel tagged
//! with the sequence number it was issued under, and the owner applies
//! outcomes in `drain()` from the UI loop. An outcome older than the newest
//! one already applied is dropped, so a slow response can never roll the
//! displayed value backwards.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::PollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// What a card should draw for its body.
#[derive(Debug, PartialEq)]
pub enum CardView<'a, S> {
    Loading,
    Failed(&'a str),
    Data { snapshot: &'a S, stale: bool },
}

struct Outcome<S> {
    seq: u64,
    result: Result<S, PollError>,
}

pub struct MetricPoller<S> {
    name: &'static str,
    client: ApiClient,
    path: String,
    interval: Duration,
    timeout: Duration,

    status: PollStatus,
    snapshot: Option<S>,
    error: Option<String>,
    last_success: Option<DateTime<Local>>,
    applied_seq: u64,
    stale_dropped: u64,

    rx: Option<mpsc::UnboundedReceiver<Outcome<S>>>,
    ticker: Option<JoinHandle<()>>,
}

impl<S> MetricPoller<S>
where
    S: DeserializeOwned + Send + 'static,
{
    pub fn new(
        name: &'static str,
        client: ApiClient,
        path: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            name,
            client,
            path: path.into(),
            interval,
            timeout: interval,
            status: PollStatus::Idle,
            snapshot: None,
            error: None,
            last_success: None,
            applied_seq: 0,
            stale_dropped: 0,
            rx: None,
            ticker: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch now, then once per interval until `stop()`. Must be called from
    /// inside a tokio runtime.
    pub fn start(&mut self) {
        self.stop();
        let (tx, rx) = mpsc::unbounded_channel();
        self.rx = Some(rx);
        // outcomes from a previous run went to the old channel
        self.applied_seq = 0;
        if self.status == PollStatus::Idle {
            self.status = PollStatus::Loading;
        }

        let client = self.client.clone();
        let path = self.path.clone();
        let interval = self.interval;
        let timeout = self.timeout;
        info!(card = self.name, %path, ?interval, "poller started");

        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                seq += 1;
                let (client, path, tx) = (client.clone(), path.clone(), tx.clone());
                // Not awaited: a slow request must not delay the next tick
                tokio::spawn(async move {
                    let result = client.get_json::<S>(&path, timeout).await;
                    let _ = tx.send(Outcome { seq, result });
                });
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(h) = self.ticker.take() {
            h.abort();
            info!(card = self.name, path = %self.path, "poller stopped");
        }
        self.rx = None;
    }

    /// Point the poller at a new path, forgetting everything about the old one.
    pub fn restart(&mut self, path: impl Into<String>) {
        self.stop();
        self.path = path.into();
        self.snapshot = None;
        self.error = None;
        self.last_success = None;
        self.status = PollStatus::Idle;
        self.start();
    }

    /// Apply every outcome that has arrived, in arrival order. `on_snapshot`
    /// runs once per newly applied snapshot with the time it was applied.
    /// Returns how many snapshots were applied.
    pub fn drain(&mut self, mut on_snapshot: impl FnMut(&S, DateTime<Local>)) -> usize {
        let Some(rx) = self.rx.as_mut() else {
            return 0;
        };
        let mut arrived = Vec::new();
        while let Ok(o) = rx.try_recv() {
            arrived.push(o);
        }
        let mut applied = 0;
        for o in arrived {
            let now = Local::now();
            if self.apply(o.seq, o.result, now) {
                if let Some(s) = &self.snapshot {
                    on_snapshot(s, now);
                }
                applied += 1;
            }
        }
        applied
    }
}

impl<S> MetricPoller<S> {
    /// Returns true when a new snapshot was stored.
    fn apply(&mut self, seq: u64, result: Result<S, PollError>, at: DateTime<Local>) -> bool {
        if seq < self.applied_seq {
            self.stale_dropped += 1;
            debug!(card = self.name, seq, newest = self.applied_seq, "dropping stale response");
            return false;
        }
        self.applied_seq = seq;
        match result {
            Ok(s) => {
                debug!(card = self.name, seq, "poll ok");
                self.snapshot = Some(s);
                self.status = PollStatus::Ready;
                self.error = None;
                self.last_success = Some(at);
                true
            }
            Err(e) => {
                if self.status != PollStatus::Error {
                    warn!(card = self.name, path = %self.path, error = %e, "poll failed");
                } else {
                    debug!(card = self.name, seq, error = %e, "poll still failing");
                }
                self.status = PollStatus::Error;
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Apply a snapshot as if it had just arrived from the backend.
    #[cfg(test)]
    pub(crate) fn inject(&mut self, snapshot: S) {
        let seq = self.applied_seq + 1;
        self.apply(seq, Ok(snapshot), Local::now());
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> PollStatus {
        self.status
    }

    pub fn snapshot(&self) -> Option<&S> {
        self.snapshot.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn view(&self) -> CardView<'_, S> {
        match (&self.snapshot, self.status) {
            (Some(snapshot), status) => CardView::Data {
                snapshot,
                stale: status == PollStatus::Error,
            },
            (None, PollStatus::Error) => CardView::Failed(self.error.as_deref().unwrap_or("error")),
            (None, _) => CardView::Loading,
        }
    }
}

impl<S> Drop for MetricPoller<S> {
    fn drop(&mut self) {
        if let Some(h) = self.ticker.take() {
            h.abort();
        }
    }
}
