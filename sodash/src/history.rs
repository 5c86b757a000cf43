//! Bounded history buffers for charts.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Local};

/// Append `v` and trim from the front until `dq` holds at most `cap` items.
pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    dq.push_back(v);
    while dq.len() > cap {
        dq.pop_front();
    }
}

/// One sample of every series a chart tracks, taken when a poll was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Local>,
    pub values: BTreeMap<String, f64>,
}

impl HistoryPoint {
    pub fn new(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

/// Chronological window of the last `capacity` points. Never reordered.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<HistoryPoint>,
    cap: usize,
}

impl HistoryBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn append(&mut self, point: HistoryPoint) {
        push_capped(&mut self.points, point, self.cap);
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = &HistoryPoint> + ExactSizeIterator + '_ {
        self.points.iter()
    }

    /// `(timestamp, value)` for one series, oldest first. Points that lack the
    /// key yield 0 so every series stays aligned on the same time axis.
    pub fn to_series<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (DateTime<Local>, f64)> + Clone + 'a {
        self.points.iter().map(move |p| (p.timestamp, p.get(key)))
    }

    /// Chart-ready `(x, y)` pairs where x is the sample index.
    pub fn chart_points(&self, key: &str) -> Vec<(f64, f64)> {
        self.to_series(key)
            .enumerate()
            .map(|(i, (_, v))| (i as f64, v))
            .collect()
    }

    /// Last `max_points` values of a series scaled for a `Sparkline`.
    pub fn sparkline(&self, key: &str, max_points: usize) -> Vec<u64> {
        let start = self.len().saturating_sub(max_points);
        self.to_series(key)
            .skip(start)
            .map(|(_, v)| v.max(0.0).round() as u64)
            .collect()
    }
}
