//! CPU card: overall and per-core usage with a toggleable history chart.

use chrono::{DateTime, Local};

use super::SeriesChart;
use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::types::CpuSnapshot;

pub const OVERALL: &str = "overall";

pub fn core_key(id: u64) -> String {
    format!("core{id}")
}

pub struct CpuCard {
    pub poller: MetricPoller<CpuSnapshot>,
    pub chart: SeriesChart,
}

impl CpuCard {
    pub fn new(client: ApiClient, polling: &PollingConfig) -> Self {
        let every = PollingConfig::every(polling.cpu_ms);
        Self {
            poller: MetricPoller::new("cpu", client, api::CPU, every)
                .with_timeout(polling.timeout_for(every)),
            chart: SeriesChart::new(polling.history_points),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let chart = &mut self.chart;
        self.poller.drain(|snap, at| ingest(chart, snap, at))
    }

    /// Digit keys address cores by id; returns false when no such series exists.
    pub fn toggle_core(&mut self, id: u64) -> bool {
        let key = core_key(id);
        if !self.chart.series().iter().any(|k| *k == key) {
            return false;
        }
        self.chart.toggle(&key);
        true
    }

    pub fn toggle_overall(&mut self) {
        self.chart.toggle(OVERALL);
    }
}

/// Project one snapshot into `overall` + `core{id}` series.
pub fn ingest(chart: &mut SeriesChart, snap: &CpuSnapshot, at: DateTime<Local>) {
    let values = std::iter::once((OVERALL.to_string(), snap.overall_usage_percent)).chain(
        snap.cores
            .iter()
            .map(|c| (core_key(c.id), c.usage_percent)),
    );
    chart.record(at, values);
}
