//! Memory card: RAM and swap gauges plus used-GB history.

use chrono::{DateTime, Local};

use super::SeriesChart;
use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::types::MemorySnapshot;

pub const RAM: &str = "ram";
pub const SWAP: &str = "swap";

pub struct MemoryCard {
    pub poller: MetricPoller<MemorySnapshot>,
    pub chart: SeriesChart,
}

impl MemoryCard {
    pub fn new(client: ApiClient, polling: &PollingConfig) -> Self {
        let every = PollingConfig::every(polling.memory_ms);
        Self {
            poller: MetricPoller::new("memory", client, api::MEMORY, every)
                .with_timeout(polling.timeout_for(every)),
            chart: SeriesChart::new(polling.history_points),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let chart = &mut self.chart;
        self.poller.drain(|snap, at| ingest(chart, snap, at))
    }
}

pub fn ingest(chart: &mut SeriesChart, snap: &MemorySnapshot, at: DateTime<Local>) {
    chart.record(at, [(RAM, snap.ram.used_gb), (SWAP, snap.swap.used_gb)]);
}

/// Percentage from the payload, or derived from used/total when it is missing.
pub fn usage_percent(used_gb: f64, total_gb: f64, reported: f64) -> f64 {
    if reported > 0.0 {
        reported
    } else if total_gb > 0.0 {
        used_gb / total_gb * 100.0
    } else {
        0.0
    }
}

/// MB below 1 GB, GB above, one decimal.
pub fn fmt_gb(gb: f64) -> String {
    if gb <= 0.0 {
        "0 MB".into()
    } else if gb < 1.0 {
        format!("{:.1} MB", gb * 1024.0)
    } else {
        format!("{gb:.1} GB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_used_gb_for_both_series() {
        let snap: MemorySnapshot = serde_json::from_str(
            r#"{"ram":{"total_gb":16,"used_gb":6.5},"swap":{"total_gb":2,"used_gb":0.25}}"#,
        )
        .unwrap();
        let mut chart = SeriesChart::new(60);
        ingest(&mut chart, &snap, Local::now());
        let p = chart.history.latest().unwrap();
        assert_eq!(p.get(RAM), 6.5);
        assert_eq!(p.get(SWAP), 0.25);
        assert_eq!(chart.series(), [RAM, SWAP]);
    }

    #[test]
    fn percent_falls_back_to_ratio() {
        assert_eq!(usage_percent(4.0, 16.0, 0.0), 25.0);
        assert_eq!(usage_percent(4.0, 16.0, 30.0), 30.0);
        assert_eq!(usage_percent(4.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn sizes_pick_a_unit() {
        assert_eq!(fmt_gb(0.0), "0 MB");
        assert_eq!(fmt_gb(0.5), "512.0 MB");
        assert_eq!(fmt_gb(12.34), "12.3 GB");
    }
}
