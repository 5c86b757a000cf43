//! System totals: process and thread counts over a short window.

use chrono::{DateTime, Local};

use super::SeriesChart;
use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::types::ProcessRecord;

pub const PROCESSES: &str = "processes";
pub const THREADS: &str = "threads";

pub struct TotalsCard {
    pub poller: MetricPoller<Vec<ProcessRecord>>,
    pub chart: SeriesChart,
}

impl TotalsCard {
    pub fn new(client: ApiClient, polling: &PollingConfig) -> Self {
        let every = PollingConfig::every(polling.totals_ms);
        Self {
            poller: MetricPoller::new("totals", client, api::PROCESSES, every)
                .with_timeout(polling.timeout_for(every)),
            chart: SeriesChart::new(polling.summary_points),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let chart = &mut self.chart;
        self.poller.drain(|procs, at| ingest(chart, procs, at))
    }

    /// Latest (processes, threads), if anything has been recorded.
    pub fn current(&self) -> Option<(u64, u64)> {
        let p = self.chart.history.latest()?;
        Some((p.get(PROCESSES) as u64, p.get(THREADS) as u64))
    }
}

pub fn totals(procs: &[ProcessRecord]) -> (u64, u64) {
    let threads = procs.iter().map(|p| p.threads).sum();
    (procs.len() as u64, threads)
}

pub fn ingest(chart: &mut SeriesChart, procs: &[ProcessRecord], at: DateTime<Local>) {
    let (n, threads) = totals(procs);
    chart.record(at, [(PROCESSES, n as f64), (THREADS, threads as f64)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_threads_and_caps_window() {
        let procs: Vec<ProcessRecord> = serde_json::from_str(
            r#"[{"pid":1,"threads":4},{"pid":2,"threads":"3"},{"pid":3}]"#,
        )
        .unwrap();
        assert_eq!(totals(&procs), (3, 7));

        let mut chart = SeriesChart::new(30);
        for _ in 0..31 {
            ingest(&mut chart, &procs, Local::now());
        }
        assert_eq!(chart.history.len(), 30);
        let p = chart.history.latest().unwrap();
        assert_eq!(p.get(PROCESSES), 3.0);
        assert_eq!(p.get(THREADS), 7.0);
    }
}
