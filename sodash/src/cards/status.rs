//! Process status distribution, counted from its own poll of the process list.

use std::collections::BTreeMap;

use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::types::ProcessRecord;

pub const OTHER: &str = "Other";

pub struct StatusCard {
    pub poller: MetricPoller<Vec<ProcessRecord>>,
    pub counts: Vec<(String, u64)>,
}

impl StatusCard {
    pub fn new(client: ApiClient, polling: &PollingConfig) -> Self {
        let every = PollingConfig::every(polling.status_ms);
        Self {
            poller: MetricPoller::new("status", client, api::PROCESSES, every)
                .with_timeout(polling.timeout_for(every)),
            counts: Vec::new(),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let counts = &mut self.counts;
        self.poller
            .drain(|procs, _| *counts = status_distribution(procs))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Count processes per status, largest bucket first, ties by name.
/// Records without a status land in [`OTHER`].
pub fn status_distribution(procs: &[ProcessRecord]) -> Vec<(String, u64)> {
    let mut by_status: BTreeMap<&str, u64> = BTreeMap::new();
    for p in procs {
        let s = match p.status.as_str() {
            "" | "N/A" => OTHER,
            s => s,
        };
        *by_status.entry(s).or_default() += 1;
    }
    let mut out: Vec<(String, u64)> = by_status
        .into_iter()
        .map(|(s, n)| (s.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sorted_with_missing_as_other() {
        let procs: Vec<ProcessRecord> = serde_json::from_str(
            r#"[
                {"pid":1,"status":"sleeping"},
                {"pid":2,"status":"running"},
                {"pid":3,"status":"sleeping"},
                {"pid":4},
                {"pid":5,"status":null},
                {"pid":6,"status":"zombie"}
            ]"#,
        )
        .unwrap();
        let d = status_distribution(&procs);
        assert_eq!(
            d,
            vec![
                ("Other".to_string(), 2),
                ("sleeping".to_string(), 2),
                ("running".to_string(), 1),
                ("zombie".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_list_has_no_buckets() {
        assert!(status_distribution(&[]).is_empty());
    }
}
