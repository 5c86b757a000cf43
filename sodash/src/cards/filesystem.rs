//! Mounted partitions.

use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::table::collate;
use crate::types::Partition;

pub struct FilesystemCard {
    pub poller: MetricPoller<Vec<Partition>>,
}

impl FilesystemCard {
    pub fn new(client: ApiClient, polling: &PollingConfig) -> Self {
        let every = PollingConfig::every(polling.filesystem_ms);
        Self {
            poller: MetricPoller::new("filesystem", client, api::FILESYSTEM, every)
                .with_timeout(polling.timeout_for(every)),
        }
    }

    pub fn refresh(&mut self) -> usize {
        self.poller.drain(|_, _| {})
    }

    /// Partitions ordered by mountpoint.
    pub fn partitions(&self) -> Vec<&Partition> {
        let mut parts: Vec<&Partition> = self
            .poller
            .snapshot()
            .map(|v| v.iter().collect())
            .unwrap_or_default();
        parts.sort_by(|a, b| collate(&a.mountpoint, &b.mountpoint));
        parts
    }
}

/// Used fraction in 0..=1 for a gauge; prefers the reported percentage.
pub fn used_ratio(p: &Partition) -> f64 {
    let pct = if p.usage_percent > 0.0 {
        p.usage_percent
    } else if p.total_gb > 0.0 {
        p.used_gb / p.total_gb * 100.0
    } else {
        0.0
    };
    (pct / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_mountpoint() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut card = FilesystemCard::new(client, &PollingConfig::default());
        let parts: Vec<Partition> = serde_json::from_str(
            r#"[{"device":"/dev/sdb1","mountpoint":"/home","type":"ext4","total_gb":100,"used_gb":25},
                {"device":"/dev/sda1","mountpoint":"/","type":"ext4","usage_percent":50}]"#,
        )
        .unwrap();
        card.poller.inject(parts);
        let got: Vec<&str> = card.partitions().iter().map(|p| p.mountpoint.as_str()).collect();
        assert_eq!(got, vec!["/", "/home"]);
        assert_eq!(used_ratio(card.partitions()[0]), 0.5);
        assert_eq!(used_ratio(card.partitions()[1]), 0.25);
    }
}
