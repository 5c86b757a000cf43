//! Dashboard cards. Each card is one endpoint subscription plus whatever
//! derived state its panel draws; cards never share data with each other.

pub mod cpu;
pub mod directory;
pub mod filesystem;
pub mod memory;
pub mod processes;
pub mod status;
pub mod totals;

use chrono::{DateTime, Local};

use crate::api::ApiClient;
use crate::config::ConfigFile;
use crate::history::{HistoryBuffer, HistoryPoint};
use crate::poller::PollStatus;
use crate::visibility::SeriesVisibility;

pub use cpu::CpuCard;
pub use directory::DirectoryCard;
pub use filesystem::FilesystemCard;
pub use memory::MemoryCard;
pub use processes::ProcessCard;
pub use status::StatusCard;
pub use totals::TotalsCard;

/// A multi-series chart: bounded history plus legend toggles.
#[derive(Debug, Clone)]
pub struct SeriesChart {
    pub history: HistoryBuffer,
    pub visibility: SeriesVisibility,
    order: Vec<String>,
}

impl SeriesChart {
    pub fn new(cap: usize) -> Self {
        Self {
            history: HistoryBuffer::new(cap),
            visibility: SeriesVisibility::new(),
            order: Vec::new(),
        }
    }

    /// Append one sample; series seen for the first time become visible.
    pub fn record<K, I>(&mut self, at: DateTime<Local>, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut point = HistoryPoint::new(at);
        for (k, v) in values {
            let k = k.into();
            if !self.order.contains(&k) {
                self.order.push(k.clone());
            }
            self.visibility.ensure_known(&k);
            point.values.insert(k, v);
        }
        self.history.append(point);
    }

    /// Series keys in the order they were first seen.
    pub fn series(&self) -> &[String] {
        &self.order
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|k| self.visibility.is_visible(k))
    }

    pub fn toggle(&mut self, key: &str) {
        self.visibility.toggle(key);
    }
}

pub fn fmt_pct(v: f64) -> String {
    format!("{v:.1}%")
}

/// Every card on the screen, sharing one HTTP client.
pub struct Dashboard {
    pub client: ApiClient,
    pub config: ConfigFile,
    pub cpu: CpuCard,
    pub memory: MemoryCard,
    pub processes: ProcessCard,
    pub status: StatusCard,
    pub totals: TotalsCard,
    pub filesystem: FilesystemCard,
    pub directory: DirectoryCard,
}

impl Dashboard {
    pub fn new(client: ApiClient, config: ConfigFile) -> Self {
        let p = &config.polling;
        let cpu = CpuCard::new(client.clone(), p);
        let memory = MemoryCard::new(client.clone(), p);
        let processes = ProcessCard::new(client.clone(), p, &config.table);
        let status = StatusCard::new(client.clone(), p);
        let totals = TotalsCard::new(client.clone(), p);
        let filesystem = FilesystemCard::new(client.clone(), p);
        let directory = DirectoryCard::new(client.clone(), p, "/");
        Self {
            client,
            config,
            cpu,
            memory,
            processes,
            status,
            totals,
            filesystem,
            directory,
        }
    }

    pub fn start(&mut self) {
        self.cpu.poller.start();
        self.memory.poller.start();
        self.processes.poller.start();
        self.status.poller.start();
        self.totals.poller.start();
        self.filesystem.poller.start();
        self.directory.poller.start();
    }

    pub fn stop(&mut self) {
        self.cpu.poller.stop();
        self.memory.poller.stop();
        self.processes.stop();
        self.status.poller.stop();
        self.totals.poller.stop();
        self.filesystem.poller.stop();
        self.directory.poller.stop();
    }

    /// Apply everything that arrived since the last frame.
    pub fn refresh(&mut self) {
        self.cpu.refresh();
        self.memory.refresh();
        self.processes.refresh();
        self.status.refresh();
        self.totals.refresh();
        self.filesystem.refresh();
        self.directory.refresh();
    }

    pub fn statuses(&self) -> [(&'static str, PollStatus); 7] {
        [
            (self.cpu.poller.name(), self.cpu.poller.status()),
            (self.memory.poller.name(), self.memory.poller.status()),
            (self.processes.poller.name(), self.processes.poller.status()),
            (self.status.poller.name(), self.status.poller.status()),
            (self.totals.poller.name(), self.totals.poller.status()),
            (self.filesystem.poller.name(), self.filesystem.poller.status()),
            (self.directory.poller.name(), self.directory.poller.status()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_keeps_first_seen_order_and_hidden_data() {
        let mut c = SeriesChart::new(3);
        c.record(Local::now(), [("overall", 1.0), ("core0", 2.0)]);
        c.toggle("core0");
        c.record(Local::now(), [("overall", 3.0), ("core0", 4.0), ("core1", 5.0)]);
        assert_eq!(c.series(), ["overall", "core0", "core1"]);
        assert_eq!(c.visible_series().collect::<Vec<_>>(), vec!["overall", "core1"]);

        // hidden series keeps buffering and comes back intact
        let before: Vec<f64> = c.history.to_series("core0").map(|(_, v)| v).collect();
        c.toggle("core0");
        let after: Vec<f64> = c.history.to_series("core0").map(|(_, v)| v).collect();
        assert_eq!(before, vec![2.0, 4.0]);
        assert_eq!(before, after);
        assert!(c.visibility.is_visible("core0"));
    }

    #[test]
    fn pct_has_one_decimal() {
        assert_eq!(fmt_pct(42.3), "42.3%");
        assert_eq!(fmt_pct(74.649), "74.6%");
    }
}
