//! Process list card: table view model, pid-based selection and the lazily
//! polled I/O detail of the selected process.

use std::time::Duration;

use tracing::debug;

use crate::api::{self, ApiClient};
use crate::config::{PollingConfig, TableConfig};
use crate::poller::MetricPoller;
use crate::table::{ProcSortKey, TableViewModel};
use crate::types::{ProcessIo, ProcessRecord};

/// I/O poller that lives exactly as long as a row stays open.
pub struct ProcessDetail {
    pub pid: u32,
    pub io: MetricPoller<ProcessIo>,
}

impl ProcessDetail {
    pub fn open(client: ApiClient, pid: u32, every: Duration, timeout: Duration) -> Self {
        let mut io = MetricPoller::new("process-io", client, api::process_io(pid), every)
            .with_timeout(timeout);
        io.start();
        Self { pid, io }
    }
}

pub struct ProcessCard {
    pub poller: MetricPoller<Vec<ProcessRecord>>,
    pub table: TableViewModel,
    pub selected: Option<u32>,
    pub detail: Option<ProcessDetail>,
    client: ApiClient,
    io_every: Duration,
    io_timeout: Duration,
}

impl ProcessCard {
    pub fn new(client: ApiClient, polling: &PollingConfig, table: &TableConfig) -> Self {
        let every = PollingConfig::every(polling.processes_ms);
        let io_every = PollingConfig::every(polling.process_io_ms);
        Self {
            poller: MetricPoller::new("processes", client.clone(), api::PROCESSES, every)
                .with_timeout(polling.timeout_for(every)),
            table: TableViewModel::new(table.page_size, table.page_increment),
            selected: None,
            detail: None,
            client,
            io_every,
            io_timeout: polling.timeout_for(io_every),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let applied = self.poller.drain(|_, _| {});
        self.drop_vanished_selection();
        if let Some(d) = self.detail.as_mut() {
            d.io.drain(|_, _| {});
        }
        applied
    }

    /// A selected pid missing from the latest list has exited.
    fn drop_vanished_selection(&mut self) {
        let Some(pid) = self.selected else {
            return;
        };
        if self.poller.snapshot().is_none() || self.records().iter().any(|p| p.pid == pid) {
            return;
        }
        debug!(pid, "selected process is gone");
        self.clear_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.close_detail();
    }

    pub fn stop(&mut self) {
        self.poller.stop();
        self.close_detail();
    }

    pub fn records(&self) -> &[ProcessRecord] {
        self.poller.snapshot().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn filtered_sorted(&self) -> Vec<&ProcessRecord> {
        self.table.filtered_sorted(self.records())
    }

    pub fn displayed(&self) -> Vec<&ProcessRecord> {
        self.table.displayed(&self.filtered_sorted())
    }

    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        let pid = self.selected?;
        self.records().iter().find(|p| p.pid == pid)
    }

    /// Position of the selection among the displayed rows, if it is on screen.
    pub fn selected_index(&self) -> Option<usize> {
        let pid = self.selected?;
        self.displayed().iter().position(|p| p.pid == pid)
    }

    /// Move the cursor by `delta` rows within the displayed rows. A selection
    /// that scrolled out of view restarts from the top.
    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.displayed();
        if rows.is_empty() {
            self.clear_selection();
            return;
        }
        let next = match self.selected_index() {
            None => 0,
            Some(i) => (i as isize + delta).clamp(0, rows.len() as isize - 1) as usize,
        };
        self.selected = Some(rows[next].pid);
    }

    pub fn open_detail(&mut self) {
        let Some(pid) = self.selected else {
            return;
        };
        if self.detail.as_ref().is_some_and(|d| d.pid == pid) {
            return;
        }
        debug!(pid, "opening process detail");
        self.close_detail();
        self.detail = Some(ProcessDetail::open(
            self.client.clone(),
            pid,
            self.io_every,
            self.io_timeout,
        ));
    }

    pub fn close_detail(&mut self) {
        if let Some(mut d) = self.detail.take() {
            d.io.stop();
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.table.set_search_term(term);
    }

    pub fn request_sort(&mut self, key: ProcSortKey) {
        self.table.request_sort(key);
    }

    pub fn load_more(&mut self) {
        let n = self.filtered_sorted().len();
        self.table.load_more(n);
    }

    pub fn toggle_show_all(&mut self) {
        self.table.toggle_show_all();
    }

    pub fn total_threads(&self) -> u64 {
        self.records().iter().map(|p| p.threads).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with(records: &str) -> ProcessCard {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut card = ProcessCard::new(client, &PollingConfig::default(), &TableConfig::default());
        let recs: Vec<ProcessRecord> = serde_json::from_str(records).unwrap();
        card.poller.inject(recs);
        card
    }

    #[test]
    fn selection_follows_pid_across_sorts() {
        let mut card = card_with(
            r#"[{"pid":1,"name":"a","cpu_percent":5},{"pid":2,"name":"b","cpu_percent":90},{"pid":3,"name":"c","cpu_percent":50}]"#,
        );
        card.move_selection(1);
        assert_eq!(card.selected, Some(1));
        card.move_selection(1);
        assert_eq!(card.selected, Some(2));

        card.request_sort(ProcSortKey::Cpu);
        card.request_sort(ProcSortKey::Cpu);
        assert_eq!(card.selected_index(), Some(0));
        card.move_selection(5);
        assert_eq!(card.selected, Some(1));
        card.move_selection(-10);
        assert_eq!(card.selected, Some(2));
        assert_eq!(card.selected_record().map(|p| p.name.as_str()), Some("b"));
    }

    #[test]
    fn load_more_uses_filtered_length() {
        let json: Vec<String> = (1..=25)
            .map(|i| format!(r#"{{"pid":{i},"name":"p{i}"}}"#))
            .collect();
        let mut card = card_with(&format!("[{}]", json.join(",")));
        assert_eq!(card.displayed().len(), 10);
        card.load_more();
        assert_eq!(card.displayed().len(), 20);
        card.load_more();
        assert_eq!(card.displayed().len(), 25);
        assert_eq!(card.total_threads(), 0);
    }

    #[tokio::test]
    async fn detail_is_scoped_to_selection() {
        let mut card = card_with(r#"[{"pid":7,"name":"x"}]"#);
        card.open_detail();
        assert!(card.detail.is_none());

        card.move_selection(0);
        card.open_detail();
        let d = card.detail.as_ref().unwrap();
        assert_eq!(d.pid, 7);
        assert_eq!(d.io.path(), "api/process/7/io");
        assert!(d.io.is_running());

        card.close_detail();
        assert!(card.detail.is_none());
    }

    #[tokio::test]
    async fn detail_closes_when_its_process_exits() {
        let mut card = card_with(r#"[{"pid":7,"name":"x"}]"#);
        card.move_selection(0);
        card.open_detail();
        assert!(card.detail.is_some());

        card.poller
            .inject(serde_json::from_str(r#"[{"pid":8,"name":"y"}]"#).unwrap());
        card.refresh();
        assert_eq!(card.selected, None);
        assert!(card.detail.is_none());
    }

    #[tokio::test]
    async fn detail_survives_while_its_process_lives() {
        let mut card = card_with(r#"[{"pid":7,"name":"x"},{"pid":8,"name":"y"}]"#);
        card.move_selection(0);
        card.open_detail();
        card.poller
            .inject(serde_json::from_str(r#"[{"pid":7,"name":"x"}]"#).unwrap());
        card.refresh();
        assert_eq!(card.selected, Some(7));
        assert!(card.detail.as_ref().is_some_and(|d| d.io.is_running()));
        card.close_detail();
    }

    #[tokio::test]
    async fn emptied_list_clears_selection_and_detail() {
        let mut card = card_with(r#"[{"pid":7,"name":"x"}]"#);
        card.move_selection(0);
        card.open_detail();
        card.poller.inject(Vec::new());
        card.move_selection(1);
        assert_eq!(card.selected, None);
        assert!(card.detail.is_none());
    }
}
