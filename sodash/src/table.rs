//! Filter, sort and paginate projection over the in-memory process list.
//!
//! Everything here is a pure function of the view state and the records
//! passed in; nothing is cached between calls.

use std::cmp::Ordering;

use crate::types::ProcessRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcSortKey {
    #[default]
    Pid,
    Name,
    User,
    Status,
    Cpu,
    Memory,
    Threads,
}

impl ProcSortKey {
    pub fn compare(self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            ProcSortKey::Pid => a.pid.cmp(&b.pid),
            ProcSortKey::Name => collate(&a.name, &b.name),
            ProcSortKey::User => collate(&a.user_name, &b.user_name),
            ProcSortKey::Status => collate(&a.status, &b.status),
            ProcSortKey::Cpu => cmp_f64(a.cpu_percent, b.cpu_percent),
            ProcSortKey::Memory => cmp_f64(a.memory_rss_mb, b.memory_rss_mb),
            ProcSortKey::Threads => a.threads.cmp(&b.threads),
        }
    }
}

/// Case-folded order first, raw order as the tie-break.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Case-insensitive match against name, pid and user.
pub fn matches(p: &ProcessRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    p.name.to_lowercase().contains(&needle)
        || p.pid.to_string().contains(&needle)
        || p.user_name.to_lowercase().contains(&needle)
}

pub const PAGE_SIZE: usize = 10;
pub const PAGE_INCREMENT: usize = 10;

#[derive(Debug, Clone)]
pub struct TableViewModel {
    search_term: String,
    sort_key: ProcSortKey,
    sort_dir: SortDirection,
    visible_count: usize,
    show_all: bool,
    page_size: usize,
    page_increment: usize,
}

impl Default for TableViewModel {
    fn default() -> Self {
        Self::new(PAGE_SIZE, PAGE_INCREMENT)
    }
}

impl TableViewModel {
    pub fn new(page_size: usize, page_increment: usize) -> Self {
        Self {
            search_term: String::new(),
            sort_key: ProcSortKey::default(),
            sort_dir: SortDirection::default(),
            visible_count: page_size,
            show_all: false,
            page_size,
            page_increment,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> (ProcSortKey, SortDirection) {
        (self.sort_key, self.sort_dir)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn page_increment(&self) -> usize {
        self.page_increment
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        if !self.show_all {
            self.visible_count = self.page_size;
        }
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn request_sort(&mut self, key: ProcSortKey) {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_key = key;
            self.sort_dir = SortDirection::Asc;
        }
    }

    pub fn load_more(&mut self, filtered_len: usize) {
        let next = (self.visible_count + self.page_increment).min(filtered_len);
        self.visible_count = self.visible_count.max(next);
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        if !self.show_all {
            self.visible_count = self.page_size;
        }
    }

    pub fn can_load_more(&self, filtered_len: usize) -> bool {
        !self.show_all && self.visible_count < filtered_len
    }

    pub fn remaining(&self, filtered_len: usize) -> usize {
        filtered_len.saturating_sub(self.visible_count)
    }

    pub fn filtered_sorted<'a>(&self, records: &'a [ProcessRecord]) -> Vec<&'a ProcessRecord> {
        let mut rows: Vec<&ProcessRecord> = records
            .iter()
            .filter(|p| matches(p, &self.search_term))
            .collect();
        let (key, dir) = (self.sort_key, self.sort_dir);
        // slice::sort_by is stable
        rows.sort_by(|a, b| dir.apply(key.compare(a, b)));
        rows
    }

    pub fn displayed<'a>(&self, filtered_sorted: &[&'a ProcessRecord]) -> Vec<&'a ProcessRecord> {
        if self.show_all {
            filtered_sorted.to_vec()
        } else {
            filtered_sorted
                .iter()
                .take(self.visible_count)
                .copied()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pid: u32, name: &str, user: &str, cpu: f64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.into(),
            user_name: user.into(),
            status: "running".into(),
            cpu_percent: cpu,
            memory_rss_mb: 0.0,
            threads: 1,
            ppid: 0,
            nice: 0,
            priority: 0,
            command_line: None,
            executable_path: None,
            create_time_iso: None,
            memory_details_kb: Default::default(),
            threads_detailed_info: vec![],
        }
    }

    fn pids(rows: &[&ProcessRecord]) -> Vec<u32> {
        rows.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn cpu_descending_and_filter() {
        let recs = vec![rec(1, "a", "root", 5.0), rec(2, "b", "root", 90.0)];
        let mut t = TableViewModel::default();
        t.request_sort(ProcSortKey::Cpu);
        t.request_sort(ProcSortKey::Cpu);
        assert_eq!(t.sort(), (ProcSortKey::Cpu, SortDirection::Desc));
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![2, 1]);

        let mut t = TableViewModel::default();
        t.set_search_term("a");
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![1]);
    }

    #[test]
    fn filter_is_case_insensitive_over_name_pid_user() {
        let recs = vec![
            rec(10, "Firefox", "alice", 1.0),
            rec(205, "sshd", "root", 1.0),
            rec(7, "bash", "ALICE", 1.0),
        ];
        let mut t = TableViewModel::default();
        t.set_search_term("FIRE");
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![10]);
        t.set_search_term("20");
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![205]);
        t.set_search_term("alice");
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![7, 10]);
        t.set_search_term("");
        assert_eq!(t.filtered_sorted(&recs).len(), 3);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let recs = vec![
            rec(3, "x", "u", 50.0),
            rec(1, "y", "u", 50.0),
            rec(2, "z", "u", 10.0),
        ];
        let mut t = TableViewModel::default();
        t.request_sort(ProcSortKey::Cpu);
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![2, 3, 1]);
        t.request_sort(ProcSortKey::Cpu);
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![3, 1, 2]);
        // pure: same inputs, same order
        assert_eq!(
            pids(&t.filtered_sorted(&recs)),
            pids(&t.filtered_sorted(&recs))
        );
    }

    #[test]
    fn names_collate_case_insensitively() {
        let recs = vec![
            rec(1, "beta", "u", 0.0),
            rec(2, "Alpha", "u", 0.0),
            rec(3, "alpha", "u", 0.0),
        ];
        let mut t = TableViewModel::default();
        t.request_sort(ProcSortKey::Name);
        assert_eq!(pids(&t.filtered_sorted(&recs)), vec![2, 3, 1]);
    }

    #[test]
    fn new_key_resets_to_ascending() {
        let mut t = TableViewModel::default();
        t.request_sort(ProcSortKey::Pid);
        assert_eq!(t.sort().1, SortDirection::Desc);
        t.request_sort(ProcSortKey::Memory);
        assert_eq!(t.sort(), (ProcSortKey::Memory, SortDirection::Asc));
    }

    #[test]
    fn load_more_clamps_to_filtered_length() {
        let recs: Vec<ProcessRecord> = (0..25).map(|i| rec(i, "p", "u", 0.0)).collect();
        let mut t = TableViewModel::new(10, 10);
        let fs = t.filtered_sorted(&recs);
        assert_eq!(t.displayed(&fs).len(), 10);
        t.load_more(fs.len());
        assert_eq!(t.displayed(&fs).len(), 20);
        assert_eq!(t.remaining(fs.len()), 5);
        t.load_more(fs.len());
        assert_eq!(t.displayed(&fs).len(), 25);
        assert_eq!(t.visible_count(), 25);
        assert!(!t.can_load_more(fs.len()));
    }

    #[test]
    fn load_more_never_shrinks() {
        let mut t = TableViewModel::new(10, 10);
        t.load_more(40);
        t.load_more(12);
        assert_eq!(t.visible_count(), 20);
    }

    #[test]
    fn search_and_show_all_reset_page() {
        let mut t = TableViewModel::new(10, 10);
        t.load_more(100);
        t.set_search_term("x");
        assert_eq!(t.visible_count(), 10);

        t.load_more(100);
        t.toggle_show_all();
        t.set_search_term("y");
        // show-all keeps the count while filtering
        assert_eq!(t.visible_count(), 20);
        t.toggle_show_all();
        assert_eq!(t.visible_count(), 10);
    }

    #[test]
    fn show_all_displays_everything() {
        let recs: Vec<ProcessRecord> = (0..25).map(|i| rec(i, "p", "u", 0.0)).collect();
        let mut t = TableViewModel::new(10, 10);
        t.toggle_show_all();
        let fs = t.filtered_sorted(&recs);
        assert_eq!(t.displayed(&fs).len(), 25);
        assert!(!t.can_load_more(fs.len()));
    }
}
