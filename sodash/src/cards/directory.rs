//! Directory browser. Changing directory re-points the poller, so the listing
//! goes back to loading and a late answer for the old path is never shown.

use std::cmp::Ordering;

use tracing::debug;

use crate::api::{self, ApiClient};
use crate::config::PollingConfig;
use crate::poller::MetricPoller;
use crate::table::{collate, SortDirection};
use crate::types::{DirEntry, DirectoryListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirSortKey {
    #[default]
    Name,
    Size,
    Permissions,
    Type,
}

impl DirSortKey {
    pub fn compare(self, a: &DirEntry, b: &DirEntry) -> Ordering {
        match self {
            DirSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            DirSortKey::Size => a.size.cmp(&b.size),
            DirSortKey::Permissions => collate(
                a.permissions.as_deref().unwrap_or(""),
                b.permissions.as_deref().unwrap_or(""),
            ),
            // directories first
            DirSortKey::Type => b.is_dir.cmp(&a.is_dir),
        }
    }
}

pub fn child_path(current: &str, name: &str) -> String {
    if current == "/" {
        format!("/{name}")
    } else {
        format!("{}/{name}", current.trim_end_matches('/'))
    }
}

/// Parent of `current`; the root is its own parent.
pub fn parent_path(current: &str) -> String {
    let mut parts: Vec<&str> = current.split('/').filter(|s| !s.is_empty()).collect();
    parts.pop();
    format!("/{}", parts.join("/"))
}

pub struct DirectoryCard {
    pub poller: MetricPoller<DirectoryListing>,
    path: String,
    cursor: usize,
    sort: (DirSortKey, SortDirection),
}

impl DirectoryCard {
    pub fn new(client: ApiClient, polling: &PollingConfig, path: &str) -> Self {
        let every = PollingConfig::every(polling.directory_ms);
        Self {
            poller: MetricPoller::new("directory", client, api::directory(path), every)
                .with_timeout(polling.timeout_for(every)),
            path: path.to_string(),
            cursor: 0,
            sort: (DirSortKey::default(), SortDirection::Asc),
        }
    }

    pub fn refresh(&mut self) -> usize {
        let n = self.poller.drain(|_, _| {});
        let len = self.sorted().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        n
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sort(&self) -> (DirSortKey, SortDirection) {
        self.sort
    }

    pub fn navigate(&mut self, path: String) {
        if path == self.path {
            return;
        }
        debug!(from = %self.path, to = %path, "changing directory");
        self.path = path;
        self.cursor = 0;
        self.poller.restart(api::directory(&self.path));
    }

    pub fn go_up(&mut self) {
        if self.path == "/" {
            return;
        }
        let parent = parent_path(&self.path);
        self.navigate(parent);
    }

    /// Enter the entry under the cursor. Files are ignored.
    pub fn enter_selected(&mut self) -> bool {
        let target = match self.sorted().get(self.cursor) {
            Some(e) if e.is_dir => child_path(&self.path, &e.name),
            _ => return false,
        };
        self.navigate(target);
        true
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.sorted().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn request_sort(&mut self, key: DirSortKey) {
        self.sort = if self.sort.0 == key {
            (key, self.sort.1.flipped())
        } else {
            (key, SortDirection::Asc)
        };
    }

    pub fn sorted(&self) -> Vec<&DirEntry> {
        let mut rows: Vec<&DirEntry> = self
            .poller
            .snapshot()
            .map(|l| l.contents.iter().collect())
            .unwrap_or_default();
        let (key, dir) = self.sort;
        rows.sort_by(|a, b| dir.apply(key.compare(a, b)));
        rows
    }
}
