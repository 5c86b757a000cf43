//! sodash: terminal dashboard for an OS monitoring REST API.
//!
//! Each card subscribes to one endpoint through a [`poller::MetricPoller`],
//! keeps a bounded [`history::HistoryBuffer`] for its charts and draws itself
//! from whatever the poller last applied.

pub mod api;
pub mod app;
pub mod cards;
pub mod config;
pub mod error;
pub mod history;
pub mod poller;
pub mod table;
pub mod types;
pub mod ui;
pub mod visibility;
