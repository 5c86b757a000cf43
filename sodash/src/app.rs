//! App state and main loop: input handling, applying poll results, and drawing.

use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::cards::directory::DirSortKey;
use crate::cards::memory::{RAM, SWAP};
use crate::cards::Dashboard;
use crate::config::ConfigFile;
use crate::table::ProcSortKey;
use crate::ui::{
    cpu::{draw_cpu_chart, draw_per_core_bars},
    directory::draw_directory,
    filesystem::draw_filesystem,
    header::draw_header,
    mem::draw_mem,
    processes::{draw_process_detail, draw_processes, processes_handle_mouse},
    status::draw_status,
    totals::draw_totals,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    pub dashboard: Dashboard,
    pub mode: InputMode,
    search: String,

    // Quit flag
    should_quit: bool,

    last_procs_area: Option<Rect>,
    tick: Duration,
}

impl App {
    pub fn new(client: ApiClient, config: ConfigFile) -> Self {
        Self {
            dashboard: Dashboard::new(client, config),
            mode: InputMode::Normal,
            search: String::new(),
            should_quit: false,
            last_procs_area: None,
            tick: Duration::from_millis(200),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        self.dashboard.start();

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        self.dashboard.stop();
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("dashboard closed");

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k),
                    Event::Mouse(m) => {
                        if let Some(p_area) = self.last_procs_area {
                            if let Some(key) = processes_handle_mouse(m, p_area) {
                                self.dashboard.processes.request_sort(key);
                            }
                        }
                    }
                    _ => {}
                }
            }
            if self.should_quit {
                break;
            }

            // Apply whatever the pollers delivered
            self.dashboard.refresh();

            // Draw
            terminal.draw(|f| self.draw(f))?;

            // Tick rate
            sleep(self.tick).await;
        }

        Ok(())
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            InputMode::Search => self.handle_search_key(k),
            InputMode::Normal => self.handle_normal_key(k),
        }
    }

    fn handle_search_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => self.search.push(c),
            _ => return,
        }
        self.dashboard.processes.set_search_term(self.search.clone());
    }

    fn handle_normal_key(&mut self, k: KeyEvent) {
        let d = &mut self.dashboard;
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('/') => {
                debug!("entering search");
                self.mode = InputMode::Search;
            }

            // process table
            KeyCode::Char('p') => d.processes.request_sort(ProcSortKey::Pid),
            KeyCode::Char('n') => d.processes.request_sort(ProcSortKey::Name),
            KeyCode::Char('u') => d.processes.request_sort(ProcSortKey::User),
            KeyCode::Char('s') => d.processes.request_sort(ProcSortKey::Status),
            KeyCode::Char('c') => d.processes.request_sort(ProcSortKey::Cpu),
            KeyCode::Char('m') => d.processes.request_sort(ProcSortKey::Memory),
            KeyCode::Char('t') => d.processes.request_sort(ProcSortKey::Threads),
            KeyCode::Char('l') => d.processes.load_more(),
            KeyCode::Char('a') => d.processes.toggle_show_all(),
            KeyCode::Up => d.processes.move_selection(-1),
            KeyCode::Down => d.processes.move_selection(1),
            KeyCode::Enter => d.processes.open_detail(),
            KeyCode::Char('x') | KeyCode::Backspace => d.processes.close_detail(),

            // chart legends
            KeyCode::Char('o') => d.cpu.toggle_overall(),
            KeyCode::Char(c @ '0'..='9') => {
                let id = u64::from(c as u8 - b'0');
                if !d.cpu.toggle_core(id) {
                    debug!(id, "no such core series");
                }
            }
            KeyCode::Char('r') => d.memory.chart.toggle(RAM),
            KeyCode::Char('w') => d.memory.chart.toggle(SWAP),

            // directory browser
            KeyCode::Char('[') => d.directory.go_up(),
            KeyCode::Char(']') => {
                d.directory.enter_selected();
            }
            KeyCode::Char('j') => d.directory.move_cursor(1),
            KeyCode::Char('k') => d.directory.move_cursor(-1),
            KeyCode::Char('N') => d.directory.request_sort(DirSortKey::Name),
            KeyCode::Char('S') => d.directory.request_sort(DirSortKey::Size),
            KeyCode::Char('P') => d.directory.request_sort(DirSortKey::Permissions),
            KeyCode::Char('T') => d.directory.request_sort(DirSortKey::Type),
            _ => {}
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let d = &self.dashboard;

        // Root rows: header, cpu, memory/totals/status, bottom
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Ratio(1, 4), // cpu chart + per-core
                Constraint::Length(9),   // memory, totals, status
                Constraint::Min(10),     // processes (left), filesystem + directory (right)
            ])
            .split(area);

        draw_header(f, rows[0], d, self.mode == InputMode::Search);

        let top_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[1]);
        draw_cpu_chart(f, top_lr[0], &d.cpu);
        draw_per_core_bars(f, top_lr[1], &d.cpu);

        let mid = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(rows[2]);
        draw_mem(f, mid[0], &d.memory);
        draw_totals(f, mid[1], &d.totals);
        draw_status(f, mid[2], &d.status);

        let bottom_lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[3]);

        // Left bottom: processes, with the detail pane under it while open
        let procs_area = if d.processes.detail.is_some() {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(12)])
                .split(bottom_lr[0]);
            draw_process_detail(f, split[1], &d.processes);
            split[0]
        } else {
            bottom_lr[0]
        };
        draw_processes(f, procs_area, &d.processes);

        let right_stack = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(bottom_lr[1]);
        draw_filesystem(f, right_stack[0], &d.filesystem);
        draw_directory(f, right_stack[1], &d.directory);

        // Cache for input handlers
        self.last_procs_area = Some(procs_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        App::new(client, ConfigFile::default())
    }

    fn key(c: KeyCode) -> KeyEvent {
        KeyEvent::new(c, KeyModifiers::NONE)
    }

    #[test]
    fn search_mode_captures_letters() {
        let mut a = app();
        a.handle_key(key(KeyCode::Char('/')));
        assert_eq!(a.mode, InputMode::Search);
        for c in "qsh".chars() {
            a.handle_key(key(KeyCode::Char(c)));
        }
        a.handle_key(key(KeyCode::Backspace));
        assert!(!a.should_quit());
        assert_eq!(a.dashboard.processes.table.search_term(), "qs");
        a.handle_key(key(KeyCode::Enter));
        assert_eq!(a.mode, InputMode::Normal);

        a.handle_key(key(KeyCode::Char('q')));
        assert!(a.should_quit());
    }

    #[test]
    fn sort_and_legend_keys() {
        let mut a = app();
        a.handle_key(key(KeyCode::Char('c')));
        a.handle_key(key(KeyCode::Char('c')));
        let (k, dir) = a.dashboard.processes.table.sort();
        assert_eq!(k, ProcSortKey::Cpu);
        assert_eq!(dir, crate::table::SortDirection::Desc);

        a.dashboard
            .memory
            .chart
            .record(chrono::Local::now(), [(RAM, 1.0), (SWAP, 0.5)]);
        a.handle_key(key(KeyCode::Char('w')));
        assert!(!a.dashboard.memory.chart.visibility.is_visible(SWAP));
        assert!(a.dashboard.memory.chart.visibility.is_visible(RAM));

        a.handle_key(key(KeyCode::Char('S')));
        assert_eq!(a.dashboard.directory.sort().0, DirSortKey::Size);
    }

    #[test]
    fn ctrl_c_quits_from_search() {
        let mut a = app();
        a.handle_key(key(KeyCode::Char('/')));
        a.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.should_quit());
    }
}
