use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use hrsync_core::config::HrSyncConfig;
use hrsync_core::types::{EmployeeFilters, FilterPatch};
use hrsync_state::{
    DirectoryState, EmployeeDirectory, SearchDebouncer, SyncCenter, SyncCenterState, SyncError,
    SyncWorkflow, WorkflowState,
};

use crate::events::UiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Directory,
    Sync,
    Config,
}

impl Tab {
    pub const ALL: &[Tab] = &[Tab::Directory, Tab::Sync, Tab::Config];

    pub fn title(&self) -> &str {
        match self {
            Tab::Directory => "Employees",
            Tab::Sync => "Sync Center",
            Tab::Config => "Config",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Directory => Tab::Sync,
            Tab::Sync => Tab::Config,
            Tab::Config => Tab::Directory,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Directory => Tab::Config,
            Tab::Sync => Tab::Directory,
            Tab::Config => Tab::Sync,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub tab: Tab,
    pub mode: InputMode,
    pub should_quit: bool,
    pub config: HrSyncConfig,
    /// Shown in the header: base URL or "demo"
    pub backend: String,
    pub search_input: String,
    pub employee_cursor: usize,
    pub need_cursor: usize,
    /// Index into the department list, `None` = all departments
    pub department_index: Option<usize>,
    pub notice: Option<String>,

    directory: Arc<EmployeeDirectory>,
    sync: Arc<SyncCenter>,
    debouncer: SearchDebouncer,
    directory_rx: watch::Receiver<DirectoryState>,
    workflow_rx: watch::Receiver<WorkflowState>,
    center_rx: watch::Receiver<SyncCenterState>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl App {
    pub fn new(
        config: HrSyncConfig,
        backend: String,
        directory: Arc<EmployeeDirectory>,
        workflow: Arc<SyncWorkflow>,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        let sync = Arc::new(SyncCenter::new(
            workflow.clone(),
            config.ui.recheck_delay(),
        ));
        let debouncer = SearchDebouncer::new(directory.clone(), config.ui.search_debounce());
        Self {
            tab: Tab::Directory,
            mode: InputMode::Normal,
            should_quit: false,
            backend,
            search_input: String::new(),
            employee_cursor: 0,
            need_cursor: 0,
            department_index: None,
            notice: None,
            directory_rx: directory.subscribe(),
            workflow_rx: workflow.subscribe(),
            center_rx: sync.subscribe(),
            directory,
            sync,
            debouncer,
            events,
            config,
        }
    }

    pub fn directory(&self) -> watch::Ref<'_, DirectoryState> {
        self.directory_rx.borrow()
    }

    pub fn workflow(&self) -> watch::Ref<'_, WorkflowState> {
        self.workflow_rx.borrow()
    }

    pub fn center(&self) -> watch::Ref<'_, SyncCenterState> {
        self.center_rx.borrow()
    }

    /// True when any state container published since the last call.
    pub fn take_changes(&mut self) -> bool {
        let changed = self.directory_rx.has_changed().unwrap_or(false)
            | self.workflow_rx.has_changed().unwrap_or(false)
            | self.center_rx.has_changed().unwrap_or(false);
        let _ = self.directory_rx.borrow_and_update();
        let _ = self.workflow_rx.borrow_and_update();
        let _ = self.center_rx.borrow_and_update();
        changed
    }

    /// Initial loads, the equivalent of mounting the directory view.
    pub fn start(&self) {
        let dir = self.directory.clone();
        tokio::spawn(async move {
            let _ = dir.fetch_departments().await;
        });
        self.spawn_directory(|dir| async move {
            dir.fetch_employees(EmployeeFilters::default()).await;
        });
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Notice(msg) | UiEvent::Failure(msg) => self.notice = Some(msg),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.mode == InputMode::Search {
            self.handle_search_key(key);
            return;
        }

        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.switch_tab(self.tab.next()),
            KeyCode::BackTab => self.switch_tab(self.tab.prev()),
            KeyCode::Char('1') => self.switch_tab(Tab::Directory),
            KeyCode::Char('2') => self.switch_tab(Tab::Sync),
            KeyCode::Char('3') => self.switch_tab(Tab::Config),
            _ => match self.tab {
                Tab::Directory => self.handle_directory_key(key),
                Tab::Sync => self.handle_sync_key(key),
                Tab::Config => {}
            },
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        if self.tab == Tab::Directory {
            // pending keystrokes are dropped, so show the filter actually applied
            self.debouncer.cancel();
            let search = self.directory().filters.search.clone();
            self.search_input = search;
            self.mode = InputMode::Normal;
        }
        self.tab = tab;
        if tab == Tab::Sync {
            self.spawn_sync(|sync| async move {
                sync.refresh().await;
            });
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search_input.pop();
                self.debouncer.input(self.search_input.clone());
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.debouncer.input(self.search_input.clone());
            }
            _ => {}
        }
    }

    fn handle_directory_key(&mut self, key: KeyEvent) {
        let len = self.directory().employees.len();
        match key.code {
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Char('j') | KeyCode::Down => {
                self.employee_cursor = step(self.employee_cursor, len, 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.employee_cursor = step(self.employee_cursor, len, -1);
            }
            KeyCode::Char('d') => self.cycle_department(),
            KeyCode::Char('c') => {
                self.debouncer.cancel();
                self.search_input.clear();
                self.department_index = None;
                self.employee_cursor = 0;
                self.spawn_directory(|dir| async move {
                    dir.clear_filters().await;
                });
            }
            KeyCode::Char('r') => self.spawn_directory(|dir| async move {
                dir.refresh().await;
            }),
            KeyCode::Enter => {
                let id = self
                    .directory()
                    .employees
                    .get(self.employee_cursor)
                    .map(|e| e.employee_id);
                if let Some(id) = id {
                    self.spawn_directory(move |dir| async move {
                        dir.fetch_employee(id).await;
                    });
                }
            }
            KeyCode::Backspace => self.directory.clear_selected_employee(),
            _ => {}
        }
    }

    fn cycle_department(&mut self) {
        let count = self.directory().departments.len();
        if count == 0 {
            self.notice = Some("no departments loaded".into());
            return;
        }
        self.department_index = match self.department_index {
            None => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            Some(_) => None,
        };
        let department_id = self
            .department_index
            .and_then(|i| self.directory().departments.get(i).map(|d| d.department_id));
        self.employee_cursor = 0;
        self.spawn_directory(move |dir| async move {
            dir.set_filters(FilterPatch::department(department_id)).await;
        });
    }

    fn handle_sync_key(&mut self, key: KeyEvent) {
        let len = self.workflow().sync_needs.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.need_cursor = step(self.need_cursor, len, 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.need_cursor = step(self.need_cursor, len, -1);
            }
            KeyCode::Char(' ') => {
                let id = self
                    .workflow()
                    .sync_needs
                    .get(self.need_cursor)
                    .map(|n| n.employee_id);
                if let Some(id) = id {
                    self.sync.toggle(id);
                }
            }
            KeyCode::Char('a') => self.sync.toggle_all(),
            KeyCode::Char('c') => self.sync.clear_selection(),
            KeyCode::Char('r') => {
                if self.workflow().phase.is_busy() || self.center().reconciling {
                    self.notice = Some("sync in progress".into());
                } else {
                    self.spawn_sync(|sync| async move {
                        sync.refresh().await;
                    });
                }
            }
            KeyCode::Char('x') | KeyCode::Char('s') => self.execute(),
            KeyCode::Char('d') => self.sync.dismiss_result(),
            _ => {}
        }
    }

    fn execute(&mut self) {
        if !self.sync.can_execute() {
            self.notice = Some(if self.center().selection.is_empty() {
                "select employees to sync first".into()
            } else {
                "sync in progress".into()
            });
            return;
        }
        let events = self.events.clone();
        self.spawn_sync(move |sync| async move {
            let msg = match sync.execute_selected().await {
                Ok(r) => UiEvent::Notice(format!(
                    "{} (synced {}, failed {})",
                    r.message, r.synced_count, r.failed_count
                )),
                Err(SyncError::EmptySelection) => {
                    UiEvent::Notice("select employees to sync first".into())
                }
                Err(e) => UiEvent::Failure(format!("sync failed: {e}")),
            };
            let _ = events.send(msg);
        });
    }

    fn spawn_directory<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<EmployeeDirectory>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        debug!("spawning directory action");
        tokio::spawn(f(self.directory.clone()));
    }

    fn spawn_sync<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<SyncCenter>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(f(self.sync.clone()));
    }
}

fn step(cursor: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}
