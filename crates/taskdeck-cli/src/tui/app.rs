//! Application state and logic

use std::time::Instant;

use taskdeck_core::{Task, TaskDetail, TaskFilter, Workspace};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Live search editing (after pressing /)
    Search,
    /// Composing a comment on the open detail view
    Comment,
    /// Entering a user id to assign
    Assign,
}

/// Which tab the detail pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Comments,
    History,
}

impl DetailTab {
    pub fn next(self) -> Self {
        match self {
            DetailTab::Comments => DetailTab::History,
            DetailTab::History => DetailTab::Comments,
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Combined search + status filter over the workspace tasks
    pub filter: TaskFilter,
    /// Selected index into the filtered list
    pub selected: usize,
    /// Open detail view, if any
    pub detail: Option<TaskDetail>,
    /// Active detail tab
    pub detail_tab: DetailTab,
    /// Input buffer for Comment/Assign modes
    pub input: String,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Error message shown until the next keypress
    pub error: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            filter: TaskFilter::default(),
            selected: 0,
            detail: None,
            detail_tab: DetailTab::Comments,
            input: String::new(),
            status_message: None,
            status_message_time: None,
            error: None,
            show_help: false,
        }
    }

    /// Tasks visible under the current filter
    pub fn visible<'a>(&self, workspace: &'a Workspace) -> Vec<&'a Task> {
        workspace.filtered(&self.filter)
    }

    /// Id of the selected task, if any
    pub fn selected_task_id(&self, workspace: &Workspace) -> Option<i64> {
        self.visible(workspace).get(self.selected).map(|t| t.id)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, visible_len: usize) {
        if visible_len > 0 && self.selected + 1 < visible_len {
            self.selected += 1;
        }
    }

    /// Keep the selection inside the filtered list after it changes
    pub fn clamp_selection(&mut self, visible_len: usize) {
        if visible_len == 0 {
            self.selected = 0;
        } else if self.selected >= visible_len {
            self.selected = visible_len - 1;
        }
    }

    /// Cycle the status filter and re-clamp
    pub fn cycle_status_filter(&mut self, workspace: &Workspace) {
        self.filter.status = self.filter.status.next();
        let len = self.visible(workspace).len();
        self.clamp_selection(len);
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_time = Some(Instant::now());
    }

    /// Auto-dismiss the status message after a few seconds
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 4 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Close the detail view and drop its buffers
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_tab = DetailTab::Comments;
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }
}
