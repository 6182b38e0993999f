//! taskdeck TUI
//!
//! Terminal user interface for taskdeck - a single-page view of the team
//! task list.
//!
//! ## Layout
//!
//! - Header: aggregate counts and the active filter
//! - Main: filtered task list, with a detail pane (comments/history)
//!   when a task is opened
//! - Bottom: status bar / input line
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - /: Live search
//! - s: Cycle status filter (All -> To Do -> In Progress -> Done -> Deleted)
//! - Enter: Open task detail
//! - Tab: Switch Comments/History tab
//! - q: Quit
//!
//! ## Actions
//!
//! - t: Toggle complete
//! - c: Close task
//! - d: Delete task (soft)
//! - a: Assign (enter user id)
//! - u: Unassign
//! - n: New comment (detail open)
//! - r: Reload from server

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskdeck_core::{ApiEvent, Config, TaskDetail, Workspace};

use app::{App, DetailTab, InputMode};

/// Run the TUI application
pub async fn run(mut workspace: Workspace, config: &Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if TASKDECK_LOG is set)
    init_tui_logging(config);

    let mut api_events = workspace
        .client_mut()
        .take_events()
        .context("API event channel already taken")?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new();

    // Initial load
    if workspace.is_authenticated() {
        if let Err(e) = workspace.refresh().await {
            app.set_error(format!("Failed to load workspace: {}", e));
        }
    } else {
        app.set_error("No active session. Run `taskdeck login` first.".to_string());
    }

    let result = run_app(&mut terminal, &mut app, &mut workspace, &mut api_events).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    workspace: &mut Workspace,
    api_events: &mut mpsc::UnboundedReceiver<ApiEvent>,
) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app, workspace))?;

        tokio::select! {
            biased;

            // Session teardown announced by the API client
            api_event = api_events.recv() => {
                if let Some(ApiEvent::SessionExpired) = api_event {
                    app.close_detail();
                    app.set_error(
                        "Session expired. Run `taskdeck login` to start a new one.".to_string(),
                    );
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                // Check for terminal events (non-blocking)
                if event::poll(std::time::Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // Error line: any key dismisses it; with no session
                        // left there is nothing to do but leave
                        if app.has_error() {
                            app.clear_error();
                            if !workspace.is_authenticated() {
                                app.should_quit = true;
                            }
                            continue;
                        }

                        // Help overlay: any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => {
                                handle_normal_mode(app, workspace, key.code, key.modifiers).await;
                            }
                            InputMode::Search => handle_search_mode(app, workspace, key.code),
                            InputMode::Comment => {
                                handle_comment_mode(app, workspace, key.code).await;
                            }
                            InputMode::Assign => {
                                handle_assign_mode(app, workspace, key.code).await;
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
async fn handle_normal_mode(
    app: &mut App,
    workspace: &mut Workspace,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => {
            app.status_message = None;
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.status_message = None;
            let len = app.visible(workspace).len();
            app.move_down(len);
        }

        // Live search
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }

        // Cycle status filter
        KeyCode::Char('s') => {
            app.cycle_status_filter(workspace);
        }

        // Reload from server
        KeyCode::Char('r') => match workspace.refresh().await {
            Ok(()) => {
                let len = app.visible(workspace).len();
                app.clamp_selection(len);
                app.set_status("Reloaded".to_string());
            }
            Err(e) => app.set_error(format!("Reload failed: {}", e)),
        },

        // Open detail
        KeyCode::Enter => {
            if let Some(id) = app.selected_task_id(workspace) {
                let mut detail = TaskDetail::new(id);
                match detail.load(workspace.client()).await {
                    Ok(()) => {
                        app.detail = Some(detail);
                        app.detail_tab = DetailTab::Comments;
                    }
                    Err(e) => app.set_error(format!("Failed to load details: {}", e)),
                }
            }
        }

        // Close detail
        KeyCode::Esc => {
            app.close_detail();
        }

        // Switch detail tab
        KeyCode::Tab => {
            if app.detail.is_some() {
                app.detail_tab = app.detail_tab.next();
            }
        }

        // New comment (detail open)
        KeyCode::Char('n') => {
            if app.detail.is_some() {
                app.input.clear();
                app.input_mode = InputMode::Comment;
            }
        }

        // Toggle complete
        KeyCode::Char('t') => {
            if let Some(id) = app.selected_task_id(workspace) {
                match workspace.toggle_complete(id).await {
                    Ok(task) => {
                        app.set_status(format!("Task #{} is now {}", task.id, task.status.label()))
                    }
                    Err(e) => app.set_error(format!("Toggle failed: {}", e)),
                }
            }
        }

        // Close task
        KeyCode::Char('c') => {
            if let Some(id) = app.selected_task_id(workspace) {
                match workspace.close_task(id).await {
                    Ok(task) => {
                        app.set_status(format!("Task #{} is now {}", task.id, task.status.label()))
                    }
                    Err(e) => app.set_error(format!("Close failed: {}", e)),
                }
            }
        }

        // Soft-delete task
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_task_id(workspace) {
                match workspace.delete_task(id).await {
                    Ok(task) => {
                        let len = app.visible(workspace).len();
                        app.clamp_selection(len);
                        app.set_status(format!("Task #{} marked {}", task.id, task.status.label()));
                    }
                    Err(e) => app.set_error(format!("Delete failed: {}", e)),
                }
            }
        }

        // Assign (enter user id)
        KeyCode::Char('a') => {
            if app.selected_task_id(workspace).is_some() {
                app.input.clear();
                app.input_mode = InputMode::Assign;
            }
        }

        // Unassign
        KeyCode::Char('u') => {
            if let Some(id) = app.selected_task_id(workspace) {
                match workspace.unassign_task(id).await {
                    Ok(task) => app.set_status(format!("Task #{} unassigned", task.id)),
                    Err(e) => app.set_error(format!("Unassign failed: {}", e)),
                }
            }
        }

        // Help
        KeyCode::Char('?') => {
            app.show_help = true;
        }

        _ => {}
    }
}

/// Handle key events in search mode (edits the live filter)
fn handle_search_mode(app: &mut App, workspace: &Workspace, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.filter.query.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.filter.query.pop();
        }
        KeyCode::Char(c) => {
            app.filter.query.push(c);
        }
        _ => {}
    }
    let len = app.visible(workspace).len();
    app.clamp_selection(len);
}

/// Handle key events while composing a comment
async fn handle_comment_mode(app: &mut App, workspace: &mut Workspace, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let text = app.input.clone();
            app.input.clear();
            app.input_mode = InputMode::Normal;

            if let Some(ref mut detail) = app.detail {
                match detail.add_comment(workspace.client(), &text).await {
                    Ok(_) => app.set_status("Comment added".to_string()),
                    Err(e) => app.set_error(format!("Comment failed: {}", e)),
                }
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}

/// Handle key events while entering a user id to assign
async fn handle_assign_mode(app: &mut App, workspace: &mut Workspace, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let input = app.input.clone();
            app.input.clear();
            app.input_mode = InputMode::Normal;

            let Ok(user_id) = input.trim().parse::<i64>() else {
                app.set_error(format!("Not a user id: {}", input));
                return;
            };
            if let Some(id) = app.selected_task_id(workspace) {
                match workspace.assign_task(id, Some(user_id)).await {
                    Ok(task) => {
                        let assignee = task.assigned_to_name.as_deref().unwrap_or("(unknown)");
                        app.set_status(format!("Task #{} assigned to {}", task.id, assignee));
                    }
                    Err(e) => app.set_error(format!("Assign failed: {}", e)),
                }
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            app.input.push(c);
        }
        _ => {}
    }
}

/// Initialize file-based TUI logging
fn init_tui_logging(config: &Config) {
    // Only log if TASKDECK_LOG is set
    let Ok(log_level) = std::env::var("TASKDECK_LOG") else {
        return;
    };

    let log_path = config.data_dir.join("debug.log");

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "taskdeck_core={},taskdeck_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
