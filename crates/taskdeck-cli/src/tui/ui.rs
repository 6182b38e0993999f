//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use taskdeck_core::{Task, TaskStatus, Workspace};

use super::app::{App, DetailTab, InputMode};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, workspace: &Workspace) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, workspace, outer_chunks[0]);

    if app.detail.is_some() {
        let pane_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);
        draw_task_list(frame, app, workspace, pane_chunks[0]);
        draw_detail_pane(frame, app, workspace, pane_chunks[1]);
    } else {
        draw_task_list(frame, app, workspace, outer_chunks[1]);
    }

    draw_status_bar(frame, app, outer_chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Header: title, aggregate counts, active filter
fn draw_header(frame: &mut Frame, app: &App, workspace: &Workspace, area: Rect) {
    let stats = workspace.stats();

    let mut spans = vec![
        Span::styled(
            " taskdeck ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} total | {} to do | {} in progress | {} done",
            stats.total, stats.todo, stats.in_progress, stats.done
        )),
        Span::raw(format!("  [filter: {}]", app.filter.status.label())),
    ];
    if !app.filter.query.is_empty() {
        spans.push(Span::raw(format!("  [search: {}]", app.filter.query)));
    }
    if !workspace.is_authenticated() {
        spans.push(Span::styled(
            "  NOT LOGGED IN",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(header, area);
}

/// Middle pane: filtered task list
fn draw_task_list(frame: &mut Frame, app: &App, workspace: &Workspace, area: Rect) {
    let visible = app.visible(workspace);

    let items: Vec<ListItem> = visible.iter().map(|task| task_line(task)).collect();

    let block = Block::default()
        .title(format!(" Tasks ({}) ", visible.len()))
        .borders(Borders::ALL);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line(task: &Task) -> ListItem<'_> {
    let status_style = match task.status {
        TaskStatus::Todo => Style::default().fg(Color::Yellow),
        TaskStatus::InProgress => Style::default().fg(Color::Blue),
        TaskStatus::Done => Style::default().fg(Color::Green),
        TaskStatus::Deleted => Style::default().fg(Color::DarkGray),
    };

    let assignee = task
        .assigned_to_name
        .as_deref()
        .map(|name| format!(" @{}", name))
        .unwrap_or_default();

    ListItem::new(Line::from(vec![
        Span::raw(format!("#{:<4} ", task.id)),
        Span::styled(format!("{:<12}", task.status.label()), status_style),
        Span::raw(format!("{:<9} ", task.priority.label())),
        Span::raw(task.title.clone()),
        Span::styled(assignee, Style::default().fg(Color::Magenta)),
    ]))
}

/// Right pane: task fields plus comments/history tabs
fn draw_detail_pane(frame: &mut Frame, app: &App, workspace: &Workspace, area: Rect) {
    let Some(ref detail) = app.detail else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    if let Some(task) = workspace.task(detail.task_id()) {
        lines.push(Line::from(Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if !task.description.is_empty() {
            lines.push(Line::from(task.description.clone()));
        }
        lines.push(Line::from(format!(
            "{} | {} | {}",
            task.status,
            task.priority,
            task.assigned_to_name.as_deref().unwrap_or("unassigned")
        )));
        lines.push(Line::from(format!(
            "created {}",
            task.created_at.format("%Y-%m-%d %H:%M")
        )));
        lines.push(Line::from(""));
    }

    let (comments_style, history_style) = match app.detail_tab {
        DetailTab::Comments => (
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Style::default().fg(Color::DarkGray),
        ),
        DetailTab::History => (
            Style::default().fg(Color::DarkGray),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("Comments ({})", detail.comments().len()),
            comments_style,
        ),
        Span::raw("  "),
        Span::styled(format!("History ({})", detail.history().len()), history_style),
    ]));
    lines.push(Line::from(""));

    match app.detail_tab {
        DetailTab::Comments => {
            if detail.comments().is_empty() {
                lines.push(Line::from(Span::styled(
                    "No comments yet.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for comment in detail.comments() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", comment.commented_by),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        comment.commented_at.format("%Y-%m-%d %H:%M").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                lines.push(Line::from(format!("  {}", comment.comment)));
            }
        }
        DetailTab::History => {
            if detail.history().is_empty() {
                lines.push(Line::from(Span::styled(
                    "No history available.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for entry in detail.history() {
                lines.push(Line::from(format!(
                    "{}  {} -> {}  by {}",
                    entry.changed_at.format("%Y-%m-%d %H:%M"),
                    entry.previous_status,
                    entry.new_status,
                    entry.changed_by
                )));
            }
        }
    }

    let block = Block::default().title(" Detail ").borders(Borders::ALL);
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Bottom line: input buffers, errors, or key hints
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref error) = app.error {
        Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::White).bg(Color::Red),
        ))
    } else {
        match app.input_mode {
            InputMode::Search => Line::from(format!("/{}", app.filter.query)),
            InputMode::Comment => Line::from(format!("Comment: {}", app.input)),
            InputMode::Assign => Line::from(format!("Assign to user id: {}", app.input)),
            InputMode::Normal => {
                if let Some(ref message) = app.status_message {
                    Line::from(Span::styled(
                        message.clone(),
                        Style::default().fg(Color::Green),
                    ))
                } else {
                    Line::from(Span::styled(
                        " j/k move  / search  s filter  Enter detail  t toggle  c close  d delete  a assign  u unassign  ? help  q quit",
                        Style::default().fg(Color::DarkGray),
                    ))
                }
            }
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Centered help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let lines = vec![
        Line::from(Span::styled(
            "taskdeck keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("j/k or arrows   move selection"),
        Line::from("/               search title/description"),
        Line::from("s               cycle status filter"),
        Line::from("Enter           open task detail"),
        Line::from("Tab             switch Comments/History"),
        Line::from("n               new comment (detail open)"),
        Line::from("t               toggle complete"),
        Line::from("c               close task"),
        Line::from("d               delete task (soft)"),
        Line::from("a               assign to user id"),
        Line::from("u               unassign"),
        Line::from("r               reload from server"),
        Line::from("Esc             close detail / cancel input"),
        Line::from("q               quit"),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().title(" Help ").borders(Borders::ALL);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Helper to create a centered rect using percentages of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
