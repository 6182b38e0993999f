//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use taskdeck_core::{Task, TaskComment, TaskHistory, TaskStats, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single task in full
    pub fn print_task(&self, task: &Task) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", task.id);
                println!("Title:       {}", task.title);
                if !task.description.is_empty() {
                    println!("Description: {}", task.description);
                }
                println!("Status:      {}", task.status);
                println!("Priority:    {}", task.priority);
                if let Some(ref name) = task.assigned_to_name {
                    println!("Assigned:    {}", name);
                } else {
                    println!("Assigned:    (nobody)");
                }
                println!("Created:     {}", task.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(task).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", task.id);
            }
        }
    }

    /// Print a task list, one line per task
    pub fn print_tasks(&self, tasks: &[&Task]) {
        match self.format {
            OutputFormat::Human => {
                if tasks.is_empty() {
                    println!("No tasks found.");
                    return;
                }
                for task in tasks {
                    let assignee = task
                        .assigned_to_name
                        .as_deref()
                        .unwrap_or("-");
                    println!(
                        "#{:<5} {:<12} {:<9} {:<35} {}",
                        task.id,
                        task.status.label(),
                        task.priority.label(),
                        truncate(&task.title, 35),
                        assignee
                    );
                }
                println!("\n{} task(s)", tasks.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tasks).unwrap());
            }
            OutputFormat::Quiet => {
                for task in tasks {
                    println!("{}", task.id);
                }
            }
        }
    }

    /// Print aggregate counts
    pub fn print_stats(&self, stats: &TaskStats) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "{} total | {} to do | {} in progress | {} done",
                    stats.total, stats.todo, stats.in_progress, stats.done
                );
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "total": stats.total,
                        "todo": stats.todo,
                        "in_progress": stats.in_progress,
                        "done": stats.done
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the user list
    pub fn print_users(&self, users: &[User]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users found.");
                    return;
                }
                for user in users {
                    println!("#{:<5} {:<20} {}", user.id, user.username, user.label());
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(users).unwrap());
            }
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.id);
                }
            }
        }
    }

    /// Print a task's comments, newest first
    pub fn print_comments(&self, comments: &[TaskComment]) {
        match self.format {
            OutputFormat::Human => {
                if comments.is_empty() {
                    println!("No comments yet.");
                    return;
                }
                for comment in comments {
                    println!(
                        "[{}] {}: {}",
                        comment.commented_at.format("%Y-%m-%d %H:%M"),
                        comment.commented_by,
                        comment.comment
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(comments).unwrap());
            }
            OutputFormat::Quiet => {
                for comment in comments {
                    println!("{}", comment.id);
                }
            }
        }
    }

    /// Print a task's audit trail
    pub fn print_history(&self, history: &[TaskHistory]) {
        match self.format {
            OutputFormat::Human => {
                if history.is_empty() {
                    println!("No history available.");
                    return;
                }
                for entry in history {
                    let assigned = entry
                        .assigned_to
                        .as_deref()
                        .map(|name| format!(" (assigned: {})", name))
                        .unwrap_or_default();
                    println!(
                        "[{}] {} -> {} by {}{}",
                        entry.changed_at.format("%Y-%m-%d %H:%M"),
                        entry.previous_status,
                        entry.new_status,
                        entry.changed_by,
                        assigned
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(history).unwrap());
            }
            OutputFormat::Quiet => {
                for entry in history {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate to at most `max_len` characters, adding "..." if truncated
///
/// Counts chars rather than bytes so multibyte titles never split
/// mid-character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", prefix)
    }
}
