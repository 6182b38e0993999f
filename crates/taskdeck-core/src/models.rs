//! Data models for taskdeck
//!
//! Defines the core data structures: Task, User, TaskComment, and
//! TaskHistory, matching the JSON shapes served by the REST backend.
//! Status and priority enums travel on the wire as integers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task
///
/// `Deleted` is a terminal status: the backend soft-deletes by PATCHing
/// status rather than removing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Deleted,
}

impl TaskStatus {
    /// All statuses, in wire-value order
    pub fn all() -> [TaskStatus; 4] {
        [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Deleted,
        ]
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
            TaskStatus::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> u8 {
        match status {
            TaskStatus::Todo => 1,
            TaskStatus::InProgress => 2,
            TaskStatus::Done => 3,
            TaskStatus::Deleted => 4,
        }
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskStatus::Todo),
            2 => Ok(TaskStatus::InProgress),
            3 => Ok(TaskStatus::Done),
            4 => Ok(TaskStatus::Deleted),
            other => Err(format!("invalid task status: {}", other)),
        }
    }
}

/// Task priority, ordered most-to-least urgent
///
/// Wire values run 0 (Critical) through 4 (Minor), so the derived `Ord`
/// sorts by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TaskPriority {
    Critical,
    High,
    Medium,
    Low,
    Minor,
}

impl TaskPriority {
    /// All priorities, most urgent first
    pub fn all() -> [TaskPriority; 5] {
        [
            TaskPriority::Critical,
            TaskPriority::High,
            TaskPriority::Medium,
            TaskPriority::Low,
            TaskPriority::Minor,
        ]
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "Critical",
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
            TaskPriority::Minor => "Minor",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> u8 {
        match priority {
            TaskPriority::Critical => 0,
            TaskPriority::High => 1,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 3,
            TaskPriority::Minor => 4,
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskPriority::Critical),
            1 => Ok(TaskPriority::High),
            2 => Ok(TaskPriority::Medium),
            3 => Ok(TaskPriority::Low),
            4 => Ok(TaskPriority::Minor),
            other => Err(format!("invalid task priority: {}", other)),
        }
    }
}

/// A task as served by the backend
///
/// `id` is assigned by the server and immutable once created. Only `status`
/// and `assigned_to` change through the non-edit actions (assign, unassign,
/// close, toggle-complete); everything else changes only via edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier
    pub id: i64,
    /// Task title
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: String,
    /// Lifecycle status
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Assigned user id, if any
    #[serde(default)]
    pub assigned_to: Option<i64>,
    /// Display name of the assigned user (server-derived convenience)
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task matches a case-insensitive search over title and
    /// description
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    /// The status a toggle-complete action should request next:
    /// Done unless already Done, in which case back to Todo
    pub fn toggle_target(&self) -> TaskStatus {
        if self.status == TaskStatus::Done {
            TaskStatus::Todo
        } else {
            TaskStatus::Done
        }
    }
}

/// A user account, read-only from this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// Display label: full name when present, username otherwise
    pub fn label(&self) -> String {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            self.username.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string()
        }
    }
}

/// A comment on a task
///
/// Append-only: this client never edits or removes comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: i64,
    /// Owning task id
    #[serde(default)]
    pub task: i64,
    /// Author display name
    pub commented_by: String,
    /// Comment body
    pub comment: String,
    pub commented_at: DateTime<Utc>,
}

/// A status-change audit entry, server-generated and read-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHistory {
    pub id: i64,
    /// Owning task id
    pub task: i64,
    pub previous_status: TaskStatus,
    pub new_status: TaskStatus,
    /// Display name of the user assigned at the time of the change
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Display name of the user who made the change
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
}
