//! Task command handlers
//!
//! Each handler loads fresh state, performs at most one mutation, and
//! prints the server-confirmed result.

use anyhow::{Context, Result};

use taskdeck_core::api::tasks::{CreateTaskRequest, UpdateTaskRequest};
use taskdeck_core::{StatusFilter, TaskDetail, TaskFilter, TaskPriority, Workspace};

use crate::output::Output;

/// List tasks, optionally filtered
pub async fn list(
    workspace: &mut Workspace,
    status: StatusFilter,
    search: Option<String>,
    stats: bool,
    output: &Output,
) -> Result<()> {
    workspace.refresh().await.context("Failed to load tasks")?;

    let filter = TaskFilter {
        query: search.unwrap_or_default(),
        status,
    };
    output.print_tasks(&workspace.filtered(&filter));

    if stats {
        output.print_stats(&workspace.stats());
    }
    Ok(())
}

/// Create a task
pub async fn create(
    workspace: &mut Workspace,
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    assign: Option<i64>,
    output: &Output,
) -> Result<()> {
    let mut request = CreateTaskRequest::new(title, priority);
    request.description = description.unwrap_or_default();
    request.assigned_to = assign;

    let created = workspace
        .create_task(&request)
        .await
        .context("Failed to create task")?;

    output.success(&format!("Created task #{}", created.id));
    output.print_task(&created);
    Ok(())
}

/// Edit title/description/priority
pub async fn edit(
    workspace: &mut Workspace,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    priority: Option<TaskPriority>,
    output: &Output,
) -> Result<()> {
    let request = UpdateTaskRequest {
        title,
        description,
        priority,
        ..UpdateTaskRequest::default()
    };

    let updated = workspace
        .update_task(id, &request)
        .await
        .context("Failed to update task")?;

    output.success(&format!("Updated task #{}", updated.id));
    output.print_task(&updated);
    Ok(())
}

/// Soft-delete a task
pub async fn delete(workspace: &mut Workspace, id: i64, output: &Output) -> Result<()> {
    if output.should_prompt() && !confirm(&format!("Delete task #{}?", id))? {
        output.message("Cancelled.");
        return Ok(());
    }

    let deleted = workspace
        .delete_task(id)
        .await
        .context("Failed to delete task")?;

    output.success(&format!(
        "Task #{} marked {}",
        deleted.id,
        deleted.status.label()
    ));
    Ok(())
}

/// Assign a task to a user
pub async fn assign(workspace: &mut Workspace, id: i64, user: i64, output: &Output) -> Result<()> {
    let updated = workspace
        .assign_task(id, Some(user))
        .await
        .context("Failed to assign task")?;

    let assignee = updated.assigned_to_name.as_deref().unwrap_or("(unknown)");
    output.success(&format!("Task #{} assigned to {}", updated.id, assignee));
    Ok(())
}

/// Clear a task's assignment
pub async fn unassign(workspace: &mut Workspace, id: i64, output: &Output) -> Result<()> {
    let updated = workspace
        .unassign_task(id)
        .await
        .context("Failed to unassign task")?;

    output.success(&format!("Task #{} unassigned", updated.id));
    Ok(())
}

/// Close a task
pub async fn close(workspace: &mut Workspace, id: i64, output: &Output) -> Result<()> {
    let updated = workspace
        .close_task(id)
        .await
        .context("Failed to close task")?;

    output.success(&format!(
        "Task #{} is now {}",
        updated.id,
        updated.status.label()
    ));
    Ok(())
}

/// Toggle completion (needs current status, so load state first)
pub async fn toggle(workspace: &mut Workspace, id: i64, output: &Output) -> Result<()> {
    workspace.refresh().await.context("Failed to load tasks")?;

    let updated = workspace
        .toggle_complete(id)
        .await
        .context("Failed to toggle task")?;

    output.success(&format!(
        "Task #{} is now {}",
        updated.id,
        updated.status.label()
    ));
    Ok(())
}

/// Show a task with its comments and history
pub async fn show(workspace: &mut Workspace, id: i64, output: &Output) -> Result<()> {
    workspace.refresh().await.context("Failed to load tasks")?;

    let task = workspace
        .task(id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?
        .clone();

    let mut detail = TaskDetail::new(id);
    detail
        .load(workspace.client())
        .await
        .context("Failed to load task details")?;

    output.print_task(&task);
    if !output.is_quiet() {
        output.message("");
        output.message(&format!("── Comments ({}) ──", detail.comments().len()));
        output.print_comments(detail.comments());
        output.message("");
        output.message(&format!("── History ({}) ──", detail.history().len()));
        output.print_history(detail.history());
    }
    Ok(())
}

/// Add a comment to a task
pub async fn comment(
    workspace: &mut Workspace,
    id: i64,
    text: String,
    output: &Output,
) -> Result<()> {
    let mut detail = TaskDetail::new(id);
    let created = detail
        .add_comment(workspace.client(), &text)
        .await
        .context("Failed to add comment")?;

    output.success(&format!("Comment #{} added to task #{}", created.id, id));
    Ok(())
}

/// Ask for y/n confirmation
fn confirm(question: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
