//! User command handlers

use anyhow::{Context, Result};

use taskdeck_core::Workspace;

use crate::output::Output;

/// List all users
pub async fn list(workspace: &mut Workspace, output: &Output) -> Result<()> {
    workspace.refresh().await.context("Failed to load users")?;
    output.print_users(workspace.users());
    Ok(())
}
