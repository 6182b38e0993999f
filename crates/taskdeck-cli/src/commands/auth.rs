//! Session command handlers

use anyhow::{Context, Result};

use taskdeck_core::api::auth::RegisterRequest;
use taskdeck_core::{ApiError, Config, Workspace};

use crate::output::Output;

/// Log in and report what was loaded
pub async fn login(
    workspace: &mut Workspace,
    username: &str,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };

    match workspace.login(username, &password).await {
        Ok(()) => {
            output.success(&format!("Logged in as {}", username));
            output.message(&format!(
                "{} task(s), {} user(s) loaded",
                workspace.tasks().len(),
                workspace.users().len()
            ));
            Ok(())
        }
        Err(ApiError::Unauthorized) => {
            anyhow::bail!("Login failed. Please check your credentials.")
        }
        Err(e) => Err(e).context("Login failed"),
    }
}

/// Clear the stored session
pub fn logout(workspace: &mut Workspace, output: &Output) -> Result<()> {
    workspace.logout();
    output.success("Logged out");
    Ok(())
}

/// Create a user account
pub async fn register(
    workspace: &Workspace,
    username: String,
    first_name: String,
    last_name: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };
    let password_confirm = prompt("Repeat password")?;

    let request = RegisterRequest {
        username,
        first_name,
        last_name,
        password,
        password_confirm,
    };

    let response = workspace
        .client()
        .register(&request)
        .await
        .context("Registration failed")?;

    output.success(&format!(
        "{} (user id {})",
        response.message, response.user_id
    ));
    Ok(())
}

/// Show session and backend status
pub fn status(workspace: &Workspace, config: &Config, output: &Output) -> Result<()> {
    if output.is_quiet() {
        println!("{}", workspace.is_authenticated());
        return Ok(());
    }

    output.message(&format!("Backend:   {}", config.api_url));
    output.message(&format!("Data dir:  {}", config.data_dir.display()));
    if workspace.is_authenticated() {
        output.message("Session:   active");
    } else {
        output.message("Session:   none (run `taskdeck login`)");
    }
    Ok(())
}

/// Prompt for a line of input
fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
