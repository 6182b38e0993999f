//! taskdeck CLI
//!
//! Command-line interface for taskdeck - task management over a REST
//! backend.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use taskdeck_core::{ApiClient, Config, SessionStore, StatusFilter, TaskPriority, TaskStatus, Workspace};

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "taskdeck - team task management from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Log in and load the workspace
    Login {
        /// Username
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Create a user account
    Register {
        /// Username
        username: String,
        /// First name
        #[arg(long)]
        first_name: String,
        /// Last name
        #[arg(long)]
        last_name: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show session and backend status
    Status,
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// List users
    Users,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Filter by status
        #[arg(short, long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        /// Search title and description
        #[arg(short = 'S', long)]
        search: Option<String>,
        /// Also print aggregate counts
        #[arg(long)]
        stats: bool,
    },
    /// Create a new task
    #[command(alias = "add")]
    Create {
        /// Task title
        title: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Priority
        #[arg(short, long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        /// Assign to a user id on creation
        #[arg(long)]
        assign: Option<i64>,
    },
    /// Edit a task's fields
    Edit {
        /// Task id
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Soft-delete a task (status becomes Deleted)
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: i64,
    },
    /// Assign a task to a user
    Assign {
        /// Task id
        id: i64,
        /// User id
        user: i64,
    },
    /// Clear a task's assignment
    Unassign {
        /// Task id
        id: i64,
    },
    /// Close a task (status becomes Done)
    Close {
        /// Task id
        id: i64,
    },
    /// Toggle completion (Done <-> Todo)
    Toggle {
        /// Task id
        id: i64,
    },
    /// Show task details with comments and history
    Show {
        /// Task id
        id: i64,
    },
    /// Add a comment to a task
    Comment {
        /// Task id
        id: i64,
        /// Comment text
        text: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show the config file path
    Path,
}

/// Status filter argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    All,
    Todo,
    InProgress,
    Done,
    Deleted,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Todo => StatusFilter::Only(TaskStatus::Todo),
            StatusArg::InProgress => StatusFilter::Only(TaskStatus::InProgress),
            StatusArg::Done => StatusFilter::Only(TaskStatus::Done),
            StatusArg::Deleted => StatusFilter::Only(TaskStatus::Deleted),
        }
    }
}

/// Priority argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PriorityArg {
    Critical,
    High,
    Medium,
    Low,
    Minor,
}

impl From<PriorityArg> for TaskPriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Critical => TaskPriority::Critical,
            PriorityArg::High => TaskPriority::High,
            PriorityArg::Medium => TaskPriority::Medium,
            PriorityArg::Low => TaskPriority::Low,
            PriorityArg::Minor => TaskPriority::Minor,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a client
    if let Some(Commands::Config { command }) = &cli.command {
        return commands::config::handle(command.clone(), &output);
    }

    let config = Config::load()?;
    let session = SessionStore::new(config.session_path());
    let workspace = Workspace::new(ApiClient::new(&config.api_url, session));

    // Handle TUI (default when no command given); it does its own logging
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(workspace, &config).await;
    }

    init_logging();
    let mut workspace = workspace;

    match cli.command.unwrap() {
        Commands::Tui => unreachable!(),           // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Login { username, password } => {
            commands::auth::login(&mut workspace, &username, password, &output).await
        }
        Commands::Logout => commands::auth::logout(&mut workspace, &output),
        Commands::Register {
            username,
            first_name,
            last_name,
            password,
        } => {
            commands::auth::register(&workspace, username, first_name, last_name, password, &output)
                .await
        }
        Commands::Status => commands::auth::status(&workspace, &config, &output),
        Commands::Users => commands::users::list(&mut workspace, &output).await,
        Commands::Task { command } => handle_task_command(command, &mut workspace, &output).await,
    }
}

async fn handle_task_command(
    command: TaskCommands,
    workspace: &mut Workspace,
    output: &Output,
) -> Result<()> {
    match command {
        TaskCommands::List {
            status,
            search,
            stats,
        } => commands::task::list(workspace, status.into(), search, stats, output).await,
        TaskCommands::Create {
            title,
            description,
            priority,
            assign,
        } => commands::task::create(workspace, title, description, priority.into(), assign, output)
            .await,
        TaskCommands::Edit {
            id,
            title,
            description,
            priority,
        } => {
            commands::task::edit(
                workspace,
                id,
                title,
                description,
                priority.map(Into::into),
                output,
            )
            .await
        }
        TaskCommands::Delete { id } => commands::task::delete(workspace, id, output).await,
        TaskCommands::Assign { id, user } => {
            commands::task::assign(workspace, id, user, output).await
        }
        TaskCommands::Unassign { id } => commands::task::unassign(workspace, id, output).await,
        TaskCommands::Close { id } => commands::task::close(workspace, id, output).await,
        TaskCommands::Toggle { id } => commands::task::toggle(workspace, id, output).await,
        TaskCommands::Show { id } => commands::task::show(workspace, id, output).await,
        TaskCommands::Comment { id, text } => {
            commands::task::comment(workspace, id, text, output).await
        }
    }
}

/// Initialize stderr logging when TASKDECK_LOG is set
fn init_logging() {
    let Ok(log_level) = std::env::var("TASKDECK_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "taskdeck_core={},taskdeck_cli={}",
        log_level, log_level
    ));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
