//! taskdeck Core Library
//!
//! This crate provides the core functionality for taskdeck, a client for a
//! task-management REST backend.
//!
//! # Architecture
//!
//! The `Workspace` owns the authoritative in-memory task and user
//! collections. Mutations are confirm-then-apply: nothing changes locally
//! until the server responds, and the server-confirmed record is what gets
//! merged back into state.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let session = SessionStore::new(config.session_path());
//! let mut workspace = Workspace::new(ApiClient::new(&config.api_url, session));
//!
//! workspace.login("jdoe", "secret").await?;
//! let stats = workspace.stats();
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP client and the typed resource clients (auth, users, tasks)
//! - `workspace`: application state, mutations, and derived views
//! - `detail`: per-task comments and history sub-view
//! - `models`: data structures shared with the backend
//! - `session`: persisted access/refresh token pair
//! - `config`: application configuration

pub mod api;
pub mod config;
pub mod detail;
pub mod models;
pub mod session;
pub mod workspace;

pub use api::{ApiClient, ApiError, ApiEvent, ApiResult};
pub use config::Config;
pub use detail::TaskDetail;
pub use models::{Task, TaskComment, TaskHistory, TaskPriority, TaskStatus, User};
pub use session::{SessionStore, TokenPair};
pub use workspace::{StatusFilter, TaskFilter, TaskStats, Workspace};
