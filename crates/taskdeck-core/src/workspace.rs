//! Application state
//!
//! The `Workspace` is the sole owner of the authoritative in-memory task
//! and user collections. Every mutation follows the same protocol:
//!
//! 1. call the resource client - no local change before the server responds
//! 2. on success, merge the server-confirmed task back into state
//!    (replace by id, or prepend for create)
//! 3. on failure, leave prior state untouched, log, and surface the error
//!
//! Derived views (filtered list, status counts) are pure functions of
//! current state and never mutate it.

use tracing::{debug, info, warn};

use crate::api::auth::LoginRequest;
use crate::api::tasks::{AssignRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{Task, TaskStatus, User};

/// Status side of the task filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Sentinel that bypasses the status check
    #[default]
    All,
    /// Exact status equality
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }

    /// Cycle All -> Todo -> InProgress -> Done -> Deleted -> All
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Todo),
            StatusFilter::Only(TaskStatus::Todo) => StatusFilter::Only(TaskStatus::InProgress),
            StatusFilter::Only(TaskStatus::InProgress) => StatusFilter::Only(TaskStatus::Done),
            StatusFilter::Only(TaskStatus::Done) => StatusFilter::Only(TaskStatus::Deleted),
            StatusFilter::Only(TaskStatus::Deleted) => StatusFilter::All,
        }
    }
}

/// Combined search + status filter
///
/// Search matches case-insensitively against title OR description; the two
/// sides combine with logical AND.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        task.matches_search(&self.query) && self.status.matches(task.status)
    }
}

/// Aggregate counts by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

/// Filter a task slice without copying the tasks
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Count tasks by status
pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Todo => stats.todo += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Done => stats.done += 1,
            TaskStatus::Deleted => {}
        }
    }
    stats
}

/// In-memory application state plus the client that feeds it
pub struct Workspace {
    client: ApiClient,
    tasks: Vec<Task>,
    users: Vec<User>,
}

impl Workspace {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            users: Vec::new(),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Mutable access, e.g. for taking the event receiver
    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    // ==================== Session transitions ====================

    /// Log in and load fresh user and task lists
    ///
    /// Tokens are stored only after the server accepts the credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<()> {
        let request = LoginRequest::new(username, password);
        let pair = self.client.login(&request).await?;

        self.client
            .session()
            .set(&pair.access, &pair.refresh)
            .map_err(|e| ApiError::Session(format!("{:#}", e)))?;
        info!("Logged in as {}", username);

        self.refresh().await
    }

    /// Clear the session and local collections; no server call
    pub fn logout(&mut self) {
        if let Err(e) = self.client.session().clear() {
            warn!("Failed to clear session: {:#}", e);
        }
        self.tasks.clear();
        self.users.clear();
        info!("Logged out");
    }

    /// Fetch users and tasks fresh from the server
    pub async fn refresh(&mut self) -> ApiResult<()> {
        let users = self.client.list_users().await?;
        let tasks = self.client.list_tasks().await?;
        debug!("Loaded {} users, {} tasks", users.len(), tasks.len());
        self.users = users;
        self.tasks = tasks;
        Ok(())
    }

    // ==================== Derived views ====================

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter)
    }

    pub fn stats(&self) -> TaskStats {
        task_stats(&self.tasks)
    }

    // ==================== Mutations ====================

    /// Create a task; the server-confirmed record is prepended
    pub async fn create_task(&mut self, request: &CreateTaskRequest) -> ApiResult<Task> {
        let created = match self.client.create_task(request).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Create failed: {}", e);
                return Err(e);
            }
        };
        self.tasks.insert(0, created.clone());
        Ok(created)
    }

    /// Partially update a task
    pub async fn update_task(&mut self, id: i64, request: &UpdateTaskRequest) -> ApiResult<Task> {
        let updated = match self.client.update_task(id, request).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Update failed: {}", e);
                return Err(e);
            }
        };
        Ok(self.apply(updated))
    }

    /// Soft-delete a task: it stays in the collection with status Deleted
    pub async fn delete_task(&mut self, id: i64) -> ApiResult<Task> {
        let deleted = match self.client.delete_task(id).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Delete failed: {}", e);
                return Err(e);
            }
        };
        Ok(self.apply(deleted))
    }

    /// Assign a user to a task
    pub async fn assign_task(&mut self, id: i64, user_id: Option<i64>) -> ApiResult<Task> {
        let request = AssignRequest {
            assigned_to: user_id,
        };
        let updated = match self.client.assign_task(id, &request).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Assign failed: {}", e);
                return Err(e);
            }
        };
        Ok(self.apply(updated))
    }

    /// Clear a task's assignment
    pub async fn unassign_task(&mut self, id: i64) -> ApiResult<Task> {
        let updated = match self.client.unassign_task(id).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Unassign failed: {}", e);
                return Err(e);
            }
        };
        Ok(self.apply(updated))
    }

    /// Close a task (status becomes Done)
    pub async fn close_task(&mut self, id: i64) -> ApiResult<Task> {
        let updated = match self.client.close_task(id).await {
            Ok(task) => task,
            Err(e) => {
                warn!("Close failed: {}", e);
                return Err(e);
            }
        };
        Ok(self.apply(updated))
    }

    /// Toggle completion: Done unless already Done, else back to Todo
    ///
    /// Derived operation - issues a status-only partial update, there is
    /// no dedicated toggle endpoint.
    pub async fn toggle_complete(&mut self, id: i64) -> ApiResult<Task> {
        let next = match self.task(id) {
            Some(task) => task.toggle_target(),
            None => return Err(ApiError::Validation(format!("No task with id {}", id))),
        };
        self.update_task(id, &UpdateTaskRequest::status_only(next))
            .await
    }

    /// Merge a server-confirmed task into state, keyed by id
    ///
    /// A response for a task we no longer hold (late completion) is
    /// applied by prepending, which is harmless.
    fn apply(&mut self, task: Task) -> Task {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => self.tasks.insert(0, task.clone()),
        }
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::models::TaskPriority;
    use crate::session::SessionStore;

    fn task(id: i64, title: &str, description: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            status,
            priority: TaskPriority::Medium,
            assigned_to: None,
            assigned_to_name: None,
            created_at: Utc::now(),
        }
    }

    fn workspace(server: &mockito::ServerGuard, dir: &tempfile::TempDir) -> Workspace {
        let session = SessionStore::new(dir.path().join("session.json"));
        Workspace::new(ApiClient::new(server.url(), session))
    }

    fn task_json(id: i64, title: &str, status: u8) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "status": status,
            "priority": 2,
            "assigned_to": null,
            "assigned_to_name": null,
            "created_at": "2026-02-01T09:00:00Z"
        })
    }

    // ==================== Derived views ====================

    #[test]
    fn test_status_filter_exact_subset() {
        let tasks = vec![
            task(1, "a", "", TaskStatus::Todo),
            task(2, "b", "", TaskStatus::Done),
            task(3, "c", "", TaskStatus::Todo),
            task(4, "d", "", TaskStatus::Deleted),
        ];

        let filter = TaskFilter {
            query: String::new(),
            status: StatusFilter::Only(TaskStatus::Todo),
        };
        let matched = filter_tasks(&tasks, &filter);
        assert_eq!(matched.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);

        let all = filter_tasks(&tasks, &TaskFilter::default());
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_search_filter_case_insensitive_title_or_description() {
        let tasks = vec![
            task(1, "Deploy API", "", TaskStatus::Todo),
            task(2, "cleanup", "retire the old api gateway", TaskStatus::Todo),
            task(3, "write docs", "", TaskStatus::Todo),
        ];

        let filter = TaskFilter {
            query: "API".to_string(),
            status: StatusFilter::All,
        };
        let matched = filter_tasks(&tasks, &filter);
        assert_eq!(matched.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let tasks = vec![
            task(1, "Deploy API", "", TaskStatus::Todo),
            task(2, "Deploy API v2", "", TaskStatus::Done),
        ];

        let filter = TaskFilter {
            query: "deploy".to_string(),
            status: StatusFilter::Only(TaskStatus::Done),
        };
        let matched = filter_tasks(&tasks, &filter);
        assert_eq!(matched.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let tasks = vec![
            task(1, "a", "", TaskStatus::Todo),
            task(2, "b", "", TaskStatus::Done),
        ];
        let matched = filter_tasks(&tasks, &TaskFilter::default());
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_stats_counts_by_status() {
        let tasks = vec![
            task(1, "a", "", TaskStatus::Todo),
            task(2, "b", "", TaskStatus::Todo),
            task(3, "c", "", TaskStatus::InProgress),
            task(4, "d", "", TaskStatus::Done),
            task(5, "e", "", TaskStatus::Deleted),
        ];
        let stats = task_stats(&tasks);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.todo, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.done, 1);
    }

    #[test]
    fn test_status_filter_cycle_wraps() {
        let mut filter = StatusFilter::All;
        for _ in 0..5 {
            filter = filter.next();
        }
        assert_eq!(filter, StatusFilter::All);
    }

    // ==================== Mutations ====================

    #[tokio::test]
    async fn test_create_prepends_server_confirmed_task() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(1, "existing", "", TaskStatus::Todo));

        let _mock = server
            .mock("POST", "/tasks/")
            .with_status(201)
            .with_body(task_json(42, "new task", 1).to_string())
            .create_async()
            .await;

        let created = ws
            .create_task(&CreateTaskRequest::new("new task", TaskPriority::High))
            .await
            .unwrap();

        // Server-assigned id, at the head, exactly once
        assert_eq!(created.id, 42);
        assert_eq!(ws.tasks()[0].id, 42);
        assert_eq!(ws.tasks().len(), 2);
        assert_eq!(ws.tasks().iter().filter(|t| t.id == 42).count(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_only_matching_task() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(1, "first", "", TaskStatus::Todo));
        ws.tasks.push(task(2, "second", "", TaskStatus::Todo));
        let untouched = ws.tasks[1].clone();

        let _mock = server
            .mock("PATCH", "/tasks/1/")
            .with_status(200)
            .with_body(task_json(1, "first (renamed)", 1).to_string())
            .create_async()
            .await;

        let request = UpdateTaskRequest {
            title: Some("first (renamed)".to_string()),
            ..UpdateTaskRequest::default()
        };
        ws.update_task(1, &request).await.unwrap();

        assert_eq!(ws.task(1).unwrap().title, "first (renamed)");
        assert_eq!(ws.task(2).unwrap(), &untouched);
        assert_eq!(ws.tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_marks_deleted_in_place() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(5, "doomed", "", TaskStatus::Todo));

        let mock = server
            .mock("PATCH", "/tasks/5/delete_task/")
            .with_status(200)
            .with_body(task_json(5, "doomed", 4).to_string())
            .create_async()
            .await;

        ws.delete_task(5).await.unwrap();
        mock.assert_async().await;

        // Still in the collection, visible only under the Deleted filter
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.task(5).unwrap().status, TaskStatus::Deleted);

        let deleted_filter = TaskFilter {
            query: String::new(),
            status: StatusFilter::Only(TaskStatus::Deleted),
        };
        assert_eq!(ws.filtered(&deleted_filter).len(), 1);

        let todo_filter = TaskFilter {
            query: String::new(),
            status: StatusFilter::Only(TaskStatus::Todo),
        };
        assert!(ws.filtered(&todo_filter).is_empty());
    }

    #[tokio::test]
    async fn test_toggle_requests_todo_when_done() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(3, "done already", "", TaskStatus::Done));

        let mock = server
            .mock("PATCH", "/tasks/3/")
            .match_body(Matcher::Json(json!({"status": 1})))
            .with_status(200)
            .with_body(task_json(3, "done already", 1).to_string())
            .create_async()
            .await;

        ws.toggle_complete(3).await.unwrap();
        mock.assert_async().await;
        assert_eq!(ws.task(3).unwrap().status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn test_toggle_requests_done_when_not_done() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(3, "in flight", "", TaskStatus::InProgress));

        let mock = server
            .mock("PATCH", "/tasks/3/")
            .match_body(Matcher::Json(json!({"status": 3})))
            .with_status(200)
            .with_body(task_json(3, "in flight", 3).to_string())
            .create_async()
            .await;

        ws.toggle_complete(3).await.unwrap();
        mock.assert_async().await;
        assert_eq!(ws.task(3).unwrap().status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.tasks.push(task(1, "stable", "", TaskStatus::Todo));
        let before = ws.tasks.clone();

        let _mock = server
            .mock("PATCH", "/tasks/1/close/")
            .with_status(400)
            .with_body(r#"{"error": "Only assigned tasks can be closed"}"#)
            .create_async()
            .await;

        let result = ws.close_task(1).await;
        assert!(result.is_err());
        assert_eq!(ws.tasks(), before.as_slice());
    }

    // ==================== Session transitions ====================

    #[tokio::test]
    async fn test_login_stores_tokens_then_loads_collections() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);

        let _login = server
            .mock("POST", "/auth/login/")
            .match_body(Matcher::Json(json!({
                "username": "jdoe",
                "password": "hunter22"
            })))
            .with_status(200)
            .with_body(r#"{"access": "acc-tok", "refresh": "ref-tok"}"#)
            .create_async()
            .await;
        let _users = server
            .mock("GET", "/auth/users/")
            .match_header("authorization", "Bearer acc-tok")
            .with_status(200)
            .with_body(r#"[{"id": 1, "username": "jdoe", "first_name": "", "last_name": ""}]"#)
            .create_async()
            .await;
        let _tasks = server
            .mock("GET", "/tasks/")
            .match_header("authorization", "Bearer acc-tok")
            .with_status(200)
            .with_body(json!([task_json(1, "only task", 1)]).to_string())
            .create_async()
            .await;

        ws.login("jdoe", "hunter22").await.unwrap();

        assert!(ws.is_authenticated());
        assert_eq!(ws.client().session().access().as_deref(), Some("acc-tok"));
        assert_eq!(ws.users().len(), 1);
        assert_eq!(ws.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failure_stores_nothing() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);

        let _login = server
            .mock("POST", "/auth/login/")
            .with_status(401)
            .with_body(r#"{"error": "Invalid credentials"}"#)
            .create_async()
            .await;

        let result = ws.login("jdoe", "wrong").await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!ws.is_authenticated());
        assert!(ws.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_login_session_write_failure_is_a_session_error() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        // A directory at the session path makes the token write fail
        let session_path = dir.path().join("session.json");
        std::fs::create_dir(&session_path).unwrap();
        let session = SessionStore::new(session_path);
        let mut ws = Workspace::new(ApiClient::new(server.url(), session));

        let _login = server
            .mock("POST", "/auth/login/")
            .with_status(200)
            .with_body(r#"{"access": "acc-tok", "refresh": "ref-tok"}"#)
            .create_async()
            .await;

        let result = ws.login("jdoe", "hunter22").await;
        assert!(matches!(result, Err(ApiError::Session(_))));
        assert!(ws.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_collections() {
        let server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let mut ws = workspace(&server, &dir);
        ws.client().session().set("acc", "ref").unwrap();
        ws.tasks.push(task(1, "a", "", TaskStatus::Todo));
        ws.users.push(User {
            id: 1,
            username: "jdoe".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        });

        ws.logout();

        assert!(!ws.is_authenticated());
        assert!(ws.tasks().is_empty());
        assert!(ws.users().is_empty());
    }
}
