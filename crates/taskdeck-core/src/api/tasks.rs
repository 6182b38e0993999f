//! Task endpoints
//!
//! One function per endpoint, exposing exactly the shape the workspace
//! needs. Mutation payloads are a closed set of typed request structs,
//! validated before dispatch. "Delete" is a soft delete: a PATCH that
//! moves the task to the Deleted status, never a destructive removal.

use serde::Serialize;

use super::client::ApiClient;
use super::error::{ApiError, ApiResult};
use crate::models::{Task, TaskComment, TaskHistory, TaskPriority, TaskStatus};

/// Payload for POST /tasks/
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, priority: TaskPriority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority,
            assigned_to: None,
        }
    }

    /// Pre-network validation: a title is required
    pub fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required.".to_string()));
        }
        Ok(())
    }
}

/// Partial payload for PATCH /tasks/{id}/
///
/// Only the set fields are serialized; the server leaves the rest alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskRequest {
    /// An update that changes only the status
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Pre-network validation: a set title must not be blank
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ApiError::Validation("Title is required.".to_string()));
            }
        }
        Ok(())
    }
}

/// Payload for PATCH /tasks/{id}/assign/
#[derive(Debug, Clone, Serialize)]
pub struct AssignRequest {
    /// User to assign; the server rejects a missing user
    pub assigned_to: Option<i64>,
}

/// Payload for POST /tasks/{id}/comment/
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    pub comment: String,
}

impl CommentRequest {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    /// Pre-network validation: empty comments are not posted
    pub fn validate(&self) -> ApiResult<()> {
        if self.comment.trim().is_empty() {
            return Err(ApiError::Validation("Comment cannot be empty.".to_string()));
        }
        Ok(())
    }
}

impl ApiClient {
    /// GET /tasks/ - full task list
    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get("/tasks/").await
    }

    /// POST /tasks/ - create a task, returning the server-confirmed record
    pub async fn create_task(&self, request: &CreateTaskRequest) -> ApiResult<Task> {
        request.validate()?;
        self.post("/tasks/", request).await
    }

    /// PATCH /tasks/{id}/ - partial update
    pub async fn update_task(&self, id: i64, request: &UpdateTaskRequest) -> ApiResult<Task> {
        request.validate()?;
        self.patch(&format!("/tasks/{}/", id), request).await
    }

    /// PATCH /tasks/{id}/delete_task/ - soft delete (status becomes Deleted)
    pub async fn delete_task(&self, id: i64) -> ApiResult<Task> {
        self.patch_empty(&format!("/tasks/{}/delete_task/", id)).await
    }

    /// PATCH /tasks/{id}/assign/ - set assigned_to
    pub async fn assign_task(&self, id: i64, request: &AssignRequest) -> ApiResult<Task> {
        self.patch(&format!("/tasks/{}/assign/", id), request).await
    }

    /// PATCH /tasks/{id}/unassign/ - clear assigned_to
    pub async fn unassign_task(&self, id: i64) -> ApiResult<Task> {
        self.patch_empty(&format!("/tasks/{}/unassign/", id)).await
    }

    /// PATCH /tasks/{id}/close/ - mark the task done
    pub async fn close_task(&self, id: i64) -> ApiResult<Task> {
        self.patch_empty(&format!("/tasks/{}/close/", id)).await
    }

    /// GET /tasks/{id}/history/ - server-generated audit trail
    pub async fn task_history(&self, id: i64) -> ApiResult<Vec<TaskHistory>> {
        self.get(&format!("/tasks/{}/history/", id)).await
    }

    /// GET /tasks/{id}/comments/ - comment list
    pub async fn task_comments(&self, id: i64) -> ApiResult<Vec<TaskComment>> {
        self.get(&format!("/tasks/{}/comments/", id)).await
    }

    /// POST /tasks/{id}/comment/ - add a comment, returning the created one
    pub async fn add_comment(&self, id: i64, request: &CommentRequest) -> ApiResult<TaskComment> {
        request.validate()?;
        self.post(&format!("/tasks/{}/comment/", id), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::session::SessionStore;

    fn client(server: &mockito::Server, dir: &tempfile::TempDir) -> ApiClient {
        let session = SessionStore::new(dir.path().join("session.json"));
        ApiClient::new(server.url(), session)
    }

    fn task_body(id: i64, status: u8) -> String {
        json!({
            "id": id,
            "title": "Ship release",
            "description": "cut and tag",
            "status": status,
            "priority": 1,
            "assigned_to": null,
            "assigned_to_name": null,
            "created_at": "2026-02-01T09:00:00Z"
        })
        .to_string()
    }

    #[test]
    fn test_create_request_requires_title() {
        let mut request = CreateTaskRequest::new("Ship release", TaskPriority::High);
        assert!(request.validate().is_ok());

        request.title = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_serializes_only_set_fields() {
        let request = UpdateTaskRequest::status_only(TaskStatus::Done);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"status": 3}));
    }

    #[test]
    fn test_update_request_rejects_blank_title() {
        let request = UpdateTaskRequest {
            title: Some("  ".to_string()),
            ..UpdateTaskRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_comment_request_rejects_empty() {
        assert!(CommentRequest::new("  ").validate().is_err());
        assert!(CommentRequest::new("looks good").validate().is_ok());
    }

    #[tokio::test]
    async fn test_delete_task_issues_soft_delete_patch() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let client = client(&server, &dir);

        let mock = server
            .mock("PATCH", "/tasks/5/delete_task/")
            .with_status(200)
            .with_body(task_body(5, 4))
            .create_async()
            .await;

        let task = client.delete_task(5).await.unwrap();
        assert_eq!(task.id, 5);
        assert_eq!(task.status, TaskStatus::Deleted);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_assign_task_sends_user_id() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let client = client(&server, &dir);

        let mock = server
            .mock("PATCH", "/tasks/7/assign/")
            .match_body(Matcher::Json(json!({"assigned_to": 3})))
            .with_status(200)
            .with_body(task_body(7, 2))
            .create_async()
            .await;

        let task = client
            .assign_task(7, &AssignRequest { assigned_to: Some(3) })
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validation_blocks_request_before_network() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let client = client(&server, &dir);

        // No mock registered: a dispatched request would fail differently
        let request = CreateTaskRequest::new("", TaskPriority::Low);
        let result = client.create_task(&request).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_comment_posts_body() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let client = client(&server, &dir);

        let mock = server
            .mock("POST", "/tasks/5/comment/")
            .match_body(Matcher::Json(json!({"comment": "ready for QA"})))
            .with_status(201)
            .with_body(
                json!({
                    "id": 11,
                    "task": 5,
                    "commented_by": "jdoe",
                    "comment": "ready for QA",
                    "commented_at": "2026-02-02T12:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let comment = client
            .add_comment(5, &CommentRequest::new("ready for QA"))
            .await
            .unwrap();
        assert_eq!(comment.id, 11);
        assert_eq!(comment.commented_by, "jdoe");
        mock.assert_async().await;
    }
}
