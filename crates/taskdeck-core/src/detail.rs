//! Task detail sub-view
//!
//! Read-mostly companion to the main collection: comments and history are
//! fetched lazily when a task's detail view opens, independent of the
//! workspace task list. Posting a comment prepends the server-returned
//! record without re-fetching; history is never locally mutated.

use tracing::warn;

use crate::api::tasks::CommentRequest;
use crate::api::{ApiClient, ApiResult};
use crate::models::{TaskComment, TaskHistory};

/// Comments and history for one task
#[derive(Debug, Default)]
pub struct TaskDetail {
    task_id: i64,
    comments: Vec<TaskComment>,
    history: Vec<TaskHistory>,
}

impl TaskDetail {
    pub fn new(task_id: i64) -> Self {
        Self {
            task_id,
            comments: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    pub fn history(&self) -> &[TaskHistory] {
        &self.history
    }

    /// Fetch comments and history fresh from the server
    pub async fn load(&mut self, client: &ApiClient) -> ApiResult<()> {
        self.comments = client.task_comments(self.task_id).await?;
        self.history = client.task_history(self.task_id).await?;
        Ok(())
    }

    /// Post a comment and prepend the created record to the local list
    pub async fn add_comment(&mut self, client: &ApiClient, text: &str) -> ApiResult<&TaskComment> {
        let request = CommentRequest::new(text);
        let created = match client.add_comment(self.task_id, &request).await {
            Ok(comment) => comment,
            Err(e) => {
                warn!("Comment failed: {}", e);
                return Err(e);
            }
        };
        self.comments.insert(0, created);
        Ok(&self.comments[0])
    }
}
