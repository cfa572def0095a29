//! Automation-task operations.

use std::sync::Arc;

use uuid::Uuid;

use super::models::{BulkTaskCreate, Task, TaskCreate, TaskProgress, TaskStatus};
use crate::error::Result;
use crate::gateway::{ApiGateway, ApiRequest};

pub struct TasksClient {
    gateway: Arc<ApiGateway>,
}

impl TasksClient {
    pub(crate) fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// List tasks, optionally filtered by status.
    pub async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let mut request = ApiRequest::get("/tasks");
        if let Some(status) = status {
            request = request.query("status", status.as_str());
        }
        self.gateway.send(request).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Task> {
        self.gateway.send(ApiRequest::get(format!("/tasks/{id}"))).await
    }

    pub async fn create(&self, payload: &TaskCreate) -> Result<Task> {
        self.gateway
            .send(ApiRequest::post("/tasks").json(payload)?)
            .await
    }

    /// Queue the same task for many accounts at once.
    pub async fn create_bulk(&self, payload: &BulkTaskCreate) -> Result<Vec<Task>> {
        self.gateway
            .send(ApiRequest::post("/tasks/bulk").json(payload)?)
            .await
    }

    /// Cancel a pending or running task.
    pub async fn cancel(&self, id: Uuid) -> Result<()> {
        self.gateway
            .send_unit(ApiRequest::delete(format!("/tasks/{id}")))
            .await
    }

    pub async fn progress(&self, id: Uuid) -> Result<TaskProgress> {
        self.gateway
            .send(ApiRequest::get(format!("/tasks/{id}/progress")))
            .await
    }
}
