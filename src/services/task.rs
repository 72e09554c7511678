use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{FieldhandError, FieldhandResult};
use crate::notify::Notifier;
use crate::records::envelope::{BatchWrite, DeleteRequest};
use crate::records::RecordStore;
use crate::schema;

use super::{delete_outcome, list_from_fetch, record_from_fetch, write_outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<TaskPriority> {
        match raw {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "title_c")]
    pub title: String,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "due_date_c")]
    pub due_date: NaiveDate,
    #[serde(rename = "priority_c")]
    pub priority: TaskPriority,
    #[serde(rename = "completed_c", default)]
    pub completed: bool,
    #[serde(rename = "completed_at_c", default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "farm_id_c", default)]
    pub farm_id: Option<i32>,
    #[serde(rename = "crop_id_c", default)]
    pub crop_id: Option<i32>,
}

/// Task creation payload. A new task is always persisted incomplete with a
/// null completion timestamp, whatever the caller supplies elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    #[serde(default)]
    pub farm_id: Option<i32>,
    #[serde(default)]
    pub crop_id: Option<i32>,
}

impl TaskInput {
    fn to_record(&self) -> Value {
        json!({
            "Name": self.title,
            "title_c": self.title,
            "description_c": self.description.clone().unwrap_or_default(),
            "due_date_c": self.due_date,
            "priority_c": self.priority,
            "completed_c": false,
            "completed_at_c": Value::Null,
            "farm_id_c": self.farm_id,
            "crop_id_c": self.crop_id,
        })
    }
}

/// Full-record update payload; completion state travels with it since this
/// path replaces every client-owned field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub farm_id: Option<i32>,
    #[serde(default)]
    pub crop_id: Option<i32>,
}

impl TaskUpdate {
    fn to_record(&self, id: i32) -> Value {
        json!({
            "Id": id,
            "Name": self.title,
            "title_c": self.title,
            "description_c": self.description.clone().unwrap_or_default(),
            "due_date_c": self.due_date,
            "priority_c": self.priority,
            "completed_c": self.completed,
            "completed_at_c": self.completed_at,
            "farm_id_c": self.farm_id,
            "crop_id_c": self.crop_id,
        })
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl TaskService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        TaskService { store, notifier }
    }

    pub async fn try_get_all(&self) -> FieldhandResult<Vec<Task>> {
        let response = self
            .store
            .fetch_records(schema::TASK.collection, &schema::TASK.query())
            .await?;
        list_from_fetch("task", response)
    }

    pub async fn get_all(&self) -> Vec<Task> {
        match self.try_get_all().await {
            Ok(tasks) => tasks,
            Err(FieldhandError::Backend(message)) => {
                tracing::error!("{}", message);
                self.notifier.error(&message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error fetching tasks: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_get_by_id(&self, id: i32) -> FieldhandResult<Task> {
        let response = self
            .store
            .get_record_by_id(schema::TASK.collection, id, &schema::TASK.query())
            .await?;
        record_from_fetch("task", response)
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Task> {
        match self.try_get_by_id(id).await {
            Ok(task) => Some(task),
            Err(FieldhandError::NotFound) => None,
            Err(err) => {
                tracing::error!("Error fetching task {}: {}", id, err);
                None
            }
        }
    }

    pub async fn create(&self, input: &TaskInput) -> Option<Task> {
        let batch = BatchWrite::single(input.to_record());
        let response = match self.store.create_records(schema::TASK.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error creating task: {}", err);
                return None;
            }
        };
        write_outcome("create", "task", response, self.notifier.as_ref())
    }

    pub async fn update(&self, id: i32, input: &TaskUpdate) -> Option<Task> {
        let batch = BatchWrite::single(input.to_record(id));
        let response = match self.store.update_records(schema::TASK.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error updating task {}: {}", id, err);
                return None;
            }
        };
        write_outcome("update", "task", response, self.notifier.as_ref())
    }

    /// Flips completion on the current stored state. The write is a partial
    /// record carrying only the completion pair; the backend merges it into
    /// the rest of the record.
    pub async fn toggle_complete(&self, id: i32) -> Option<Task> {
        let current = self.get_by_id(id).await?;

        let completed = !current.completed;
        let completed_at = completed.then(Utc::now);
        let record = json!({
            "Id": id,
            "completed_c": completed,
            "completed_at_c": completed_at,
        });

        let batch = BatchWrite::single(record);
        let response = match self.store.update_records(schema::TASK.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error toggling task {}: {}", id, err);
                return None;
            }
        };
        write_outcome("toggle", "task", response, self.notifier.as_ref())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let request = DeleteRequest::single(id);
        let response = match self.store.delete_records(schema::TASK.collection, &request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error deleting task {}: {}", id, err);
                return false;
            }
        };
        delete_outcome("task", response, self.notifier.as_ref())
    }
}
