use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::services::{TaskInput, TaskUpdate};
use crate::state::AppState;

use super::{ok, IdPayload};

pub async fn list_tasks(State(state): State<AppState>) -> Json<Value> {
    let tasks = state.tasks.get_all().await;
    tracing::info!("Fetched {} task records", tasks.len());
    ok(tasks)
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> FieldhandResult<Json<Value>> {
    match state.tasks.create(&input).await {
        Some(task) => Ok(ok(task)),
        None => Err(FieldhandError::Rejected(
            "Task was not created".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: i32,
    #[serde(flatten)]
    pub task: TaskUpdate,
}

pub async fn update_task(
    State(state): State<AppState>,
    Json(request): Json<UpdateTaskRequest>,
) -> FieldhandResult<Json<Value>> {
    match state.tasks.update(request.id, &request.task).await {
        Some(task) => Ok(ok(task)),
        None => Err(FieldhandError::Rejected(
            "Task was not updated".to_string(),
        )),
    }
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    match state.tasks.toggle_complete(request.id).await {
        Some(task) => Ok(ok(task)),
        None => Err(FieldhandError::NotFound),
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    if state.tasks.delete(request.id).await {
        Ok(ok(Value::Null))
    } else {
        Err(FieldhandError::Rejected(
            "Task was not deleted".to_string(),
        ))
    }
}
