use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::services::ExpenseInput;
use crate::state::AppState;

use super::{ok, IdPayload};

pub async fn list_expenses(State(state): State<AppState>) -> Json<Value> {
    let expenses = state.expenses.get_all().await;
    tracing::info!("Fetched {} expense records", expenses.len());
    ok(expenses)
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<ExpenseInput>,
) -> FieldhandResult<Json<Value>> {
    match state.expenses.create(&input).await {
        Some(expense) => Ok(ok(expense)),
        None => Err(FieldhandError::Rejected(
            "Expense was not created".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub id: i32,
    #[serde(flatten)]
    pub expense: ExpenseInput,
}

pub async fn update_expense(
    State(state): State<AppState>,
    Json(request): Json<UpdateExpenseRequest>,
) -> FieldhandResult<Json<Value>> {
    match state.expenses.update(request.id, &request.expense).await {
        Some(expense) => Ok(ok(expense)),
        None => Err(FieldhandError::Rejected(
            "Expense was not updated".to_string(),
        )),
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    if state.expenses.delete(request.id).await {
        Ok(ok(Value::Null))
    } else {
        Err(FieldhandError::Rejected(
            "Expense was not deleted".to_string(),
        ))
    }
}
