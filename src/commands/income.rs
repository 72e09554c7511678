use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::services::IncomeInput;
use crate::state::AppState;

use super::{ok, IdPayload};

pub async fn list_income(State(state): State<AppState>) -> Json<Value> {
    let incomes = state.income.get_all().await;
    tracing::info!("Fetched {} income records", incomes.len());
    ok(incomes)
}

pub async fn create_income(
    State(state): State<AppState>,
    Json(input): Json<IncomeInput>,
) -> FieldhandResult<Json<Value>> {
    match state.income.create(&input).await {
        Some(income) => Ok(ok(income)),
        None => Err(FieldhandError::Rejected(
            "Income record was not created".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateIncomeRequest {
    pub id: i32,
    #[serde(flatten)]
    pub income: IncomeInput,
}

pub async fn update_income(
    State(state): State<AppState>,
    Json(request): Json<UpdateIncomeRequest>,
) -> FieldhandResult<Json<Value>> {
    match state.income.update(request.id, &request.income).await {
        Some(income) => Ok(ok(income)),
        None => Err(FieldhandError::Rejected(
            "Income record was not updated".to_string(),
        )),
    }
}

pub async fn delete_income(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    if state.income.delete(request.id).await {
        Ok(ok(Value::Null))
    } else {
        Err(FieldhandError::Rejected(
            "Income record was not deleted".to_string(),
        ))
    }
}
