use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::services::FarmInput;
use crate::state::AppState;

use super::{ok, IdPayload};

pub async fn list_farms(State(state): State<AppState>) -> Json<Value> {
    let farms = state.farms.get_all().await;
    tracing::info!("Fetched {} farm records", farms.len());
    ok(farms)
}

pub async fn create_farm(
    State(state): State<AppState>,
    Json(input): Json<FarmInput>,
) -> FieldhandResult<Json<Value>> {
    match state.farms.create(&input).await {
        Some(farm) => Ok(ok(farm)),
        None => Err(FieldhandError::Rejected(
            "Farm was not created".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateFarmRequest {
    pub id: i32,
    #[serde(flatten)]
    pub farm: FarmInput,
}

pub async fn update_farm(
    State(state): State<AppState>,
    Json(request): Json<UpdateFarmRequest>,
) -> FieldhandResult<Json<Value>> {
    match state.farms.update(request.id, &request.farm).await {
        Some(farm) => Ok(ok(farm)),
        None => Err(FieldhandError::Rejected(
            "Farm was not updated".to_string(),
        )),
    }
}

pub async fn delete_farm(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    if state.farms.delete(request.id).await {
        Ok(ok(Value::Null))
    } else {
        Err(FieldhandError::Rejected(
            "Farm was not deleted".to_string(),
        ))
    }
}
