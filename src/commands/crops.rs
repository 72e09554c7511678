use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::services::CropInput;
use crate::state::AppState;

use super::{ok, IdPayload};

pub async fn list_crops(State(state): State<AppState>) -> Json<Value> {
    let crops = state.crops.get_all().await;
    tracing::info!("Fetched {} crop records", crops.len());
    ok(crops)
}

pub async fn crops_by_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<i32>,
) -> Json<Value> {
    ok(state.crops.get_by_farm_id(farm_id).await)
}

pub async fn create_crop(
    State(state): State<AppState>,
    Json(input): Json<CropInput>,
) -> FieldhandResult<Json<Value>> {
    match state.crops.create(&input).await {
        Some(crop) => Ok(ok(crop)),
        None => Err(FieldhandError::Rejected(
            "Crop was not created".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCropRequest {
    pub id: i32,
    #[serde(flatten)]
    pub crop: CropInput,
}

pub async fn update_crop(
    State(state): State<AppState>,
    Json(request): Json<UpdateCropRequest>,
) -> FieldhandResult<Json<Value>> {
    match state.crops.update(request.id, &request.crop).await {
        Some(crop) => Ok(ok(crop)),
        None => Err(FieldhandError::Rejected(
            "Crop was not updated".to_string(),
        )),
    }
}

pub async fn delete_crop(
    State(state): State<AppState>,
    Json(request): Json<IdPayload>,
) -> FieldhandResult<Json<Value>> {
    if state.crops.delete(request.id).await {
        Ok(ok(Value::Null))
    } else {
        Err(FieldhandError::Rejected(
            "Crop was not deleted".to_string(),
        ))
    }
}
