//! Thin HTTP handlers over the entity services. Handlers surface the
//! services' sentinel outcomes as typed errors so the axum layer can produce
//! the standard `{"success": false, "error"}` wrap; everything else goes out
//! as `{"success": true, "data"}`.

pub mod crops;
pub mod expenses;
pub mod farms;
pub mod income;
pub mod tasks;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(crate) fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: i32,
}
