use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{FieldhandError, FieldhandResult};
use crate::notify::Notifier;
use crate::records::envelope::{BatchWrite, DeleteRequest};
use crate::records::RecordStore;
use crate::schema;

use super::{delete_outcome, list_from_fetch, record_from_fetch, write_outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "acres")]
    Acres,
    #[serde(rename = "hectares")]
    Hectares,
    #[serde(rename = "square feet")]
    SquareFeet,
    #[serde(rename = "square meters")]
    SquareMeters,
}

impl Default for AreaUnit {
    fn default() -> Self {
        AreaUnit::Acres
    }
}

impl AreaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Acres => "acres",
            AreaUnit::Hectares => "hectares",
            AreaUnit::SquareFeet => "square feet",
            AreaUnit::SquareMeters => "square meters",
        }
    }

    pub fn parse(raw: &str) -> Option<AreaUnit> {
        match raw {
            "acres" => Some(AreaUnit::Acres),
            "hectares" => Some(AreaUnit::Hectares),
            "square feet" => Some(AreaUnit::SquareFeet),
            "square meters" => Some(AreaUnit::SquareMeters),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "name_c")]
    pub name: String,
    #[serde(rename = "location_c")]
    pub location: String,
    #[serde(rename = "total_area_c")]
    pub total_area: f64,
    #[serde(rename = "unit_c")]
    pub unit: AreaUnit,
    #[serde(rename = "notes_c", default)]
    pub notes: Option<String>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for a farm write. The display name is synthesized
/// from the farm name; optional notes are persisted as an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmInput {
    pub name: String,
    pub location: String,
    pub total_area: f64,
    pub unit: AreaUnit,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FarmInput {
    fn to_record(&self, id: Option<i32>) -> Value {
        let mut record = json!({
            "Name": self.name,
            "name_c": self.name,
            "location_c": self.location,
            "total_area_c": self.total_area,
            "unit_c": self.unit,
            "notes_c": self.notes.clone().unwrap_or_default(),
        });
        if let Some(id) = id {
            record["Id"] = json!(id);
        }
        record
    }
}

#[derive(Clone)]
pub struct FarmService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl FarmService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        FarmService { store, notifier }
    }

    pub async fn try_get_all(&self) -> FieldhandResult<Vec<Farm>> {
        let response = self
            .store
            .fetch_records(schema::FARM.collection, &schema::FARM.query())
            .await?;
        list_from_fetch("farm", response)
    }

    pub async fn get_all(&self) -> Vec<Farm> {
        match self.try_get_all().await {
            Ok(farms) => farms,
            Err(FieldhandError::Backend(message)) => {
                tracing::error!("{}", message);
                self.notifier.error(&message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error fetching farms: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_get_by_id(&self, id: i32) -> FieldhandResult<Farm> {
        let response = self
            .store
            .get_record_by_id(schema::FARM.collection, id, &schema::FARM.query())
            .await?;
        record_from_fetch("farm", response)
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Farm> {
        match self.try_get_by_id(id).await {
            Ok(farm) => Some(farm),
            Err(FieldhandError::NotFound) => None,
            Err(err) => {
                tracing::error!("Error fetching farm {}: {}", id, err);
                None
            }
        }
    }

    pub async fn create(&self, input: &FarmInput) -> Option<Farm> {
        let batch = BatchWrite::single(input.to_record(None));
        let response = match self.store.create_records(schema::FARM.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error creating farm: {}", err);
                return None;
            }
        };
        write_outcome("create", "farm", response, self.notifier.as_ref())
    }

    pub async fn update(&self, id: i32, input: &FarmInput) -> Option<Farm> {
        let batch = BatchWrite::single(input.to_record(Some(id)));
        let response = match self.store.update_records(schema::FARM.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error updating farm {}: {}", id, err);
                return None;
            }
        };
        write_outcome("update", "farm", response, self.notifier.as_ref())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let request = DeleteRequest::single(id);
        let response = match self.store.delete_records(schema::FARM.collection, &request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error deleting farm {}: {}", id, err);
                return false;
            }
        };
        delete_outcome("farm", response, self.notifier.as_ref())
    }
}
