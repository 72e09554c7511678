use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{FieldhandError, FieldhandResult};
use crate::notify::Notifier;
use crate::records::envelope::{BatchWrite, DeleteRequest, QueryFilter};
use crate::records::RecordStore;
use crate::schema;

use super::{delete_outcome, list_from_fetch, record_from_fetch, write_outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStatus {
    Planned,
    Growing,
    Flowering,
    Harvested,
}

impl Default for CropStatus {
    fn default() -> Self {
        CropStatus::Planned
    }
}

impl CropStatus {
    /// A crop counts as active while it is in the ground and not yet brought in.
    pub fn is_active(&self) -> bool {
        matches!(self, CropStatus::Growing | CropStatus::Flowering)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CropStatus::Planned => "planned",
            CropStatus::Growing => "growing",
            CropStatus::Flowering => "flowering",
            CropStatus::Harvested => "harvested",
        }
    }

    pub fn parse(raw: &str) -> Option<CropStatus> {
        match raw {
            "planned" => Some(CropStatus::Planned),
            "growing" => Some(CropStatus::Growing),
            "flowering" => Some(CropStatus::Flowering),
            "harvested" => Some(CropStatus::Harvested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "crop_name_c")]
    pub crop_name: String,
    #[serde(rename = "variety_c", default)]
    pub variety: String,
    #[serde(rename = "planting_date_c")]
    pub planting_date: NaiveDate,
    #[serde(rename = "expected_harvest_date_c")]
    pub expected_harvest_date: NaiveDate,
    #[serde(rename = "area_planted_c")]
    pub area_planted: f64,
    #[serde(rename = "status_c")]
    pub status: CropStatus,
    #[serde(rename = "notes_c", default)]
    pub notes: Option<String>,
    #[serde(rename = "farm_id_c")]
    pub farm_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropInput {
    pub crop_name: String,
    #[serde(default)]
    pub variety: String,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub area_planted: f64,
    pub status: CropStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub farm_id: i32,
}

impl CropInput {
    fn to_record(&self, id: Option<i32>) -> Value {
        let mut record = json!({
            "Name": self.crop_name,
            "crop_name_c": self.crop_name,
            "variety_c": self.variety,
            "planting_date_c": self.planting_date,
            "expected_harvest_date_c": self.expected_harvest_date,
            "area_planted_c": self.area_planted,
            "status_c": self.status,
            "notes_c": self.notes.clone().unwrap_or_default(),
            "farm_id_c": self.farm_id,
        });
        if let Some(id) = id {
            record["Id"] = json!(id);
        }
        record
    }
}

#[derive(Clone)]
pub struct CropService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl CropService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        CropService { store, notifier }
    }

    pub async fn try_get_all(&self) -> FieldhandResult<Vec<Crop>> {
        let response = self
            .store
            .fetch_records(schema::CROP.collection, &schema::CROP.query())
            .await?;
        list_from_fetch("crop", response)
    }

    pub async fn get_all(&self) -> Vec<Crop> {
        match self.try_get_all().await {
            Ok(crops) => crops,
            Err(FieldhandError::Backend(message)) => {
                tracing::error!("{}", message);
                self.notifier.error(&message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error fetching crops: {}", err);
                Vec::new()
            }
        }
    }

    /// Crops belonging to one farm, filtered backend-side. Failures on this
    /// path return an empty list without a notification; it backs derived
    /// counts rather than a page of its own.
    pub async fn get_by_farm_id(&self, farm_id: i32) -> Vec<Crop> {
        let query = schema::CROP.query_where(QueryFilter::equal_to("farm_id_c", farm_id));
        let outcome = self
            .store
            .fetch_records(schema::CROP.collection, &query)
            .await
            .and_then(|response| list_from_fetch("crop", response));
        match outcome {
            Ok(crops) => crops,
            Err(err) => {
                tracing::error!("Error fetching crops for farm {}: {}", farm_id, err);
                Vec::new()
            }
        }
    }

    pub async fn try_get_by_id(&self, id: i32) -> FieldhandResult<Crop> {
        let response = self
            .store
            .get_record_by_id(schema::CROP.collection, id, &schema::CROP.query())
            .await?;
        record_from_fetch("crop", response)
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Crop> {
        match self.try_get_by_id(id).await {
            Ok(crop) => Some(crop),
            Err(FieldhandError::NotFound) => None,
            Err(err) => {
                tracing::error!("Error fetching crop {}: {}", id, err);
                None
            }
        }
    }

    pub async fn create(&self, input: &CropInput) -> Option<Crop> {
        let batch = BatchWrite::single(input.to_record(None));
        let response = match self.store.create_records(schema::CROP.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error creating crop: {}", err);
                return None;
            }
        };
        write_outcome("create", "crop", response, self.notifier.as_ref())
    }

    pub async fn update(&self, id: i32, input: &CropInput) -> Option<Crop> {
        let batch = BatchWrite::single(input.to_record(Some(id)));
        let response = match self.store.update_records(schema::CROP.collection, &batch).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error updating crop {}: {}", id, err);
                return None;
            }
        };
        write_outcome("update", "crop", response, self.notifier.as_ref())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let request = DeleteRequest::single(id);
        let response = match self.store.delete_records(schema::CROP.collection, &request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error deleting crop {}: {}", id, err);
                return false;
            }
        };
        delete_outcome("crop", response, self.notifier.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_record_uses_crop_name_for_display() {
        let input = CropInput {
            crop_name: "Tomatoes".to_string(),
            variety: "Roma".to_string(),
            planting_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            expected_harvest_date: NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            area_planted: 2.5,
            status: CropStatus::Growing,
            notes: None,
            farm_id: 3,
        };
        let record = input.to_record(None);
        assert_eq!(record["Name"], json!("Tomatoes"));
        assert_eq!(record["status_c"], json!("growing"));
        assert_eq!(record["planting_date_c"], json!("2026-03-15"));
        assert_eq!(record["farm_id_c"], json!(3));
        assert_eq!(record["notes_c"], json!(""));
    }

    #[test]
    fn only_growing_and_flowering_are_active() {
        assert!(CropStatus::Growing.is_active());
        assert!(CropStatus::Flowering.is_active());
        assert!(!CropStatus::Planned.is_active());
        assert!(!CropStatus::Harvested.is_active());
    }
}
