use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{FieldhandError, FieldhandResult};
use crate::notify::Notifier;
use crate::records::envelope::{BatchWrite, DeleteRequest};
use crate::records::RecordStore;
use crate::schema;

use super::{delete_outcome, list_from_fetch, record_from_fetch, write_outcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "date_c")]
    pub date: NaiveDate,
    #[serde(rename = "crop_id_c")]
    pub crop_id: i32,
    #[serde(rename = "quantity_c")]
    pub quantity: f64,
    #[serde(rename = "price_per_unit_c")]
    pub price_per_unit: f64,
    #[serde(rename = "buyer_c")]
    pub buyer: String,
    #[serde(rename = "total_amount_c")]
    pub total_amount: f64,
}

/// Income write payload. The total amount is not accepted from the caller;
/// it is always quantity times unit price at the moment of the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeInput {
    pub date: NaiveDate,
    pub crop_id: i32,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub buyer: String,
}

impl IncomeInput {
    fn to_record(&self, id: Option<i32>) -> Value {
        let total_amount = self.quantity * self.price_per_unit;
        let mut record = json!({
            "Name": format!("{} - {} units", self.buyer, self.quantity),
            "date_c": self.date,
            "crop_id_c": self.crop_id,
            "quantity_c": self.quantity,
            "price_per_unit_c": self.price_per_unit,
            "buyer_c": self.buyer,
            "total_amount_c": total_amount,
        });
        if let Some(id) = id {
            record["Id"] = json!(id);
        }
        record
    }
}

#[derive(Clone)]
pub struct IncomeService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl IncomeService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        IncomeService { store, notifier }
    }

    pub async fn try_get_all(&self) -> FieldhandResult<Vec<Income>> {
        let response = self
            .store
            .fetch_records(schema::INCOME.collection, &schema::INCOME.query())
            .await?;
        list_from_fetch("income", response)
    }

    pub async fn get_all(&self) -> Vec<Income> {
        match self.try_get_all().await {
            Ok(incomes) => incomes,
            Err(FieldhandError::Backend(message)) => {
                tracing::error!("{}", message);
                self.notifier.error(&message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error fetching income: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_get_by_id(&self, id: i32) -> FieldhandResult<Income> {
        let response = self
            .store
            .get_record_by_id(schema::INCOME.collection, id, &schema::INCOME.query())
            .await?;
        record_from_fetch("income", response)
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Income> {
        match self.try_get_by_id(id).await {
            Ok(income) => Some(income),
            Err(FieldhandError::NotFound) => None,
            Err(err) => {
                tracing::error!("Error fetching income {}: {}", id, err);
                None
            }
        }
    }

    pub async fn create(&self, input: &IncomeInput) -> Option<Income> {
        let batch = BatchWrite::single(input.to_record(None));
        let response = match self
            .store
            .create_records(schema::INCOME.collection, &batch)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error creating income: {}", err);
                return None;
            }
        };
        write_outcome("create", "income", response, self.notifier.as_ref())
    }

    pub async fn update(&self, id: i32, input: &IncomeInput) -> Option<Income> {
        let batch = BatchWrite::single(input.to_record(Some(id)));
        let response = match self
            .store
            .update_records(schema::INCOME.collection, &batch)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error updating income {}: {}", id, err);
                return None;
            }
        };
        write_outcome("update", "income", response, self.notifier.as_ref())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let request = DeleteRequest::single(id);
        let response = match self
            .store
            .delete_records(schema::INCOME.collection, &request)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error deleting income {}: {}", id, err);
                return false;
            }
        };
        delete_outcome("income", response, self.notifier.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_is_quantity_times_price() {
        let input = IncomeInput {
            date: NaiveDate::from_ymd_opt(2026, 6, 12).unwrap(),
            crop_id: 5,
            quantity: 120.0,
            price_per_unit: 2.35,
            buyer: "Greenmarket Co".to_string(),
        };
        let record = input.to_record(None);
        let total = record["total_amount_c"].as_f64().unwrap();
        assert!((total - 282.0).abs() < 1e-9);
        assert_eq!(record["Name"], json!("Greenmarket Co - 120 units"));
    }
}
