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
pub struct Expense {
    #[serde(rename = "Id")]
    pub id: i32,
    #[serde(rename = "Name", default)]
    pub display_name: Option<String>,
    #[serde(rename = "date_c")]
    pub date: NaiveDate,
    #[serde(rename = "category_c")]
    pub category: String,
    #[serde(rename = "amount_c")]
    pub amount: f64,
    #[serde(rename = "description_c")]
    pub description: String,
    #[serde(rename = "farm_id_c", default)]
    pub farm_id: Option<i32>,
}

/// Expense write payload. The farm reference is optional; an absent one is
/// persisted as an explicit null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub farm_id: Option<i32>,
}

impl ExpenseInput {
    fn to_record(&self, id: Option<i32>) -> Value {
        let mut record = json!({
            "Name": self.description,
            "date_c": self.date,
            "category_c": self.category,
            "amount_c": self.amount,
            "description_c": self.description,
            "farm_id_c": self.farm_id,
        });
        if let Some(id) = id {
            record["Id"] = json!(id);
        }
        record
    }
}

#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        ExpenseService { store, notifier }
    }

    pub async fn try_get_all(&self) -> FieldhandResult<Vec<Expense>> {
        let response = self
            .store
            .fetch_records(schema::EXPENSE.collection, &schema::EXPENSE.query())
            .await?;
        list_from_fetch("expense", response)
    }

    pub async fn get_all(&self) -> Vec<Expense> {
        match self.try_get_all().await {
            Ok(expenses) => expenses,
            Err(FieldhandError::Backend(message)) => {
                tracing::error!("{}", message);
                self.notifier.error(&message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error fetching expenses: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn try_get_by_id(&self, id: i32) -> FieldhandResult<Expense> {
        let response = self
            .store
            .get_record_by_id(schema::EXPENSE.collection, id, &schema::EXPENSE.query())
            .await?;
        record_from_fetch("expense", response)
    }

    pub async fn get_by_id(&self, id: i32) -> Option<Expense> {
        match self.try_get_by_id(id).await {
            Ok(expense) => Some(expense),
            Err(FieldhandError::NotFound) => None,
            Err(err) => {
                tracing::error!("Error fetching expense {}: {}", id, err);
                None
            }
        }
    }

    pub async fn create(&self, input: &ExpenseInput) -> Option<Expense> {
        let batch = BatchWrite::single(input.to_record(None));
        let response = match self
            .store
            .create_records(schema::EXPENSE.collection, &batch)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error creating expense: {}", err);
                return None;
            }
        };
        write_outcome("create", "expense", response, self.notifier.as_ref())
    }

    pub async fn update(&self, id: i32, input: &ExpenseInput) -> Option<Expense> {
        let batch = BatchWrite::single(input.to_record(Some(id)));
        let response = match self
            .store
            .update_records(schema::EXPENSE.collection, &batch)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error updating expense {}: {}", id, err);
                return None;
            }
        };
        write_outcome("update", "expense", response, self.notifier.as_ref())
    }

    pub async fn delete(&self, id: i32) -> bool {
        let request = DeleteRequest::single(id);
        let response = match self
            .store
            .delete_records(schema::EXPENSE.collection, &request)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error deleting expense {}: {}", id, err);
                return false;
            }
        };
        delete_outcome("expense", response, self.notifier.as_ref())
    }
}
