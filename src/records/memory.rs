//! In-memory double of the hosted record store, matching the observable
//! behavior of the real backend: backend-assigned integer ids, `CreatedOn`
//! stamping, merge-on-update for partial records, equality filtering, and
//! lookup-shaped foreign keys on read. Failure injection covers the top-level
//! and per-record failure modes of the envelope.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};

use super::envelope::{
    BatchResponse, BatchWrite, DeleteRequest, FetchQuery, FetchResponse, FieldError,
    FilterOperator, RecordResult,
};
use super::RecordStore;
use crate::error::FieldhandResult;

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<i32, Map<String, Value>>>,
    next_id: i32,
    fail_message: Option<String>,
    rejection: Option<Rejection>,
}

struct Rejection {
    message: String,
    field_errors: Vec<FieldError>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Every subsequent call reports a top-level failure with this message.
    pub fn fail_everything(&self, message: &str) {
        self.inner.lock().unwrap().fail_message = Some(message.to_string());
    }

    /// Subsequent create/update batches fail per record, optionally with
    /// field-level validation errors.
    pub fn reject_writes(&self, message: &str, field_errors: &[(&str, &str)]) {
        self.inner.lock().unwrap().rejection = Some(Rejection {
            message: message.to_string(),
            field_errors: field_errors
                .iter()
                .map(|(label, msg)| FieldError {
                    field_label: label.to_string(),
                    message: msg.to_string(),
                })
                .collect(),
        });
    }

    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_message = None;
        inner.rejection = None;
    }

    pub fn record_count(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

/// Foreign keys come back from the hosted store as `{Id, Name}` lookup
/// objects rather than bare integers.
fn shape_for_read(row: &Map<String, Value>) -> Value {
    let mut shaped = Map::new();
    for (key, value) in row {
        if key.ends_with("_id_c") {
            if let Some(id) = value.as_i64() {
                shaped.insert(key.clone(), json!({ "Id": id }));
                continue;
            }
        }
        shaped.insert(key.clone(), value.clone());
    }
    Value::Object(shaped)
}

fn matches_filters(row: &Map<String, Value>, query: &FetchQuery) -> bool {
    let Some(filters) = &query.filters else {
        return true;
    };
    filters.iter().all(|filter| match filter.operator {
        FilterOperator::EqualTo => {
            let actual = row.get(&filter.field_name).unwrap_or(&Value::Null);
            filter.values.iter().any(|expected| expected == actual)
        }
    })
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse> {
        let inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fail_message {
            return Ok(FetchResponse {
                success: false,
                data: None,
                message: Some(message.clone()),
            });
        }

        let rows = inner
            .collections
            .get(collection)
            .map(|rows| {
                rows.values()
                    .filter(|row| matches_filters(row, query))
                    .map(shape_for_read)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Ok(FetchResponse {
            success: true,
            data: Some(Value::Array(rows)),
            message: None,
        })
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i32,
        _query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse> {
        let inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fail_message {
            return Ok(FetchResponse {
                success: false,
                data: None,
                message: Some(message.clone()),
            });
        }

        let data = inner
            .collections
            .get(collection)
            .and_then(|rows| rows.get(&id))
            .map(shape_for_read);

        Ok(FetchResponse {
            success: true,
            data,
            message: None,
        })
    }

    async fn create_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fail_message {
            return Ok(BatchResponse {
                success: false,
                results: None,
                message: Some(message.clone()),
            });
        }
        if let Some(rejection) = &inner.rejection {
            let results = batch
                .records
                .iter()
                .map(|_| RecordResult {
                    success: false,
                    data: None,
                    message: Some(rejection.message.clone()),
                    errors: (!rejection.field_errors.is_empty())
                        .then(|| rejection.field_errors.clone()),
                })
                .collect();
            return Ok(BatchResponse {
                success: true,
                results: Some(results),
                message: None,
            });
        }

        let mut results = Vec::with_capacity(batch.records.len());
        for record in &batch.records {
            let Some(fields) = record.as_object() else {
                results.push(RecordResult {
                    success: false,
                    data: None,
                    message: Some("Record must be an object".to_string()),
                    errors: None,
                });
                continue;
            };

            let id = inner.next_id;
            inner.next_id += 1;

            let mut row = fields.clone();
            row.insert("Id".to_string(), json!(id));
            row.insert("CreatedOn".to_string(), json!(Utc::now().to_rfc3339()));
            let shaped = shape_for_read(&row);

            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .insert(id, row);

            results.push(RecordResult {
                success: true,
                data: Some(shaped),
                message: None,
                errors: None,
            });
        }

        Ok(BatchResponse {
            success: true,
            results: Some(results),
            message: None,
        })
    }

    async fn update_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fail_message {
            return Ok(BatchResponse {
                success: false,
                results: None,
                message: Some(message.clone()),
            });
        }
        if let Some(rejection) = &inner.rejection {
            let results = batch
                .records
                .iter()
                .map(|_| RecordResult {
                    success: false,
                    data: None,
                    message: Some(rejection.message.clone()),
                    errors: (!rejection.field_errors.is_empty())
                        .then(|| rejection.field_errors.clone()),
                })
                .collect();
            return Ok(BatchResponse {
                success: true,
                results: Some(results),
                message: None,
            });
        }

        let mut results = Vec::with_capacity(batch.records.len());
        for record in &batch.records {
            let id = record.get("Id").and_then(Value::as_i64).map(|id| id as i32);
            let fields = record.as_object();

            let (Some(id), Some(fields)) = (id, fields) else {
                results.push(RecordResult {
                    success: false,
                    data: None,
                    message: Some("Record must carry an Id".to_string()),
                    errors: None,
                });
                continue;
            };

            let row = inner
                .collections
                .get_mut(collection)
                .and_then(|rows| rows.get_mut(&id));
            let Some(row) = row else {
                results.push(RecordResult {
                    success: false,
                    data: None,
                    message: Some(format!("Record {} does not exist", id)),
                    errors: None,
                });
                continue;
            };

            // The backend merges partial updates into the stored record.
            for (key, value) in fields {
                if key != "Id" {
                    row.insert(key.clone(), value.clone());
                }
            }
            let shaped = shape_for_read(row);

            results.push(RecordResult {
                success: true,
                data: Some(shaped),
                message: None,
                errors: None,
            });
        }

        Ok(BatchResponse {
            success: true,
            results: Some(results),
            message: None,
        })
    }

    async fn delete_records(
        &self,
        collection: &str,
        request: &DeleteRequest,
    ) -> FieldhandResult<BatchResponse> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fail_message {
            return Ok(BatchResponse {
                success: false,
                results: None,
                message: Some(message.clone()),
            });
        }

        let rows = inner.collections.entry(collection.to_string()).or_default();
        let results = request
            .record_ids
            .iter()
            .map(|id| match rows.remove(id) {
                Some(_) => RecordResult {
                    success: true,
                    data: None,
                    message: None,
                    errors: None,
                },
                None => RecordResult {
                    success: false,
                    data: None,
                    message: Some(format!("Record {} does not exist", id)),
                    errors: None,
                },
            })
            .collect();

        Ok(BatchResponse {
            success: true,
            results: Some(results),
            message: None,
        })
    }
}
