//! Entity services over the hosted record store. Every service presents the
//! same sentinel-returning contract: lists come back empty, single records
//! come back as `None`, deletes come back as `false` whenever the backend
//! fails, and diagnostics flow to the log stream and the notification
//! channel instead of propagating as errors.

pub mod crop;
pub mod expense;
pub mod farm;
pub mod income;
pub mod task;

pub use crop::{Crop, CropInput, CropService, CropStatus};
pub use expense::{Expense, ExpenseInput, ExpenseService};
pub use farm::{AreaUnit, Farm, FarmInput, FarmService};
pub use income::{Income, IncomeInput, IncomeService};
pub use task::{Task, TaskInput, TaskPriority, TaskService, TaskUpdate};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FieldhandError, FieldhandResult};
use crate::notify::Notifier;
use crate::records::envelope::{BatchResponse, FetchResponse};

/// The hosted store returns lookup fields as `{Id, Name}` objects; the typed
/// models carry plain integer ids, so lookups are flattened before decoding.
fn flatten_lookups(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| match value {
                    Value::Object(ref lookup) if lookup.contains_key("Id") => {
                        let id = lookup.get("Id").cloned().unwrap_or(Value::Null);
                        (key, id)
                    }
                    other => (key, other),
                })
                .collect(),
        ),
        other => other,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> FieldhandResult<T> {
    Ok(serde_json::from_value(flatten_lookups(value))?)
}

/// Normalizes a fetch response into a typed list. Backend-reported failure
/// becomes an error carrying the backend's message; a missing or null `data`
/// is an empty collection.
pub(crate) fn list_from_fetch<T: DeserializeOwned>(
    entity: &str,
    response: FetchResponse,
) -> FieldhandResult<Vec<T>> {
    if !response.success {
        return Err(FieldhandError::Backend(response.message.unwrap_or_else(
            || format!("Failed to fetch {} records", entity),
        )));
    }

    match response.data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.into_iter().map(decode).collect(),
        Some(other) => Ok(vec![decode(other)?]),
    }
}

/// Normalizes a by-id response into a typed record. Distinguishes a backend
/// failure from an absent record internally, even though the public service
/// contract collapses both to `None`.
pub(crate) fn record_from_fetch<T: DeserializeOwned>(
    entity: &str,
    response: FetchResponse,
) -> FieldhandResult<T> {
    if !response.success {
        return Err(FieldhandError::Backend(response.message.unwrap_or_else(
            || format!("Failed to fetch {} record", entity),
        )));
    }

    match response.data {
        None | Some(Value::Null) => Err(FieldhandError::NotFound),
        Some(value) => decode(value),
    }
}

/// Normalizes a create/update batch response down to the first successful
/// record's data. Failed entries fan out as notifications: one per
/// field-level validation error, then one for the record-level message. A
/// top-level failure emits a single notification with the backend's message.
pub(crate) fn write_outcome<T: DeserializeOwned>(
    op: &str,
    entity: &str,
    response: BatchResponse,
    notifier: &dyn Notifier,
) -> Option<T> {
    if !response.success {
        let message = response
            .message
            .unwrap_or_else(|| format!("Failed to {} {}", op, entity));
        tracing::error!("{}", message);
        notifier.error(&message);
        return None;
    }

    let results = response.results?;
    let (successful, failed): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.success);

    if !failed.is_empty() {
        tracing::error!("Failed to {} {} {} record(s)", op, failed.len(), entity);
        for record in &failed {
            if let Some(errors) = &record.errors {
                for error in errors {
                    notifier.error(&format!("{}: {}", error.field_label, error.message));
                }
            }
            if let Some(message) = &record.message {
                notifier.error(message);
            }
        }
    }

    let data = successful.into_iter().next()?.data?;
    match decode(data) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::error!("Unreadable {} record in {} response: {}", entity, op, err);
            None
        }
    }
}

/// Normalizes a delete batch response to "did anything get deleted". Failed
/// entries surface their record-level messages as notifications.
pub(crate) fn delete_outcome(entity: &str, response: BatchResponse, notifier: &dyn Notifier) -> bool {
    if !response.success {
        let message = response
            .message
            .unwrap_or_else(|| format!("Failed to delete {}", entity));
        tracing::error!("{}", message);
        notifier.error(&message);
        return false;
    }

    let Some(results) = response.results else {
        return false;
    };
    let (successful, failed): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.success);

    if !failed.is_empty() {
        tracing::error!("Failed to delete {} {} record(s)", failed.len(), entity);
        for record in &failed {
            if let Some(message) = &record.message {
                notifier.error(message);
            }
        }
    }

    !successful.is_empty()
}
