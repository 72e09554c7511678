//! Wire types for the record-storage envelope. The hosted backend speaks a
//! fixed request/response shape for all collections; every service relies on
//! these types being symmetric with what the backend actually sends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSelector {
    pub field: FieldName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    EqualTo,
}

/// One equality-style condition; multiple filters on a query are ANDed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFilter {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: FilterOperator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl QueryFilter {
    pub fn equal_to(field_name: &str, value: impl Into<Value>) -> Self {
        QueryFilter {
            field_name: field_name.to_string(),
            operator: FilterOperator::EqualTo,
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchQuery {
    pub fields: Vec<FieldSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none", default)]
    pub filters: Option<Vec<QueryFilter>>,
}

impl FetchQuery {
    pub fn select<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        FetchQuery {
            fields: names
                .into_iter()
                .map(|name| FieldSelector {
                    field: FieldName {
                        name: name.to_string(),
                    },
                })
                .collect(),
            filters: None,
        }
    }

    pub fn and_where(mut self, filter: QueryFilter) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }
}

/// Response to fetch/get-by-id calls. `data` is a record list for fetches and
/// a single record for by-id lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Write batch: the protocol accepts several records per call even though the
/// services here always send one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchWrite {
    pub records: Vec<Value>,
}

impl BatchWrite {
    pub fn single(record: Value) -> Self {
        BatchWrite {
            records: vec![record],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i32>,
}

impl DeleteRequest {
    pub fn single(id: i32) -> Self {
        DeleteRequest {
            record_ids: vec![id],
        }
    }
}

/// Response to create/update/delete calls. Each submitted record gets its own
/// entry in `results`; a record succeeds or fails independently of the rest
/// of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<RecordResult>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation failure attached to a rejected record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel")]
    pub field_label: String,
    pub message: String,
}
