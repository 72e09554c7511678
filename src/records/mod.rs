pub mod envelope;
pub mod http;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::FieldhandResult;
use envelope::{BatchResponse, BatchWrite, DeleteRequest, FetchQuery, FetchResponse};

/// Access to the hosted record storage. Implementations own transport and
/// authentication; an `Err` from any method means the backend could not be
/// reached at all, while a reachable backend reports its failures in-band
/// through the envelope's `success` flag.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse>;

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i32,
        query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse>;

    async fn create_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse>;

    async fn update_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse>;

    async fn delete_records(
        &self,
        collection: &str,
        request: &DeleteRequest,
    ) -> FieldhandResult<BatchResponse>;
}
