use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use super::envelope::{BatchResponse, BatchWrite, DeleteRequest, FetchQuery, FetchResponse};
use super::RecordStore;
use crate::error::{FieldhandError, FieldhandResult};

const PROJECT_ID_HEADER: &str = "x-record-project-id";
const PUBLIC_KEY_HEADER: &str = "x-record-public-key";

/// HTTP client for the hosted record API. Project credentials are installed
/// as default headers at construction so every call carries them.
#[derive(Clone)]
pub struct HttpRecordStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, project_id: &str, public_key: &str) -> FieldhandResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            PROJECT_ID_HEADER,
            HeaderValue::from_str(project_id)
                .map_err(|_| FieldhandError::Config("Invalid record project id".to_string()))?,
        );
        headers.insert(
            PUBLIC_KEY_HEADER,
            HeaderValue::from_str(public_key)
                .map_err(|_| FieldhandError::Config("Invalid record public key".to_string()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(HttpRecordStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post_json<B, R>(&self, url: String, body: &B) -> FieldhandResult<R>
    where
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse> {
        let url = format!("{}/records/{}/fetch", self.base_url, collection);
        self.post_json(url, query).await
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i32,
        query: &FetchQuery,
    ) -> FieldhandResult<FetchResponse> {
        let url = format!("{}/records/{}/{}/get", self.base_url, collection, id);
        self.post_json(url, query).await
    }

    async fn create_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse> {
        let url = format!("{}/records/{}/create", self.base_url, collection);
        self.post_json(url, batch).await
    }

    async fn update_records(
        &self,
        collection: &str,
        batch: &BatchWrite,
    ) -> FieldhandResult<BatchResponse> {
        let url = format!("{}/records/{}/update", self.base_url, collection);
        self.post_json(url, batch).await
    }

    async fn delete_records(
        &self,
        collection: &str,
        request: &DeleteRequest,
    ) -> FieldhandResult<BatchResponse> {
        let url = format!("{}/records/{}/delete", self.base_url, collection);
        self.post_json(url, request).await
    }
}
