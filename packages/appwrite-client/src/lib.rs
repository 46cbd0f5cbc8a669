//! Pure Appwrite REST API client.
//!
//! A minimal client for the Appwrite backend-as-a-service. Supports the
//! document operations of the Databases API, file upload/delete/preview for
//! the Storage API, and the current-account lookup used to resolve the
//! authenticated user.
//!
//! # Example
//!
//! ```rust,ignore
//! use appwrite_client::AppwriteClient;
//!
//! let client = AppwriteClient::new(
//!     "https://cloud.appwrite.io/v1".into(),
//!     "my-project".into(),
//!     "api-key".into(),
//! );
//!
//! let doc = client.get_document("blog", "posts", "abc123").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{AppwriteError, Result};
pub use types::{AccountData, DocumentData, ErrorBody, FileData};

use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::{json, Value};

/// Document ID placeholder that asks Appwrite to mint a unique ID.
pub const UNIQUE_ID: &str = "unique()";

pub struct AppwriteClient {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    jwt: Option<String>,
}

impl AppwriteClient {
    pub fn new(endpoint: String, project_id: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            jwt: None,
        }
    }

    /// Attach a session JWT. Required for `get_account`; ignored by the
    /// key-authenticated database and storage calls.
    pub fn with_jwt(mut self, jwt: String) -> Self {
        self.jwt = Some(jwt);
        self
    }

    fn keyed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    /// Create a document in a collection. Pass [`UNIQUE_ID`] as `document_id`
    /// to let the store assign one.
    pub async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<DocumentData> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, database_id, collection_id
        );
        let resp = self
            .keyed(self.client.post(&url))
            .json(&json!({ "documentId": document_id, "data": data }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let doc: DocumentData = resp.json().await?;
        tracing::debug!(document_id = %doc.id, collection_id, "Document created");
        Ok(doc)
    }

    /// Update a subset of a document's attributes.
    pub async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<DocumentData> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents/{}",
            self.endpoint, database_id, collection_id, document_id
        );
        let resp = self
            .keyed(self.client.patch(&url))
            .json(&json!({ "data": data }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let doc: DocumentData = resp.json().await?;
        tracing::debug!(document_id = %doc.id, collection_id, "Document updated");
        Ok(doc)
    }

    /// Fetch a document by ID. Returns `None` on 404.
    pub async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Option<DocumentData>> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents/{}",
            self.endpoint, database_id, collection_id, document_id
        );
        let resp = self.keyed(self.client.get(&url)).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let doc: DocumentData = resp.json().await?;
        Ok(Some(doc))
    }

    /// Upload a file into a storage bucket.
    pub async fn upload_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<FileData> {
        let url = format!("{}/storage/buckets/{}/files", self.endpoint, bucket_id);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        let resp = self
            .keyed(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let file: FileData = resp.json().await?;
        tracing::debug!(file_id = %file.id, bucket_id, "File uploaded");
        Ok(file)
    }

    /// Delete a file from a storage bucket.
    pub async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<()> {
        let url = format!(
            "{}/storage/buckets/{}/files/{}",
            self.endpoint, bucket_id, file_id
        );
        let resp = self.keyed(self.client.delete(&url)).send().await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        tracing::debug!(file_id, bucket_id, "File deleted");
        Ok(())
    }

    /// Build the public preview URL for a stored file. No network call.
    pub fn file_preview_url(&self, bucket_id: &str, file_id: &str) -> String {
        format!(
            "{}/storage/buckets/{}/files/{}/preview?project={}",
            self.endpoint, bucket_id, file_id, self.project_id
        )
    }

    /// Fetch the account the session JWT belongs to.
    pub async fn get_account(&self) -> Result<AccountData> {
        let jwt = self.jwt.as_deref().ok_or_else(|| {
            AppwriteError::Parse("no session JWT configured for account lookup".to_string())
        })?;

        let url = format!("{}/account", self.endpoint);
        let resp = self
            .client
            .get(&url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-JWT", jwt)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let account: AccountData = resp.json().await?;
        Ok(account)
    }
}

/// Turn a non-2xx response into an `Api` error, preferring the `message`
/// field of Appwrite's JSON error body over the raw body text.
async fn error_from_response(resp: Response) -> AppwriteError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    };
    AppwriteError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_url_contains_bucket_file_and_project() {
        let client = AppwriteClient::new(
            "https://cloud.appwrite.io/v1/".into(),
            "proj".into(),
            "key".into(),
        );
        let url = client.file_preview_url("covers", "img42");
        assert_eq!(
            url,
            "https://cloud.appwrite.io/v1/storage/buckets/covers/files/img42/preview?project=proj"
        );
    }

    #[test]
    fn error_body_parses_message() {
        let body = r#"{"message":"Document with the requested ID already exists.","code":409,"type":"document_already_exists"}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.message,
            "Document with the requested ID already exists."
        );
        assert_eq!(parsed.code, Some(409));
    }

    #[test]
    fn document_data_splits_metadata_from_attributes() {
        let body = r#"{
            "$id": "abc123",
            "$collectionId": "posts",
            "$createdAt": "2024-05-01T12:00:00.000+00:00",
            "$updatedAt": "2024-05-02T12:00:00.000+00:00",
            "title": "Hello",
            "status": "active"
        }"#;
        let doc: DocumentData = serde_json::from_str(body).unwrap();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.attributes["title"], "Hello");
        assert!(!doc.attributes.contains_key("$id"));
    }
}
