use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A document returned by the Databases API.
///
/// Appwrite prefixes its own metadata with `$`; everything else is the
/// collection's attribute data and is kept as a raw JSON map so callers can
/// deserialize it into their own record types.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentData {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId", default)]
    pub collection_id: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A file record returned by the Storage API.
#[derive(Debug, Clone, Deserialize)]
pub struct FileData {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(rename = "sizeOriginal", default)]
    pub size_original: Option<u64>,
}

/// The authenticated account returned by `GET /account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body Appwrite returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}
