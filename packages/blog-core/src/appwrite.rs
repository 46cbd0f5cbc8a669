//! Appwrite-backed implementations of the store traits.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use appwrite_client::{AppwriteClient, DocumentData, UNIQUE_ID};

use crate::post::{FileId, ImageUpload, NewPost, Post, PostId, PostPatch, PostStatus, UserId};
use crate::store::{BaseDocumentStore, BaseFileStore, BaseSessionProvider};

/// Where posts and images live inside the Appwrite project.
#[derive(Debug, Clone)]
pub struct AppwriteTargets {
    pub database_id: String,
    pub collection_id: String,
    pub bucket_id: String,
}

/// Attribute layout of a post document in the collection.
#[derive(Debug, Deserialize)]
struct PostRecord {
    title: String,
    slug: String,
    content: String,
    status: PostStatus,
    #[serde(rename = "featuredImage", default)]
    featured_image: Option<String>,
    #[serde(rename = "userId")]
    user_id: String,
}

fn post_from_document(doc: DocumentData) -> Result<Post> {
    let id = PostId::new(doc.id);
    let record: PostRecord = serde_json::from_value(Value::Object(doc.attributes))
        .with_context(|| format!("Post document {id} has an unexpected shape"))?;
    Ok(Post {
        id,
        title: record.title,
        slug: record.slug,
        content: record.content,
        status: record.status,
        featured_image_id: record.featured_image.map(FileId::new),
        owner_id: UserId::new(record.user_id),
    })
}

/// Appwrite Databases implementation of BaseDocumentStore
pub struct AppwriteDocumentStore {
    client: Arc<AppwriteClient>,
    database_id: String,
    collection_id: String,
}

impl AppwriteDocumentStore {
    pub fn new(client: Arc<AppwriteClient>, database_id: String, collection_id: String) -> Self {
        Self {
            client,
            database_id,
            collection_id,
        }
    }
}

#[async_trait]
impl BaseDocumentStore for AppwriteDocumentStore {
    async fn create(&self, post: &NewPost) -> Result<Post> {
        let data = serde_json::to_value(post).context("Failed to serialize post payload")?;
        let doc = self
            .client
            .create_document(&self.database_id, &self.collection_id, UNIQUE_ID, &data)
            .await?;
        post_from_document(doc)
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> Result<Post> {
        let data = serde_json::to_value(patch).context("Failed to serialize post patch")?;
        let doc = self
            .client
            .update_document(&self.database_id, &self.collection_id, id.as_str(), &data)
            .await?;
        post_from_document(doc)
    }

    async fn get(&self, id: &PostId) -> Result<Option<Post>> {
        let doc = self
            .client
            .get_document(&self.database_id, &self.collection_id, id.as_str())
            .await?;
        doc.map(post_from_document).transpose()
    }
}

/// Appwrite Storage implementation of BaseFileStore
pub struct AppwriteFileStore {
    client: Arc<AppwriteClient>,
    bucket_id: String,
}

impl AppwriteFileStore {
    pub fn new(client: Arc<AppwriteClient>, bucket_id: String) -> Self {
        Self { client, bucket_id }
    }
}

#[async_trait]
impl BaseFileStore for AppwriteFileStore {
    async fn upload(&self, image: &ImageUpload) -> Result<FileId> {
        let file_id = uuid::Uuid::new_v4().to_string();
        let file = self
            .client
            .upload_file(
                &self.bucket_id,
                &file_id,
                &image.file_name,
                image.bytes.clone(),
            )
            .await?;
        Ok(FileId::new(file.id))
    }

    async fn delete(&self, id: &FileId) -> Result<()> {
        self.client.delete_file(&self.bucket_id, id.as_str()).await?;
        Ok(())
    }

    fn preview_url(&self, id: &FileId) -> String {
        self.client.file_preview_url(&self.bucket_id, id.as_str())
    }
}

/// Appwrite Account implementation of BaseSessionProvider
pub struct AppwriteSessionProvider {
    client: Arc<AppwriteClient>,
}

impl AppwriteSessionProvider {
    pub fn new(client: Arc<AppwriteClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseSessionProvider for AppwriteSessionProvider {
    async fn current_user(&self) -> Result<UserId> {
        let account = self
            .client
            .get_account()
            .await
            .context("Failed to resolve the authenticated user")?;
        Ok(UserId::new(account.id))
    }
}
