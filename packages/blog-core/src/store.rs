// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The submission
// workflow is a domain function over these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::post::{FileId, ImageUpload, NewPost, Post, PostId, PostPatch, UserId};

// =============================================================================
// Document Store Trait (Infrastructure - post records)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Create a post document. The store assigns the identity.
    async fn create(&self, post: &NewPost) -> Result<Post>;

    /// Update a subset of a post's fields by identity.
    async fn update(&self, id: &PostId, patch: &PostPatch) -> Result<Post>;

    /// Fetch a post by identity. `None` if the store has no such document.
    async fn get(&self, id: &PostId) -> Result<Option<Post>>;
}

// =============================================================================
// File Store Trait (Infrastructure - binary assets)
// =============================================================================

#[async_trait]
pub trait BaseFileStore: Send + Sync {
    /// Upload an image, returning the store-assigned file identifier.
    async fn upload(&self, image: &ImageUpload) -> Result<FileId>;

    /// Delete a file by identifier.
    async fn delete(&self, id: &FileId) -> Result<()>;

    /// Public preview URL for a stored file. No network call.
    fn preview_url(&self, id: &FileId) -> String;
}

// =============================================================================
// Session Provider Trait (Infrastructure - authenticated identity)
// =============================================================================

#[async_trait]
pub trait BaseSessionProvider: Send + Sync {
    /// Identifier of the currently authenticated user. Fails when there is
    /// no active session.
    async fn current_user(&self) -> Result<UserId>;
}
