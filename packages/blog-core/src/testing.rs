// TestDependencies - mock implementations for testing
//
// Provides mock stores that can be injected into BlogKernel or directly
// into PostSubmissionWorkflow for tests. Each mock records its calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::kernel::BlogKernel;
use crate::post::{FileId, ImageUpload, NewPost, Post, PostId, PostPatch, UserId};
use crate::store::{BaseDocumentStore, BaseFileStore, BaseSessionProvider};

// =============================================================================
// Mock File Store
// =============================================================================

pub struct MockFileStore {
    upload_calls: Arc<Mutex<Vec<ImageUpload>>>,
    delete_calls: Arc<Mutex<Vec<FileId>>>,
    queued_file_ids: Arc<Mutex<Vec<FileId>>>,
    upload_failure: Arc<Mutex<Option<String>>>,
    delete_failure: Arc<Mutex<Option<String>>>,
    upload_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self {
            upload_calls: Arc::new(Mutex::new(Vec::new())),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
            queued_file_ids: Arc::new(Mutex::new(Vec::new())),
            upload_failure: Arc::new(Mutex::new(None)),
            delete_failure: Arc::new(Mutex::new(None)),
            upload_delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a file identifier to be returned by the next upload.
    pub fn with_file_id(self, id: &str) -> Self {
        self.queued_file_ids.lock().unwrap().push(FileId::from(id));
        self
    }

    /// Make every upload fail with the given message.
    pub fn with_upload_failure(self, message: &str) -> Self {
        *self.upload_failure.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Make every delete fail with the given message.
    pub fn with_delete_failure(self, message: &str) -> Self {
        *self.delete_failure.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Delay uploads, for exercising the in-flight guard.
    pub fn with_upload_delay(self, delay: Duration) -> Self {
        *self.upload_delay.lock().unwrap() = Some(delay);
        self
    }

    /// Get all images that were uploaded.
    pub fn upload_calls(&self) -> Vec<ImageUpload> {
        self.upload_calls.lock().unwrap().clone()
    }

    /// Get all file identifiers that were deleted.
    pub fn delete_calls(&self) -> Vec<FileId> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.upload_calls.lock().unwrap().len()
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.lock().unwrap().len()
    }
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFileStore for MockFileStore {
    async fn upload(&self, image: &ImageUpload) -> Result<FileId> {
        let delay = *self.upload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        // Record the call
        self.upload_calls.lock().unwrap().push(image.clone());

        if let Some(message) = self.upload_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }

        let mut queued = self.queued_file_ids.lock().unwrap();
        if !queued.is_empty() {
            Ok(queued.remove(0))
        } else {
            let n = self.upload_calls.lock().unwrap().len();
            Ok(FileId::new(format!("mock-file-{n}")))
        }
    }

    async fn delete(&self, id: &FileId) -> Result<()> {
        self.delete_calls.lock().unwrap().push(id.clone());

        if let Some(message) = self.delete_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(())
    }

    fn preview_url(&self, id: &FileId) -> String {
        format!("https://files.example.org/{id}/preview")
    }
}

// =============================================================================
// Mock Document Store
// =============================================================================

pub struct MockDocumentStore {
    create_calls: Arc<Mutex<Vec<NewPost>>>,
    update_calls: Arc<Mutex<Vec<(PostId, PostPatch)>>>,
    posts: Arc<Mutex<HashMap<PostId, Post>>>,
    next_post_id: Arc<Mutex<Vec<PostId>>>,
    create_failure: Arc<Mutex<Option<String>>>,
    update_failure: Arc<Mutex<Option<String>>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            create_calls: Arc::new(Mutex::new(Vec::new())),
            update_calls: Arc::new(Mutex::new(Vec::new())),
            posts: Arc::new(Mutex::new(HashMap::new())),
            next_post_id: Arc::new(Mutex::new(Vec::new())),
            create_failure: Arc::new(Mutex::new(None)),
            update_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Seed a stored post (for `get` and update-merging).
    pub fn with_post(self, post: Post) -> Self {
        self.posts.lock().unwrap().insert(post.id.clone(), post);
        self
    }

    /// Queue an identity to be assigned to the next created post.
    pub fn with_post_id(self, id: &str) -> Self {
        self.next_post_id.lock().unwrap().push(PostId::from(id));
        self
    }

    /// Make every create fail with the given message.
    pub fn with_create_failure(self, message: &str) -> Self {
        *self.create_failure.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Make every update fail with the given message.
    pub fn with_update_failure(self, message: &str) -> Self {
        *self.update_failure.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Get all create payloads.
    pub fn create_calls(&self) -> Vec<NewPost> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Get all update calls with their payloads.
    pub fn update_calls(&self) -> Vec<(PostId, PostPatch)> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.lock().unwrap().len()
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentStore for MockDocumentStore {
    async fn create(&self, post: &NewPost) -> Result<Post> {
        self.create_calls.lock().unwrap().push(post.clone());

        if let Some(message) = self.create_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }

        let id = {
            let mut queued = self.next_post_id.lock().unwrap();
            if !queued.is_empty() {
                queued.remove(0)
            } else {
                let n = self.create_calls.lock().unwrap().len();
                PostId::new(format!("mock-post-{n}"))
            }
        };

        let created = Post {
            id: id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            status: post.status,
            featured_image_id: Some(post.featured_image_id.clone()),
            owner_id: post.owner_id.clone(),
        };
        self.posts.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: &PostId, patch: &PostPatch) -> Result<Post> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.clone(), patch.clone()));

        if let Some(message) = self.update_failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }

        let mut posts = self.posts.lock().unwrap();
        let existing = posts.get(id);
        let updated = Post {
            id: id.clone(),
            title: patch.title.clone(),
            slug: patch.slug.clone(),
            content: patch.content.clone(),
            status: patch.status,
            featured_image_id: patch
                .featured_image_id
                .clone()
                .or_else(|| existing.and_then(|p| p.featured_image_id.clone())),
            owner_id: existing
                .map(|p| p.owner_id.clone())
                .unwrap_or_else(|| UserId::from("mock-user")),
        };
        posts.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    async fn get(&self, id: &PostId) -> Result<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(id).cloned())
    }
}

// =============================================================================
// Mock Session Provider
// =============================================================================

pub struct MockSessionProvider {
    user: Option<UserId>,
}

impl MockSessionProvider {
    pub fn new() -> Self {
        Self {
            user: Some(UserId::from("mock-user")),
        }
    }

    pub fn with_user(mut self, id: &str) -> Self {
        self.user = Some(UserId::from(id));
        self
    }

    /// A provider with no active session.
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl Default for MockSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSessionProvider for MockSessionProvider {
    async fn current_user(&self) -> Result<UserId> {
        self.user
            .clone()
            .ok_or_else(|| anyhow!("no active session"))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

pub struct TestDependencies {
    pub documents: Arc<MockDocumentStore>,
    pub files: Arc<MockFileStore>,
    pub session: Arc<MockSessionProvider>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(MockDocumentStore::new()),
            files: Arc::new(MockFileStore::new()),
            session: Arc::new(MockSessionProvider::new()),
        }
    }

    /// Set a mock document store
    pub fn mock_documents(mut self, store: MockDocumentStore) -> Self {
        self.documents = Arc::new(store);
        self
    }

    /// Set a mock file store
    pub fn mock_files(mut self, store: MockFileStore) -> Self {
        self.files = Arc::new(store);
        self
    }

    /// Set a mock session provider
    pub fn mock_session(mut self, session: MockSessionProvider) -> Self {
        self.session = Arc::new(session);
        self
    }

    /// Convert into a BlogKernel for testing
    pub fn into_kernel(self) -> BlogKernel {
        BlogKernel::new(self.documents, self.files, self.session)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
