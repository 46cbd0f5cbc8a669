//! Post submission workflow: create-or-update against the external stores.
//!
//! Two branches share a pending/success/failure lifecycle: create-mode when
//! no existing post identity is supplied, update-mode otherwise. The
//! workflow owns no rendering or routing; callers observe the outcome and
//! navigate on success.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::post::{NewPost, Post, PostDraft, PostId, PostPatch, UserId};
use crate::store::{BaseDocumentStore, BaseFileStore};

/// Failure taxonomy of a submission. All variants display as a single
/// human-readable message; callers present that text to the author.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Missing required input, caught before any network call.
    #[error("{0}")]
    Validation(String),

    /// The file store rejected or failed an upload.
    #[error("{0}")]
    Upload(String),

    /// The document store rejected a create or update.
    #[error("{0}")]
    Persist(String),

    /// A submission is already in flight on this workflow instance.
    #[error("a submission is already in progress")]
    Busy,
}

/// Lifecycle of a workflow instance as observed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded(PostId),
    Failed(String),
}

/// Validates a draft, performs the create-or-update call sequence against
/// the stores, and replaces the featured image with best-effort cleanup of
/// the old file.
///
/// A single instance never runs two submissions concurrently: the busy
/// guard fails the second attempt with [`SubmitError::Busy`]. Succeeded and
/// Failed both leave the instance ready for another attempt.
pub struct PostSubmissionWorkflow {
    documents: Arc<dyn BaseDocumentStore>,
    files: Arc<dyn BaseFileStore>,
    busy: AtomicBool,
    state: Mutex<SubmitState>,
}

impl PostSubmissionWorkflow {
    pub fn new(documents: Arc<dyn BaseDocumentStore>, files: Arc<dyn BaseFileStore>) -> Self {
        Self {
            documents,
            files,
            busy: AtomicBool::new(false),
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Submit a draft. `existing` selects update-mode and supplies the
    /// current stored post; `owner` is the authenticated user, used only at
    /// creation (passed explicitly, never read from ambient state).
    ///
    /// Returns the identity of the created or updated post; the caller is
    /// expected to navigate to the view keyed by it.
    pub async fn submit(
        &self,
        draft: PostDraft,
        existing: Option<&Post>,
        owner: &UserId,
    ) -> Result<PostId, SubmitError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        self.set_state(SubmitState::Submitting);

        let result = match existing {
            Some(post) => self.update_existing(&draft, post).await,
            None => self.create_new(&draft, owner).await,
        };

        match &result {
            Ok(id) => {
                tracing::info!(post_id = %id, "Post submission succeeded");
                self.set_state(SubmitState::Succeeded(id.clone()));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Post submission failed");
                self.set_state(SubmitState::Failed(err.to_string()));
            }
        }
        self.busy.store(false, Ordering::Release);

        result
    }

    /// Whether a submission is currently in flight (the caller's busy
    /// indicator).
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SubmitState {
        self.state.lock().unwrap().clone()
    }

    fn set_state(&self, state: SubmitState) {
        *self.state.lock().unwrap() = state;
    }

    async fn create_new(&self, draft: &PostDraft, owner: &UserId) -> Result<PostId, SubmitError> {
        let image = draft
            .image
            .as_ref()
            .ok_or_else(|| SubmitError::Validation("image required".to_string()))?;

        let file_id = self
            .files
            .upload(image)
            .await
            .map_err(|err| SubmitError::Upload(err.to_string()))?;

        // The uploaded file is not deleted if the create below fails; the
        // store is left with an orphan rather than guessing intent.
        let new_post = NewPost {
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            content: draft.content.clone(),
            status: draft.status,
            featured_image_id: file_id,
            owner_id: owner.clone(),
        };
        let created = self
            .documents
            .create(&new_post)
            .await
            .map_err(|err| SubmitError::Persist(err.to_string()))?;

        Ok(created.id)
    }

    async fn update_existing(&self, draft: &PostDraft, post: &Post) -> Result<PostId, SubmitError> {
        let replacement = match &draft.image {
            Some(image) => Some(
                self.files
                    .upload(image)
                    .await
                    .map_err(|err| SubmitError::Upload(err.to_string()))?,
            ),
            None => None,
        };

        // Only after the new upload succeeded: release the replaced file.
        // Best-effort; a failed delete is logged, never surfaced.
        if replacement.is_some() {
            if let Some(old) = &post.featured_image_id {
                if let Err(err) = self.files.delete(old).await {
                    tracing::warn!(file_id = %old, error = %err, "Failed to delete replaced image");
                }
            }
        }

        // `featured_image_id: None` keeps the key out of the payload so the
        // store preserves the existing reference.
        let patch = PostPatch {
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            content: draft.content.clone(),
            status: draft.status,
            featured_image_id: replacement,
        };
        let updated = self
            .documents
            .update(&post.id, &patch)
            .await
            .map_err(|err| SubmitError::Persist(err.to_string()))?;

        Ok(updated.id)
    }
}
