//! Workflow tests for post submission: create-mode, update-mode, and the
//! failure/cleanup paths, all against mock stores.

use std::sync::Arc;
use std::time::Duration;

use blog_core::post::{FileId, ImageUpload, Post, PostDraft, PostId, PostStatus, UserId};
use blog_core::testing::{MockDocumentStore, MockFileStore};
use blog_core::workflow::{PostSubmissionWorkflow, SubmitError, SubmitState};

fn draft_with_image() -> PostDraft {
    PostDraft {
        title: "My First Post".into(),
        slug: "my-first-post".into(),
        content: "<p>Hello</p>".into(),
        status: PostStatus::Active,
        image: Some(ImageUpload {
            file_name: "cover.png".into(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }),
    }
}

fn draft_without_image() -> PostDraft {
    PostDraft {
        image: None,
        ..draft_with_image()
    }
}

fn stored_post(featured_image: Option<&str>) -> Post {
    Post {
        id: PostId::from("post-1"),
        title: "My First Post".into(),
        slug: "my-first-post".into(),
        content: "<p>Hello</p>".into(),
        status: PostStatus::Active,
        featured_image_id: featured_image.map(FileId::from),
        owner_id: UserId::from("author-1"),
    }
}

fn workflow(
    documents: &Arc<MockDocumentStore>,
    files: &Arc<MockFileStore>,
) -> PostSubmissionWorkflow {
    let documents: Arc<dyn blog_core::BaseDocumentStore> = documents.clone();
    let files: Arc<dyn blog_core::BaseFileStore> = files.clone();
    PostSubmissionWorkflow::new(documents, files)
}

#[tokio::test]
async fn create_mode_uploads_then_creates_with_owner_and_image() {
    let documents = Arc::new(MockDocumentStore::new().with_post_id("post-abc"));
    let files = Arc::new(MockFileStore::new().with_file_id("img-1"));
    let workflow = workflow(&documents, &files);

    let id = workflow
        .submit(draft_with_image(), None, &UserId::from("author-1"))
        .await
        .expect("create should succeed");

    assert_eq!(id, PostId::from("post-abc"));
    assert_eq!(files.upload_count(), 1);
    assert_eq!(files.delete_count(), 0);

    let creates = documents.create_calls();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].owner_id, UserId::from("author-1"));
    assert_eq!(creates[0].featured_image_id, FileId::from("img-1"));
    assert_eq!(creates[0].slug, "my-first-post");

    assert_eq!(workflow.state(), SubmitState::Succeeded(id));
    assert!(!workflow.is_busy());
}

#[tokio::test]
async fn create_mode_requires_an_image() {
    let documents = Arc::new(MockDocumentStore::new());
    let files = Arc::new(MockFileStore::new());
    let workflow = workflow(&documents, &files);

    let err = workflow
        .submit(draft_without_image(), None, &UserId::from("author-1"))
        .await
        .expect_err("create without image should fail");

    assert!(matches!(err, SubmitError::Validation(_)));
    assert_eq!(err.to_string(), "image required");
    // Validation happens before any store call.
    assert_eq!(files.upload_count(), 0);
    assert_eq!(documents.create_count(), 0);
}

#[tokio::test]
async fn update_without_new_image_keeps_existing_reference() {
    let post = stored_post(Some("img-old"));
    let documents = Arc::new(MockDocumentStore::new().with_post(post.clone()));
    let files = Arc::new(MockFileStore::new());
    let workflow = workflow(&documents, &files);

    let id = workflow
        .submit(draft_without_image(), Some(&post), &post.owner_id)
        .await
        .expect("update should succeed");

    assert_eq!(id, post.id);
    assert_eq!(files.upload_count(), 0);
    assert_eq!(files.delete_count(), 0);

    let updates = documents.update_calls();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, post.id);
    // No new upload, so the payload leaves the image reference untouched.
    assert!(updates[0].1.featured_image_id.is_none());
    let payload = serde_json::to_value(&updates[0].1).unwrap();
    assert!(payload.get("featuredImage").is_none());
}

#[tokio::test]
async fn update_with_new_image_replaces_and_deletes_old() {
    let post = stored_post(Some("img-old"));
    let documents = Arc::new(MockDocumentStore::new().with_post(post.clone()));
    let files = Arc::new(MockFileStore::new().with_file_id("img-new"));
    let workflow = workflow(&documents, &files);

    let id = workflow
        .submit(draft_with_image(), Some(&post), &post.owner_id)
        .await
        .expect("update should succeed");

    assert_eq!(id, post.id);
    assert_eq!(files.upload_count(), 1);
    assert_eq!(files.delete_calls(), vec![FileId::from("img-old")]);

    let updates = documents.update_calls();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].1.featured_image_id,
        Some(FileId::from("img-new"))
    );
}

#[tokio::test]
async fn update_with_new_image_but_no_previous_one_deletes_nothing() {
    let post = stored_post(None);
    let documents = Arc::new(MockDocumentStore::new().with_post(post.clone()));
    let files = Arc::new(MockFileStore::new().with_file_id("img-new"));
    let workflow = workflow(&documents, &files);

    workflow
        .submit(draft_with_image(), Some(&post), &post.owner_id)
        .await
        .expect("update should succeed");

    assert_eq!(files.upload_count(), 1);
    assert_eq!(files.delete_count(), 0);
    assert_eq!(
        documents.update_calls()[0].1.featured_image_id,
        Some(FileId::from("img-new"))
    );
}

#[tokio::test]
async fn upload_failure_stops_the_submission() {
    let documents = Arc::new(MockDocumentStore::new());
    let files = Arc::new(MockFileStore::new().with_upload_failure("storage quota exceeded"));
    let workflow = workflow(&documents, &files);

    let err = workflow
        .submit(draft_with_image(), None, &UserId::from("author-1"))
        .await
        .expect_err("upload failure should fail the submission");

    assert!(matches!(err, SubmitError::Upload(_)));
    assert_eq!(err.to_string(), "storage quota exceeded");
    assert_eq!(documents.create_count(), 0);
    assert_eq!(documents.update_count(), 0);
    assert_eq!(
        workflow.state(),
        SubmitState::Failed("storage quota exceeded".into())
    );
    assert!(!workflow.is_busy());
}

#[tokio::test]
async fn upload_failure_in_update_mode_never_touches_the_old_file() {
    let post = stored_post(Some("img-old"));
    let documents = Arc::new(MockDocumentStore::new().with_post(post.clone()));
    let files = Arc::new(MockFileStore::new().with_upload_failure("bucket unavailable"));
    let workflow = workflow(&documents, &files);

    let err = workflow
        .submit(draft_with_image(), Some(&post), &post.owner_id)
        .await
        .expect_err("upload failure should fail the submission");

    assert!(matches!(err, SubmitError::Upload(_)));
    // The old image is only deleted after a successful replacement upload.
    assert_eq!(files.delete_count(), 0);
    assert_eq!(documents.update_count(), 0);
}

#[tokio::test]
async fn persist_failure_surfaces_the_store_message() {
    let documents =
        Arc::new(MockDocumentStore::new().with_create_failure("slug already in use"));
    let files = Arc::new(MockFileStore::new());
    let workflow = workflow(&documents, &files);

    let err = workflow
        .submit(draft_with_image(), None, &UserId::from("author-1"))
        .await
        .expect_err("create failure should fail the submission");

    assert!(matches!(err, SubmitError::Persist(_)));
    assert_eq!(err.to_string(), "slug already in use");
    // The uploaded file is left behind; no compensating delete.
    assert_eq!(files.upload_count(), 1);
    assert_eq!(files.delete_count(), 0);
}

#[tokio::test]
async fn failed_cleanup_of_replaced_image_does_not_fail_the_submission() {
    let post = stored_post(Some("img-old"));
    let documents = Arc::new(MockDocumentStore::new().with_post(post.clone()));
    let files = Arc::new(
        MockFileStore::new()
            .with_file_id("img-new")
            .with_delete_failure("file is locked"),
    );
    let workflow = workflow(&documents, &files);

    let id = workflow
        .submit(draft_with_image(), Some(&post), &post.owner_id)
        .await
        .expect("delete failure must not surface");

    assert_eq!(id, post.id);
    assert_eq!(files.delete_count(), 1);
    assert_eq!(documents.update_count(), 1);
}

#[tokio::test]
async fn second_submission_while_busy_is_rejected() {
    let documents = Arc::new(MockDocumentStore::new());
    let files = Arc::new(
        MockFileStore::new().with_upload_delay(Duration::from_millis(50)),
    );
    let workflow = Arc::new(workflow(&documents, &files));

    let first = {
        let workflow = Arc::clone(&workflow);
        async move {
            workflow
                .submit(draft_with_image(), None, &UserId::from("author-1"))
                .await
        }
    };
    let second = {
        let workflow = Arc::clone(&workflow);
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(workflow.is_busy());
            workflow
                .submit(draft_with_image(), None, &UserId::from("author-1"))
                .await
        }
    };

    let (first, second) = tokio::join!(first, second);
    assert!(first.is_ok());
    assert!(matches!(second, Err(SubmitError::Busy)));
    // Only the first submission reached the stores.
    assert_eq!(files.upload_count(), 1);
    assert_eq!(documents.create_count(), 1);
}

#[tokio::test]
async fn failed_submission_can_be_retried() {
    let documents = Arc::new(MockDocumentStore::new().with_post_id("post-abc"));
    let files = Arc::new(MockFileStore::new());
    let workflow = workflow(&documents, &files);

    workflow
        .submit(draft_without_image(), None, &UserId::from("author-1"))
        .await
        .expect_err("missing image should fail");

    let id = workflow
        .submit(draft_with_image(), None, &UserId::from("author-1"))
        .await
        .expect("retry should succeed");
    assert_eq!(id, PostId::from("post-abc"));
}
