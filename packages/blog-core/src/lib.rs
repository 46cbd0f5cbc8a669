//! Domain core of the Inkpost blog authoring tools.
//!
//! Holds the post model, slug derivation and title→slug synchronization,
//! the post submission workflow, and the infrastructure traits binding it
//! all to the external document/file store (Appwrite). Mock stores for
//! tests live in [`testing`].

pub mod appwrite;
pub mod kernel;
pub mod post;
pub mod slug;
pub mod store;
pub mod testing;
pub mod workflow;

pub use appwrite::AppwriteTargets;
pub use kernel::BlogKernel;
pub use post::{FileId, ImageUpload, Post, PostDraft, PostId, PostStatus, UserId};
pub use slug::{derive_slug, SlugSync};
pub use store::{BaseDocumentStore, BaseFileStore, BaseSessionProvider};
pub use workflow::{PostSubmissionWorkflow, SubmitError, SubmitState};
