// BlogKernel - core infrastructure with all dependencies
//
// The BlogKernel holds the external-store dependencies and provides access
// via traits for testability.

use std::sync::Arc;

use appwrite_client::AppwriteClient;

use crate::appwrite::{
    AppwriteDocumentStore, AppwriteFileStore, AppwriteSessionProvider, AppwriteTargets,
};
use crate::store::{BaseDocumentStore, BaseFileStore, BaseSessionProvider};
use crate::workflow::PostSubmissionWorkflow;

/// BlogKernel holds the document store, file store, and session provider.
pub struct BlogKernel {
    pub documents: Arc<dyn BaseDocumentStore>,
    pub files: Arc<dyn BaseFileStore>,
    pub session: Arc<dyn BaseSessionProvider>,
}

impl BlogKernel {
    pub fn new(
        documents: Arc<dyn BaseDocumentStore>,
        files: Arc<dyn BaseFileStore>,
        session: Arc<dyn BaseSessionProvider>,
    ) -> Self {
        Self {
            documents,
            files,
            session,
        }
    }

    /// Wire all dependencies to a single Appwrite project.
    pub fn appwrite(client: Arc<AppwriteClient>, targets: AppwriteTargets) -> Self {
        Self {
            documents: Arc::new(AppwriteDocumentStore::new(
                Arc::clone(&client),
                targets.database_id,
                targets.collection_id,
            )),
            files: Arc::new(AppwriteFileStore::new(
                Arc::clone(&client),
                targets.bucket_id,
            )),
            session: Arc::new(AppwriteSessionProvider::new(client)),
        }
    }

    /// A submission workflow bound to this kernel's stores.
    pub fn workflow(&self) -> PostSubmissionWorkflow {
        PostSubmissionWorkflow::new(Arc::clone(&self.documents), Arc::clone(&self.files))
    }
}
