use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use blog_core::AppwriteTargets;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    /// Session JWT of the signed-in author; needed to resolve the owner
    /// when creating posts.
    pub jwt: Option<String>,
    pub database_id: String,
    pub collection_id: String,
    pub bucket_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            endpoint: env::var("APPWRITE_ENDPOINT")
                .unwrap_or_else(|_| "https://cloud.appwrite.io/v1".to_string()),
            project_id: env::var("APPWRITE_PROJECT_ID")
                .context("APPWRITE_PROJECT_ID must be set")?,
            api_key: env::var("APPWRITE_API_KEY").context("APPWRITE_API_KEY must be set")?,
            jwt: env::var("APPWRITE_JWT").ok(),
            database_id: env::var("APPWRITE_DATABASE_ID")
                .context("APPWRITE_DATABASE_ID must be set")?,
            collection_id: env::var("APPWRITE_COLLECTION_ID")
                .context("APPWRITE_COLLECTION_ID must be set")?,
            bucket_id: env::var("APPWRITE_BUCKET_ID").context("APPWRITE_BUCKET_ID must be set")?,
        })
    }

    pub fn targets(&self) -> AppwriteTargets {
        AppwriteTargets {
            database_id: self.database_id.clone(),
            collection_id: self.collection_id.clone(),
            bucket_id: self.bucket_id.clone(),
        }
    }
}
