//! Post entity and the payload types the submission workflow builds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Store-assigned document identifier of a post. Immutable once created.
    PostId
);
string_id!(
    /// Identifier of a file resource owned by the external file store.
    FileId
);
string_id!(
    /// Identifier of an authenticated user.
    UserId
);

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Active,
    Inactive,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Active
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Active => f.write_str("active"),
            PostStatus::Inactive => f.write_str("inactive"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PostStatus::Active),
            "inactive" => Ok(PostStatus::Inactive),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// A post as stored in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub featured_image_id: Option<FileId>,
    pub owner_id: UserId,
}

/// An image the author selected for upload. Raw bytes plus the original
/// file name (the store uses it for content-type detection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Form fields collected from the author before submission.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub image: Option<ImageUpload>,
}

/// Payload for creating a post. Always carries the uploaded image and the
/// creating user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(rename = "featuredImage")]
    pub featured_image_id: FileId,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
}

/// Partial payload for updating a post. `featured_image_id` is serialized
/// only when a replacement upload happened, so the store keeps the existing
/// reference otherwise. `owner_id` is never part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPatch {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(rename = "featuredImage", skip_serializing_if = "Option::is_none")]
    pub featured_image_id: Option<FileId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PostStatus::Active).unwrap(),
            serde_json::json!("active")
        );
        assert_eq!("inactive".parse::<PostStatus>(), Ok(PostStatus::Inactive));
        assert!("draft".parse::<PostStatus>().is_err());
    }

    #[test]
    fn patch_omits_featured_image_when_unchanged() {
        let patch = PostPatch {
            title: "Title".into(),
            slug: "title".into(),
            content: "body".into(),
            status: PostStatus::Active,
            featured_image_id: None,
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert!(value.get("featuredImage").is_none());
    }

    #[test]
    fn patch_carries_featured_image_when_replaced() {
        let patch = PostPatch {
            title: "Title".into(),
            slug: "title".into(),
            content: "body".into(),
            status: PostStatus::Inactive,
            featured_image_id: Some(FileId::from("img-2")),
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["featuredImage"], "img-2");
    }

    #[test]
    fn new_post_carries_owner_and_image() {
        let post = NewPost {
            title: "Title".into(),
            slug: "title".into(),
            content: "body".into(),
            status: PostStatus::Active,
            featured_image_id: FileId::from("img-1"),
            owner_id: UserId::from("user-1"),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["featuredImage"], "img-1");
        assert_eq!(value["userId"], "user-1");
    }
}
