use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::upload::schema::FileType;

/// New upload row, written once the media bytes are stored.
#[derive(Debug, Clone)]
pub struct InsertUpload {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub file_url: String,
    pub storage_key: String,
    pub file_type: FileType,
    pub file_size: i64,
    pub watermarked_preview_url: Option<String>,
}

/// Text fields submitted alongside the multipart file.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UploadForm {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    pub description: String,
}

/// Upload listing row shown to companies.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub file_type: FileType,
    pub file_size: i64,
    pub watermarked_preview_url: Option<String>,
    pub uploader_id: Uuid,
    pub uploader_username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub image_mime_types: Vec<String>,
    pub video_mime_types: Vec<String>,
}

impl UploadConfig {
    pub fn with_max_size_mb(max_size_mb: usize) -> Self {
        Self { max_file_size: max_size_mb * 1024 * 1024, ..Self::default() }
    }

    pub fn classify(&self, mime_type: &str) -> Option<FileType> {
        if self.image_mime_types.iter().any(|m| m == mime_type) {
            Some(FileType::Image)
        } else if self.video_mime_types.iter().any(|m| m == mime_type) {
            Some(FileType::Video)
        } else {
            None
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024, // 100MB
            image_mime_types: ["image/jpeg", "image/jpg", "image/png"]
                .into_iter()
                .map(String::from)
                .collect(),
            video_mime_types: [
                "video/mp4",
                "video/quicktime",
                "video/mov",
                "video/avi",
                "video/x-msvideo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUploadsQuery {
    pub file_type: Option<FileType>,
}
