use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attachment metadata. File bytes are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_size: u64,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(idea_id: Uuid, file_name: impl Into<String>, file_size: u64) -> Self {
        let file_name = file_name.into();
        Self {
            id: Uuid::new_v4(),
            idea_id,
            file_path: format!("attachments/{}/{}", idea_id, file_name),
            content_type: guess_content_type(&file_name).map(str::to_string),
            file_name,
            file_size,
            uploaded_at: Utc::now(),
        }
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "pptx" => Some("application/vnd.openxmlformats-officedocument.presentationml.presentation"),
        _ => None,
    }
}
