use serde::{Deserialize, Serialize};

use crate::types::{ModelError, ModelResult};
use crate::utils::Validator;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif"];

/// A file attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Display file name
    pub name: String,
    /// Handle to the stored file; history payloads may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileHandle>,
    /// Thumbnail or inline preview URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Attachment kind
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

/// Older payloads call the same shape `MessageAttachment`.
pub type MessageAttachment = Attachment;

/// Reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    /// Where the file can be fetched from
    pub uri: String,
    /// MIME type
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Attachment kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Document,
}

impl AttachmentKind {
    /// Classify by MIME type
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_lowercase().starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::Document
        }
    }

    /// Classify by file extension
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            AttachmentKind::Image
        } else {
            AttachmentKind::Document
        }
    }
}

impl From<AttachmentKind> for String {
    fn from(kind: AttachmentKind) -> Self {
        match kind {
            AttachmentKind::Image => "image".to_string(),
            AttachmentKind::Document => "document".to_string(),
        }
    }
}

impl Attachment {
    /// Build an attachment for an uploaded file.
    ///
    /// The kind comes from the MIME type, or from the file name when the MIME
    /// type is missing or generic. Images preview themselves.
    pub fn from_file(name: impl Into<String>, file: FileHandle) -> Self {
        let name = name.into();
        let mime = file.mime_type.trim();
        let kind = if mime.is_empty() || mime == "application/octet-stream" {
            AttachmentKind::from_file_name(&name)
        } else {
            AttachmentKind::from_mime(mime)
        };
        let preview = match kind {
            AttachmentKind::Image => Some(file.uri.clone()),
            AttachmentKind::Document => None,
        };

        Self {
            name,
            file: Some(file),
            preview,
            kind,
        }
    }

    /// Check if this is an image attachment
    pub fn is_image(&self) -> bool {
        matches!(self.kind, AttachmentKind::Image)
    }

    /// Check if this is a document attachment
    pub fn is_document(&self) -> bool {
        matches!(self.kind, AttachmentKind::Document)
    }

    /// File size in bytes, when a file handle is present
    pub fn size_bytes(&self) -> Option<u64> {
        self.file.as_ref().map(|f| f.size_bytes)
    }

    /// Get human-readable file size
    pub fn formatted_size(&self) -> Option<String> {
        self.size_bytes().map(format_size)
    }

    /// Validate attachment data
    pub fn validate(&self, max_bytes: u64) -> ModelResult<()> {
        Validator::file_name(&self.name)?;

        if self.file.is_none() && self.preview.is_none() {
            return Err(ModelError::validation(format!(
                "Attachment '{}' has neither a file nor a preview",
                self.name
            )));
        }

        if let Some(ref file) = self.file {
            if file.uri.trim().is_empty() {
                return Err(ModelError::validation("File URI cannot be empty"));
            }
            Validator::file_size(file.size_bytes, max_bytes)?;
        }

        Ok(())
    }
}

/// Format a byte count as B/KB/MB/GB/TB
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
