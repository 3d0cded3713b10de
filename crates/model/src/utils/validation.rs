//! Validation utilities.

use crate::types::{ModelError, ModelResult};

/// Characters that may not appear in an attachment file name.
const INVALID_FILE_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Validate that an identifier is present
    pub fn id(field: &str, value: &str) -> ModelResult<()> {
        if value.trim().is_empty() {
            return Err(ModelError::validation(format!("{} cannot be empty", field)));
        }

        Ok(())
    }

    /// Validate display name
    pub fn display_name(name: &str) -> ModelResult<()> {
        if name.trim().is_empty() {
            return Err(ModelError::validation("Name cannot be empty"));
        }

        if name.chars().count() > 100 {
            return Err(ModelError::validation("Name too long (max 100 characters)"));
        }

        Ok(())
    }

    /// Validate message content against a character limit
    pub fn message_content(content: &str, max_length: usize) -> ModelResult<()> {
        let length = content.chars().count();
        if length > max_length {
            return Err(ModelError::validation(format!(
                "Message content too long ({} characters, max {})",
                length, max_length
            )));
        }

        Ok(())
    }

    /// Validate file name
    pub fn file_name(file_name: &str) -> ModelResult<()> {
        if file_name.trim().is_empty() {
            return Err(ModelError::validation("File name cannot be empty"));
        }

        if file_name.len() > 255 {
            return Err(ModelError::validation("File name too long (max 255 characters)"));
        }

        if let Some(invalid) = file_name
            .chars()
            .find(|c| INVALID_FILE_NAME_CHARS.contains(c))
        {
            return Err(ModelError::validation(format!(
                "File name contains invalid character: {}",
                invalid
            )));
        }

        Ok(())
    }

    /// Validate file size
    pub fn file_size(size_bytes: u64, max_size_bytes: u64) -> ModelResult<()> {
        if size_bytes == 0 {
            return Err(ModelError::validation("File size must be positive"));
        }

        if size_bytes > max_size_bytes {
            return Err(ModelError::validation(format!(
                "File size too large (max {} MB)",
                max_size_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Validate a reaction emoji
    pub fn emoji(emoji: &str) -> ModelResult<()> {
        if emoji.trim().is_empty() {
            return Err(ModelError::validation("Emoji cannot be empty"));
        }

        // Multi-codepoint sequences (flags, skin tones, ZWJ families) stay well under this.
        if emoji.len() > 32 {
            return Err(ModelError::validation("Emoji too long (max 32 bytes)"));
        }

        Ok(())
    }
}
