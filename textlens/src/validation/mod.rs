//! Local checks run before anything is sent to the service.

use crate::models::prelude::UploadFile;
use thiserror::Error;

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const CSV_EXTENSION: &str = ".csv";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text to analyze")]
    EmptyInput,
    #[error("Please enter at least 10 characters for better analysis")]
    TooShort { chars: usize },
    #[error("Please upload a CSV file")]
    WrongExtension { name: String },
    #[error("File size must be less than 10MB")]
    TooLarge { size_bytes: u64 },
    #[error("Please upload a file first")]
    NoFileSelected,
}

/// Rejects text that is blank or shorter than [`MIN_TEXT_CHARS`] once trimmed.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let chars = trimmed.chars().count();
    if chars < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort { chars });
    }

    Ok(())
}

/// Rejects files that do not end in `.csv` (case-sensitive) or exceed [`MAX_UPLOAD_BYTES`].
pub fn validate_csv_upload(file: &UploadFile) -> Result<(), ValidationError> {
    check_csv_upload(&file.name, file.size_bytes())
}

/// Same rules as [`validate_csv_upload`], usable before a file is read into memory.
pub fn check_csv_upload(name: &str, size_bytes: u64) -> Result<(), ValidationError> {
    if !name.ends_with(CSV_EXTENSION) {
        return Err(ValidationError::WrongExtension {
            name: name.to_string(),
        });
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size_bytes });
    }

    Ok(())
}

pub mod prelude {
    pub use super::{
        MAX_UPLOAD_BYTES, MIN_TEXT_CHARS, ValidationError, check_csv_upload, validate_csv_upload,
        validate_text,
    };
}
