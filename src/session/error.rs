use thiserror::Error;

use crate::store::kv::StorageError;

/// Failures of the session's user-facing operations. None of them is fatal;
/// each is reported and leaves prior state intact.
#[derive(Debug, Error)]
pub enum FormError {
    /// Underlying store unavailable or full
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export attempted before anything was saved for this identity
    #[error("No form data to export")]
    NoData,

    /// Import file name does not look like an export
    #[error("Please select a valid JSON file ('{file_name}')")]
    UnsupportedFile { file_name: String },

    /// Import payload is not well-formed JSON
    #[error("Error reading file. Please check the file format.")]
    ImportParse(#[source] serde_json::Error),

    /// Import payload lacks `formId` or `timestamp`
    #[error("Invalid form data file (missing '{missing}')")]
    ImportSchema { missing: &'static str },

    /// Snapshot could not be encoded for export
    #[error("could not encode form data: {0}")]
    Encode(#[source] serde_json::Error),

    /// Reading an import file or writing an exported artifact failed
    #[error("could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FormError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Storage(StorageError::Corrupt { .. }) => {
                "Saved progress on this device could not be read".to_string()
            }
            FormError::Storage(_) => "Could not save your progress on this device".to_string(),
            FormError::UnsupportedFile { .. } => "Please select a valid JSON file".to_string(),
            FormError::ImportSchema { .. } => "Invalid form data file".to_string(),
            other => other.to_string(),
        }
    }
}
