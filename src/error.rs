use thiserror::Error;

/// Terminal, request-scoped failures raised while gating a file operation.
/// None of these are retried internally; the first failure encountered is
/// the one surfaced to the caller.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid file type \"{given}\", only {allowed} are allowed at the moment")]
    UnknownFileType { given: String, allowed: String },

    #[error("can't perform modification on bot {bot_id}, switch to the correct bot to change it")]
    CrossTenantModification { bot_id: String },

    #[error("no permission to {action} {file_type} files")]
    PermissionDenied {
        action: &'static str,
        file_type: &'static str,
    },

    #[error("invalid JSON content: {0}")]
    InvalidJson(String),

    #[error("{0}")]
    CustomValidationFailed(String),

    #[error("invalid file name: {0}")]
    InvalidFilename(String),
}
