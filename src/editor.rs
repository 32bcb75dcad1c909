//! Backend service the route layer holds. Every operation validates the
//! payload before ghost storage is touched; a validation failure leaves
//! storage untouched.

use std::sync::Arc;

use anyhow::Result;

use crate::location::{self, ResolvedLocation};
use crate::permissions::FilePermissions;
use crate::registry::{is_builtin_module_path, FileType};
use crate::storage::GhostStorage;
use crate::types::{EditableFile, FileAction};
use crate::validation::validate_file_payload;

pub struct EditorService {
    storage: Arc<dyn GhostStorage>,
}

impl EditorService {
    pub fn new(storage: Arc<dyn GhostStorage>) -> Self {
        Self { storage }
    }

    /// Validate and persist a file at its resolved location.
    pub async fn save_file(
        &self,
        file: &EditableFile,
        permissions: &FilePermissions,
        current_bot_id: &str,
    ) -> Result<ResolvedLocation> {
        validate_file_payload(file, permissions, current_bot_id, FileAction::Write).await?;
        let file_type = FileType::lookup(&file.file_type)?;
        let resolved = location::resolve(file_type, file);
        self.storage.upsert_file(&resolved, &file.content).await?;
        tracing::info!(
            folder = %resolved.folder,
            filename = %resolved.filename,
            "saved editor file"
        );
        Ok(resolved)
    }

    /// Validate and fetch a file's content from its resolved location.
    pub async fn read_file(
        &self,
        file: &EditableFile,
        permissions: &FilePermissions,
        current_bot_id: &str,
    ) -> Result<String> {
        validate_file_payload(file, permissions, current_bot_id, FileAction::Read).await?;
        let file_type = FileType::lookup(&file.file_type)?;
        let resolved = location::resolve(file_type, file);
        self.storage.read_file(&resolved).await
    }

    /// Deletion is gated like a write.
    pub async fn delete_file(
        &self,
        file: &EditableFile,
        permissions: &FilePermissions,
        current_bot_id: &str,
    ) -> Result<()> {
        validate_file_payload(file, permissions, current_bot_id, FileAction::Write).await?;
        let file_type = FileType::lookup(&file.file_type)?;
        let resolved = location::resolve(file_type, file);
        self.storage.delete_file(&resolved).await?;
        tracing::info!(
            folder = %resolved.folder,
            filename = %resolved.filename,
            "deleted editor file"
        );
        Ok(())
    }

    /// Raw files under `folder`, with platform builtin module directories
    /// hidden from the listing.
    pub async fn list_raw_files(&self, folder: &str) -> Result<Vec<String>> {
        let files = self.storage.list_files(folder).await?;
        Ok(files
            .into_iter()
            .filter(|path| !is_builtin_module_path(path))
            .collect())
    }
}
