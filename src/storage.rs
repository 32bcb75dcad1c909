use anyhow::Result;
use async_trait::async_trait;

use crate::location::ResolvedLocation;

/// Interface to the physical ghost content store. The engine resolves
/// locations and gates access; implementations own the actual I/O,
/// versioning, and any concurrency control over concurrent writers.
#[async_trait]
pub trait GhostStorage: Send + Sync {
    async fn read_file(&self, location: &ResolvedLocation) -> Result<String>;
    async fn upsert_file(&self, location: &ResolvedLocation, content: &str) -> Result<()>;
    async fn delete_file(&self, location: &ResolvedLocation) -> Result<()>;
    /// Relative paths of all files under `folder`, recursively.
    async fn list_files(&self, folder: &str) -> Result<Vec<String>>;
}
