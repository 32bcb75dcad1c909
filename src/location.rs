//! Maps an editable file to its physical place in ghost storage.

use crate::registry::FileType;
use crate::types::EditableFile;

/// Physical placement of a file within the virtual store. Handed to the
/// storage collaborator as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub folder: String,
    pub filename: String,
}

/// Compute the ghost folder and filename for a file. A per-type override
/// wins when it yields a non-empty value; otherwise the type's base
/// directory and the file's own location apply.
pub fn resolve(file_type: FileType, file: &EditableFile) -> ResolvedLocation {
    let def = file_type.definition();
    let folder = folder_override(file_type, file)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| def.base_dir.to_string());
    let filename = filename_override(file_type, file)
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| file.location.clone());
    ResolvedLocation { folder, filename }
}

/// Hooks are grouped by lifecycle stage under the hooks directory.
fn folder_override(file_type: FileType, file: &EditableFile) -> Option<String> {
    match file_type {
        FileType::Hook => file
            .hook_kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .map(|kind| format!("hooks/{kind}")),
        _ => None,
    }
}

/// Module configs are stored one per module, named after the `$module`
/// field embedded in their payload. Malformed or missing metadata falls
/// back to the file's own location.
fn filename_override(file_type: FileType, file: &EditableFile) -> Option<String> {
    match file_type {
        FileType::ModuleConfig => {
            let value: serde_json::Value = serde_json::from_str(&file.content).ok()?;
            let module = value.get("$module")?.as_str()?;
            if module.is_empty() {
                None
            } else {
                Some(format!("{module}.json"))
            }
        }
        _ => None,
    }
}
