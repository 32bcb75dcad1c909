//! Request validation: the single gate every file read and write passes
//! through before the storage collaborator is allowed to act.

use std::path::{Component, Path};

use crate::error::EditorError;
use crate::permissions::{authorize, FilePermissions};
use crate::registry::FileType;
use crate::types::{EditableFile, FileAction};

/// Validate one editor request end to end.
///
/// Checks run cheapest and most security-sensitive first: registry lookup,
/// tenant isolation, permission evaluation, then content inspection. The
/// first failure is returned and nothing after it runs.
pub async fn validate_file_payload(
    file: &EditableFile,
    permissions: &FilePermissions,
    current_bot_id: &str,
    action: FileAction,
) -> Result<(), EditorError> {
    let file_type = FileType::lookup(&file.file_type)?;
    let def = file_type.definition();

    if let Some(bot_id) = file.bot_scope() {
        if bot_id != current_bot_id {
            return Err(EditorError::CrossTenantModification {
                bot_id: bot_id.to_string(),
            });
        }
    }

    if !authorize(def, file, permissions, action) {
        tracing::warn!(
            file_type = file_type.as_str(),
            action = action.as_str(),
            "file access denied"
        );
        return Err(EditorError::PermissionDenied {
            action: action.as_str(),
            file_type: file_type.as_str(),
        });
    }

    if def.is_json && !file.content.is_empty() {
        assert_valid_json(&file.content)?;
    }

    if let Some(message) = custom_checks(file_type, file, action == FileAction::Write).await {
        return Err(EditorError::CustomValidationFailed(message));
    }

    if !def.filenames.is_empty() && !def.filenames.contains(&file.location.as_str()) {
        return Err(EditorError::InvalidFilename(format!(
            "must be one of {}",
            def.filenames.join(", ")
        )));
    }

    // Raw files may carry a full folder path; everything else gets the
    // standard filename check.
    if file_type == FileType::Raw {
        assert_safe_raw_location(&file.location)?;
    } else {
        assert_valid_filename(&file.name)?;
    }

    Ok(())
}

/// Content must structurally parse as JSON; the shape is not constrained.
pub fn assert_valid_json(content: &str) -> Result<(), EditorError> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(_) => Ok(()),
        Err(err) => Err(EditorError::InvalidJson(err.to_string())),
    }
}

/// Filenames are restricted to ASCII letters, digits, `-`, `_` and `.`,
/// which keeps path separators and traversal sequences out entirely.
pub fn assert_valid_filename(name: &str) -> Result<(), EditorError> {
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(EditorError::InvalidFilename(format!(
            "\"{name}\" is empty or reserved"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(EditorError::InvalidFilename(format!(
            "\"{name}\" has invalid characters"
        )));
    }
    Ok(())
}

/// Raw locations may be nested relative paths, but never leave the store.
fn assert_safe_raw_location(location: &str) -> Result<(), EditorError> {
    let path = Path::new(location);
    if location.is_empty() || path.is_absolute() {
        return Err(EditorError::InvalidFilename(format!(
            "\"{location}\" must be a relative path"
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(EditorError::InvalidFilename(format!(
            "\"{location}\" escapes the store"
        )));
    }
    Ok(())
}

/// Per-type structural rules beyond plain JSON validity. The hook is async
/// so a rule may run deeper checks without blocking the caller; a returned
/// message is a failure. Content that does not parse is left to the JSON
/// check to report.
async fn custom_checks(file_type: FileType, file: &EditableFile, is_write: bool) -> Option<String> {
    match file_type {
        FileType::Flow => {
            if !is_write || file.content.is_empty() {
                return None;
            }
            let value: serde_json::Value = serde_json::from_str(&file.content).ok()?;
            let has_nodes = value
                .as_object()
                .and_then(|obj| obj.get("nodes"))
                .map(|nodes| nodes.is_array())
                .unwrap_or(false);
            if has_nodes {
                None
            } else {
                Some("flow content must declare a nodes array".to_string())
            }
        }
        FileType::ModuleConfig => {
            if file.content.is_empty() {
                return None;
            }
            let value: serde_json::Value = serde_json::from_str(&file.content).ok()?;
            if value.is_object() {
                None
            } else {
                Some("module config must be a JSON object".to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{ActionGrant, PermissionKey, PermissionKind, PermissionScope};

    fn scoped_file(file_type: &str, name: &str, content: &str) -> EditableFile {
        EditableFile {
            file_type: file_type.to_string(),
            name: name.to_string(),
            bot_id: Some("bot1".to_string()),
            location: name.to_string(),
            content: content.to_string(),
            hook_kind: None,
        }
    }

    fn grant(scope: PermissionScope, kind: PermissionKind) -> FilePermissions {
        let mut permissions = FilePermissions::new();
        permissions.grant(
            PermissionKey::new(scope, kind),
            ActionGrant { read: true, write: true },
        );
        permissions
    }

    #[tokio::test]
    async fn scoped_content_write_succeeds() {
        let file = scoped_file("content", "greet.json", "{}");
        let permissions = grant(PermissionScope::Bot, PermissionKind::Content);
        validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_current_bot_is_a_tenant_violation() {
        let file = scoped_file("content", "greet.json", "{}");
        let permissions = grant(PermissionScope::Bot, PermissionKind::Content);
        let err = validate_file_payload(&file, &permissions, "bot2", FileAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::CrossTenantModification { ref bot_id } if bot_id == "bot1"));
    }

    #[tokio::test]
    async fn tenant_check_runs_before_permissions() {
        // No grants at all: the cross-tenant failure must still win.
        let file = scoped_file("content", "greet.json", "{}");
        let err = validate_file_payload(&file, &FilePermissions::new(), "bot2", FileAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::CrossTenantModification { .. }));
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_with_the_allowed_set() {
        let file = scoped_file("wasm", "mod.wasm", "");
        let err = validate_file_payload(&file, &FilePermissions::new(), "bot1", FileAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownFileType { .. }));
        assert!(err.to_string().contains("flow"));
    }

    #[tokio::test]
    async fn missing_grant_is_a_permission_denial() {
        let file = scoped_file("content", "greet.json", "{}");
        let err = validate_file_payload(&file, &FilePermissions::new(), "bot1", FileAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_with_parser_message() {
        let file = scoped_file("content", "greet.json", "{ nope");
        let permissions = grant(PermissionScope::Bot, PermissionKind::Content);
        let err = validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap_err();
        match err {
            EditorError::InvalidJson(message) => assert!(!message.is_empty()),
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn any_valid_json_shape_passes_the_structural_check() {
        let permissions = grant(PermissionScope::Bot, PermissionKind::Content);
        for content in [r#"{"a":1}"#, "[1,2,3]", "\"text\"", "42", "null", ""] {
            let file = scoped_file("content", "greet.json", content);
            validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn flow_without_nodes_fails_custom_validation() {
        let file = scoped_file("flow", "main.flow.json", r#"{"version":1}"#);
        let permissions = grant(PermissionScope::Bot, PermissionKind::Flows);
        let err = validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::CustomValidationFailed(_)));
    }

    #[tokio::test]
    async fn flow_custom_rule_only_gates_writes() {
        let file = scoped_file("flow", "main.flow.json", r#"{"version":1}"#);
        let permissions = grant(PermissionScope::Bot, PermissionKind::Flows);
        validate_file_payload(&file, &permissions, "bot1", FileAction::Read)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn qna_location_must_match_the_fixed_name() {
        let mut file = scoped_file("qna", "other.json", "{}");
        file.location = "other.json".to_string();
        let permissions = grant(PermissionScope::Bot, PermissionKind::Qna);
        let err = validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap_err();
        match err {
            EditorError::InvalidFilename(message) => assert!(message.contains("qna.json")),
            other => panic!("expected InvalidFilename, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn filename_pattern_rejects_traversal_and_accepts_plain_names() {
        assert!(assert_valid_filename("my-file_2.txt").is_ok());
        assert!(assert_valid_filename("../../etc/passwd").is_err());
        assert!(assert_valid_filename("a/b.js").is_err());
        assert!(assert_valid_filename("").is_err());
        assert!(assert_valid_filename("..").is_err());
        assert!(assert_valid_filename("greet\u{202e}.js").is_err());
    }

    #[tokio::test]
    async fn raw_locations_may_nest_but_never_escape() {
        fn raw_file(location: &str) -> EditableFile {
            EditableFile {
                file_type: "raw".to_string(),
                name: location.to_string(),
                bot_id: None,
                location: location.to_string(),
                content: String::new(),
                hook_kind: None,
            }
        }
        let permissions = grant(PermissionScope::Root, PermissionKind::Raw);

        validate_file_payload(
            &raw_file("bots/demo/revisions/readme.md"),
            &permissions,
            "",
            FileAction::Write,
        )
        .await
        .unwrap();

        for location in ["../secrets.env", "a/../../b", "/etc/passwd", ""] {
            let err = validate_file_payload(&raw_file(location), &permissions, "", FileAction::Write)
                .await
                .unwrap_err();
            assert!(matches!(err, EditorError::InvalidFilename(_)), "{location} passed");
        }
    }

    #[tokio::test]
    async fn validation_is_idempotent() {
        let file = scoped_file("content", "greet.json", "{}");
        let permissions = grant(PermissionScope::Bot, PermissionKind::Content);
        for _ in 0..2 {
            validate_file_payload(&file, &permissions, "bot1", FileAction::Write)
                .await
                .unwrap();
        }

        let denied = scoped_file("qna", "other.json", "{}");
        let permissions = grant(PermissionScope::Bot, PermissionKind::Qna);
        let first = validate_file_payload(&denied, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap_err();
        let second = validate_file_payload(&denied, &permissions, "bot1", FileAction::Write)
            .await
            .unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }
}
