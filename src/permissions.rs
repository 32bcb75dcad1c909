//! Three-tier permission model gating file access.
//!
//! Grants arrive per request as a snapshot keyed by `<scope>.<kind>` on the
//! wire; internally keys are structured pairs so a typo'd scope or kind
//! cannot silently read as "denied".

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::FileDefinition;
use crate::types::{EditableFile, FileAction};

/// Ownership tier a grant applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    Global,
    Bot,
    Root,
}

impl PermissionScope {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionScope::Global => "global",
            PermissionScope::Bot => "bot",
            PermissionScope::Root => "root",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(PermissionScope::Global),
            "bot" => Some(PermissionScope::Bot),
            "root" => Some(PermissionScope::Root),
            _ => None,
        }
    }
}

/// Permission families the file types map onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Actions,
    Hooks,
    Configs,
    ModuleConfig,
    Content,
    Flows,
    Qna,
    Raw,
}

impl PermissionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKind::Actions => "actions",
            PermissionKind::Hooks => "hooks",
            PermissionKind::Configs => "configs",
            PermissionKind::ModuleConfig => "module_config",
            PermissionKind::Content => "content",
            PermissionKind::Flows => "flows",
            PermissionKind::Qna => "qna",
            PermissionKind::Raw => "raw",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "actions" => Some(PermissionKind::Actions),
            "hooks" => Some(PermissionKind::Hooks),
            "configs" => Some(PermissionKind::Configs),
            "module_config" => Some(PermissionKind::ModuleConfig),
            "content" => Some(PermissionKind::Content),
            "flows" => Some(PermissionKind::Flows),
            "qna" => Some(PermissionKind::Qna),
            "raw" => Some(PermissionKind::Raw),
            _ => None,
        }
    }
}

/// Fully-qualified grant key, `<scope>.<kind>` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    pub scope: PermissionScope,
    pub kind: PermissionKind,
}

impl PermissionKey {
    pub fn new(scope: PermissionScope, kind: PermissionKind) -> Self {
        Self { scope, kind }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (scope, kind) = s.split_once('.')?;
        Some(Self {
            scope: PermissionScope::parse(scope)?,
            kind: PermissionKind::parse(kind)?,
        })
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope.as_str(), self.kind.as_str())
    }
}

/// Read/write pair attached to one grant key.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ActionGrant {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

impl ActionGrant {
    pub fn allows(self, action: FileAction) -> bool {
        match action {
            FileAction::Read => self.read,
            FileAction::Write => self.write,
        }
    }
}

/// Per-request snapshot of the caller's grants. Missing keys deny; unknown
/// dotted keys are rejected when a wire snapshot is deserialized.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "HashMap<String, ActionGrant>")]
pub struct FilePermissions {
    grants: HashMap<PermissionKey, ActionGrant>,
}

impl FilePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, key: PermissionKey, grant: ActionGrant) {
        self.grants.insert(key, grant);
    }

    pub fn allows(&self, key: PermissionKey, action: FileAction) -> bool {
        self.grants.get(&key).map_or(false, |g| g.allows(action))
    }
}

impl TryFrom<HashMap<String, ActionGrant>> for FilePermissions {
    type Error = String;

    fn try_from(raw: HashMap<String, ActionGrant>) -> Result<Self, Self::Error> {
        let mut grants = HashMap::with_capacity(raw.len());
        for (key, grant) in raw {
            let parsed =
                PermissionKey::parse(&key).ok_or_else(|| format!("unknown permission key: {key}"))?;
            grants.insert(parsed, grant);
        }
        Ok(Self { grants })
    }
}

/// Decide whether `action` on `file` is authorized under the three-tier
/// model. The global, scoped, and root paths are evaluated independently
/// and OR-ed; a grant held on one tier never stands in for another, and a
/// tier forbidden by the type's definition stays unusable no matter what
/// the caller holds.
pub fn authorize(
    def: &FileDefinition,
    file: &EditableFile,
    permissions: &FilePermissions,
    action: FileAction,
) -> bool {
    let has_global_grant = def.allow_global
        && permissions.allows(
            PermissionKey::new(PermissionScope::Global, def.permission),
            action,
        );
    let has_scoped_grant = def.allow_scoped
        && permissions.allows(
            PermissionKey::new(PermissionScope::Bot, def.permission),
            action,
        );

    let global_applies = def.allow_global && file.bot_scope().is_none();
    let scoped_applies = def.allow_scoped && file.bot_scope().is_some();

    let has_root_grant = def.allow_root
        && permissions.allows(
            PermissionKey::new(PermissionScope::Root, def.permission),
            action,
        );

    (has_global_grant && global_applies) || (has_scoped_grant && scoped_applies) || has_root_grant
}
