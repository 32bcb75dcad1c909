//! Static catalog of everything the editor is allowed to touch.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::permissions::PermissionKind;

/// Closed set of file types managed by the editor. Each variant carries a
/// static [`FileDefinition`]; per-type behavior (location overrides, custom
/// content rules) is dispatched by matching on the variant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Action,
    Hook,
    BotConfig,
    MainConfig,
    ModuleConfig,
    Content,
    Flow,
    Qna,
    Raw,
}

/// Storage and permission profile for one file type. Exactly the tiers
/// marked `allow_*` may hold instances of the type.
#[derive(Clone, Copy, Debug)]
pub struct FileDefinition {
    pub base_dir: &'static str,
    pub permission: PermissionKind,
    pub allow_global: bool,
    pub allow_scoped: bool,
    pub allow_root: bool,
    pub is_json: bool,
    /// Non-empty when the type restricts naming to a fixed list.
    pub filenames: &'static [&'static str],
}

const ACTION: FileDefinition = FileDefinition {
    base_dir: "actions",
    permission: PermissionKind::Actions,
    allow_global: true,
    allow_scoped: true,
    allow_root: false,
    is_json: false,
    filenames: &[],
};

const HOOK: FileDefinition = FileDefinition {
    base_dir: "hooks",
    permission: PermissionKind::Hooks,
    allow_global: true,
    allow_scoped: false,
    allow_root: false,
    is_json: false,
    filenames: &[],
};

const BOT_CONFIG: FileDefinition = FileDefinition {
    base_dir: "",
    permission: PermissionKind::Configs,
    allow_global: false,
    allow_scoped: true,
    allow_root: false,
    is_json: true,
    filenames: &["bot.config.json"],
};

const MAIN_CONFIG: FileDefinition = FileDefinition {
    base_dir: "",
    permission: PermissionKind::Configs,
    allow_global: true,
    allow_scoped: false,
    allow_root: true,
    is_json: true,
    filenames: &["main.config.json"],
};

const MODULE_CONFIG: FileDefinition = FileDefinition {
    base_dir: "config",
    permission: PermissionKind::ModuleConfig,
    allow_global: true,
    allow_scoped: true,
    allow_root: false,
    is_json: true,
    filenames: &[],
};

const CONTENT: FileDefinition = FileDefinition {
    base_dir: "content-elements",
    permission: PermissionKind::Content,
    allow_global: false,
    allow_scoped: true,
    allow_root: false,
    is_json: true,
    filenames: &[],
};

const FLOW: FileDefinition = FileDefinition {
    base_dir: "flows",
    permission: PermissionKind::Flows,
    allow_global: false,
    allow_scoped: true,
    allow_root: false,
    is_json: true,
    filenames: &[],
};

const QNA: FileDefinition = FileDefinition {
    base_dir: "qna",
    permission: PermissionKind::Qna,
    allow_global: false,
    allow_scoped: true,
    allow_root: false,
    is_json: true,
    filenames: &["qna.json"],
};

const RAW: FileDefinition = FileDefinition {
    base_dir: "",
    permission: PermissionKind::Raw,
    allow_global: false,
    allow_scoped: false,
    allow_root: true,
    is_json: false,
    filenames: &[],
};

impl FileType {
    pub const ALL: &'static [FileType] = &[
        FileType::Action,
        FileType::Hook,
        FileType::BotConfig,
        FileType::MainConfig,
        FileType::ModuleConfig,
        FileType::Content,
        FileType::Flow,
        FileType::Qna,
        FileType::Raw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Action => "action",
            FileType::Hook => "hook",
            FileType::BotConfig => "bot_config",
            FileType::MainConfig => "main_config",
            FileType::ModuleConfig => "module_config",
            FileType::Content => "content",
            FileType::Flow => "flow",
            FileType::Qna => "qna",
            FileType::Raw => "raw",
        }
    }

    /// Resolve a wire tag against the catalog.
    pub fn lookup(tag: &str) -> Result<FileType, EditorError> {
        FileType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| EditorError::UnknownFileType {
                given: tag.to_string(),
                allowed: FileType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn definition(self) -> &'static FileDefinition {
        match self {
            FileType::Action => &ACTION,
            FileType::Hook => &HOOK,
            FileType::BotConfig => &BOT_CONFIG,
            FileType::MainConfig => &MAIN_CONFIG,
            FileType::ModuleConfig => &MODULE_CONFIG,
            FileType::Content => &CONTENT,
            FileType::Flow => &FLOW,
            FileType::Qna => &QNA,
            FileType::Raw => &RAW,
        }
    }
}

/// Modules shipped with the platform. Their directories belong to module
/// packages, not to editors, so raw-file listings hide them.
pub const BUILTIN_MODULES: &[&str] = &[
    "analytics",
    "basic-skills",
    "builtin",
    "channel-messenger",
    "channel-slack",
    "channel-teams",
    "channel-telegram",
    "channel-web",
    "code-editor",
    "examples",
    "extensions",
    "history",
    "hitl",
    "nlu",
    "qna",
    "testing",
];

/// True when any component of `path` names a builtin module.
pub fn is_builtin_module_path(path: &str) -> bool {
    path.split('/').any(|part| BUILTIN_MODULES.contains(&part))
}
