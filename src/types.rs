use serde::{Deserialize, Serialize};

/// Action a principal is attempting on an editable file.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Read,
    Write,
}

impl FileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            FileAction::Read => "read",
            FileAction::Write => "write",
        }
    }
}

/// One in-flight editor request payload, as sent by the studio.
///
/// The type tag stays a string here and is only resolved against the
/// registry during validation, so an unknown tag surfaces as a proper
/// rejection instead of a deserialization failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub name: String,
    #[serde(default)]
    pub bot_id: Option<String>,
    pub location: String,
    #[serde(default)]
    pub content: String,
    /// Lifecycle stage for hook files, unset for every other type.
    #[serde(default)]
    pub hook_kind: Option<String>,
}

impl EditableFile {
    /// Owning bot scope. An empty id on the wire means the same as an
    /// absent one: the file is global.
    pub fn bot_scope(&self) -> Option<&str> {
        self.bot_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bot_id_means_global() {
        let mut file = EditableFile {
            file_type: "action".to_string(),
            name: "run.js".to_string(),
            bot_id: None,
            location: "run.js".to_string(),
            content: String::new(),
            hook_kind: None,
        };
        assert!(file.bot_scope().is_none());
        file.bot_id = Some(String::new());
        assert!(file.bot_scope().is_none());
        file.bot_id = Some("bot1".to_string());
        assert_eq!(file.bot_scope(), Some("bot1"));
    }

    #[test]
    fn deserializes_studio_payload() {
        let file: EditableFile = serde_json::from_str(
            r#"{"type":"flow","name":"main.flow.json","botId":"bot1","location":"main.flow.json","content":"{}"}"#,
        )
        .unwrap();
        assert_eq!(file.file_type, "flow");
        assert_eq!(file.bot_scope(), Some("bot1"));
        assert!(file.hook_kind.is_none());
    }
}
