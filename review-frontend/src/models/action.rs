use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one document operation. Unique within a command registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Add,
    View,
    Revoke,
    Delete,
    ChangeName,
    ChangeStatus,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Add => "ADD",
            ActionType::View => "VIEW",
            ActionType::Revoke => "REVOKE",
            ActionType::Delete => "DELETE",
            ActionType::ChangeName => "CHANGE_NAME",
            ActionType::ChangeStatus => "CHANGE_STATUS",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    Error,
    Primary,
    Warn,
}

/// Display-facing description of one operation (tooltip label, icon, colour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    #[serde(rename = "colorClass", skip_serializing_if = "Option::is_none")]
    pub style: Option<ActionStyle>,
}

impl ActionDescriptor {
    pub fn new(action_type: ActionType, label: &'static str) -> Self {
        Self {
            action_type,
            label,
            icon: None,
            style: None,
        }
    }

    pub fn with_icon(self, icon: &'static str) -> Self {
        Self {
            icon: Some(icon),
            ..self
        }
    }

    pub fn with_style(self, style: ActionStyle) -> Self {
        Self {
            style: Some(style),
            ..self
        }
    }
}
