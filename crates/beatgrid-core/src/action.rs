//! Specific actions that can be attached to notes

use serde::{Deserialize, Serialize};

/// Identifier of a user-defined specific action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u64);

/// Icons available for specific actions.
///
/// Stored on disk by name. Names that are not in this set (older files,
/// hand-edited projects) load as [`ActionIcon::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionIcon {
    #[default]
    Generic,
    Star,
    Bolt,
    Heart,
    Shield,
    Sword,
    Fire,
    Flag,
    Bell,
    Target,
    Music,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl ActionIcon {
    pub const ALL: [ActionIcon; 15] = [
        Self::Generic,
        Self::Star,
        Self::Bolt,
        Self::Heart,
        Self::Shield,
        Self::Sword,
        Self::Fire,
        Self::Flag,
        Self::Bell,
        Self::Target,
        Self::Music,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "circle",
            Self::Star => "star",
            Self::Bolt => "bolt",
            Self::Heart => "heart",
            Self::Shield => "shield",
            Self::Sword => "sword",
            Self::Fire => "fire",
            Self::Flag => "flag",
            Self::Bell => "bell",
            Self::Target => "target",
            Self::Music => "music",
            Self::ArrowUp => "arrow-up",
            Self::ArrowDown => "arrow-down",
            Self::ArrowLeft => "arrow-left",
            Self::ArrowRight => "arrow-right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.name().eq_ignore_ascii_case(name))
    }

    /// Single-glyph label used when drawing the icon on a note
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Generic => "●",
            Self::Star => "★",
            Self::Bolt => "ϟ",
            Self::Heart => "♥",
            Self::Shield => "⛨",
            Self::Sword => "†",
            Self::Fire => "♨",
            Self::Flag => "⚑",
            Self::Bell => "♪",
            Self::Target => "◎",
            Self::Music => "♫",
            Self::ArrowUp => "↑",
            Self::ArrowDown => "↓",
            Self::ArrowLeft => "←",
            Self::ArrowRight => "→",
        }
    }
}

impl From<String> for ActionIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name).unwrap_or_default()
    }
}

impl From<ActionIcon> for String {
    fn from(icon: ActionIcon) -> Self {
        icon.name().to_string()
    }
}

/// A named action defined at project level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificAction {
    pub id: ActionId,
    pub name: String,
    pub icon: ActionIcon,
}

/// Copy of an action carried by a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAction {
    pub name: String,
    pub icon: ActionIcon,
}

impl From<&SpecificAction> for NoteAction {
    fn from(action: &SpecificAction) -> Self {
        Self {
            name: action.name.clone(),
            icon: action.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_names_round_trip() {
        for icon in ActionIcon::ALL {
            assert_eq!(ActionIcon::from_name(icon.name()), Some(icon));
        }
        assert_eq!(ActionIcon::from_name("ARROW-UP"), Some(ActionIcon::ArrowUp));
    }

    #[test]
    fn test_unknown_icon_loads_as_generic() {
        let action: NoteAction = serde_json::from_str(r#"{"name":"Jump","icon":"rocket"}"#).unwrap();
        assert_eq!(action.icon, ActionIcon::Generic);

        let json = serde_json::to_string(&NoteAction { name: "Dash".into(), icon: ActionIcon::Bolt }).unwrap();
        assert_eq!(json, r#"{"name":"Dash","icon":"bolt"}"#);
    }
}
