use serde::Serialize;

/// Modifier keys held while confirming a selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Navigate the current tab and close the popup.
    pub replace_current: bool,
    /// Open the new tab without switching to it.
    pub background: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The search box now holds this text.
    Input(String),
    /// Backspace pressed, before the search box is updated.
    Backspace,
    ArrowUp,
    ArrowDown,
    /// Enter pressed on the highlighted entry.
    Commit(Modifiers),
}

/// Where a resolved destination is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Disposition {
    ReplaceCurrent,
    NewTab { active: bool },
}

impl From<Modifiers> for Disposition {
    fn from(modifiers: Modifiers) -> Self {
        if modifiers.replace_current {
            Disposition::ReplaceCurrent
        } else {
            Disposition::NewTab {
                active: !modifiers.background,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub url: String,
    pub disposition: Disposition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_from_modifiers() {
        assert_eq!(
            Disposition::from(Modifiers::default()),
            Disposition::NewTab { active: true }
        );
        assert_eq!(
            Disposition::from(Modifiers {
                background: true,
                ..Default::default()
            }),
            Disposition::NewTab { active: false }
        );
        assert_eq!(
            Disposition::from(Modifiers {
                replace_current: true,
                background: true,
            }),
            Disposition::ReplaceCurrent
        );
    }

    #[test]
    fn test_destination_serializes() {
        let destination = Destination {
            url: "https://github.com/acme/widget/pulls".into(),
            disposition: Disposition::NewTab { active: true },
        };
        assert_eq!(
            serde_json::to_value(&destination).unwrap(),
            serde_json::json!({
                "url": "https://github.com/acme/widget/pulls",
                "disposition": {"kind": "new_tab", "active": true}
            })
        );
    }
}
