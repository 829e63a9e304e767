//! Read-only projection of the fields of `manifest.json` this crate cares about

use serde_json::Value;

/// Manifest file name, matched against the last path segment
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths the packager writes icon variants to, keyed by pixel size
pub const ICON_PATHS: [(u32, &str); 3] = [
    (16, "icons/icon16.png"),
    (48, "icons/icon48.png"),
    (128, "icons/icon128.png"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestView {
    pub name: Option<String>,
    pub action: Option<Action>,
    pub browser_action: Option<Action>,
    pub has_icons: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    pub default_popup: Option<String>,
}

impl ManifestView {
    /// Build the view from an already parsed manifest. Fields of the wrong
    /// type are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let action_of = |key: &str| {
            value.get(key).filter(|v| v.is_object()).map(|v| Action {
                default_popup: v
                    .get("default_popup")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        };

        Self {
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
            action: action_of("action"),
            browser_action: action_of("browser_action"),
            has_icons: value.get("icons").is_some(),
        }
    }

    /// Popup page declared by `action`, or by `browser_action` when there is
    /// no `action` block at all
    pub fn default_popup(&self) -> Option<&str> {
        self.action
            .as_ref()
            .or(self.browser_action.as_ref())
            .and_then(|a| a.default_popup.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_popup_from_action() {
        let view = ManifestView::from_value(&json!({
            "name": "Test",
            "action": { "default_popup": "popup.html" }
        }));
        assert_eq!(view.name.as_deref(), Some("Test"));
        assert_eq!(view.default_popup(), Some("popup.html"));
        assert!(!view.has_icons);
    }

    #[test]
    fn test_popup_from_browser_action() {
        let view = ManifestView::from_value(&json!({
            "browser_action": { "default_popup": "ui/popup.html" },
            "icons": {}
        }));
        assert_eq!(view.default_popup(), Some("ui/popup.html"));
        assert!(view.has_icons);
    }

    #[test]
    fn test_wrong_types_are_absent() {
        let view = ManifestView::from_value(&json!({
            "name": 42,
            "action": "popup.html"
        }));
        assert_eq!(view.name, None);
        assert_eq!(view.default_popup(), None);
    }
}
