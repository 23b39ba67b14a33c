//! Label catalog for grid headers, badges, actions and flash messages.

use std::collections::HashMap;

const DEFAULT_CATALOG: &[(&str, &str)] = &[
    ("notification.id", "Id"),
    ("notification.image", "Image"),
    ("notification.title", "Title"),
    ("notification.content", "Content"),
    ("notification.type", "Notification Type"),
    ("notification.channels", "Store View"),
    ("notification.status", "Status"),
    ("notification.status.enabled", "Enabled"),
    ("notification.status.disabled", "Disabled"),
    ("notification.created", "Created"),
    ("notification.modified", "Modified"),
    ("notification.deleted", "Notification deleted."),
    ("notification.delete-failed", "Failed to delete the notification."),
    ("notification.mass-deleted", "Selected notifications deleted."),
    ("notification.mass-updated", "Selected notifications updated."),
    ("notification.mass-failed", "Failed to update the selected notifications."),
    ("notification.not-found", "Notification not found."),
    ("datagrid.edit", "Edit"),
    ("datagrid.delete", "Delete"),
    ("datagrid.update-status", "Update Status"),
    ("datagrid.all", "All"),
    ("datagrid.channel", "Channel"),
    ("datagrid.locale", "Locale"),
];

/// Resolves label keys to display strings.
///
/// Configured overrides win over the built-in English catalog; unknown keys
/// resolve to themselves.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: HashMap<String, String>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl Translator {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let mut catalog: HashMap<String, String> = DEFAULT_CATALOG
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        catalog.extend(overrides);
        Self { catalog }
    }

    pub fn trans(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults() {
        let translator = Translator::new(HashMap::from([(
            "notification.status.enabled".to_string(),
            "Включено".to_string(),
        )]));
        assert_eq!(translator.trans("notification.status.enabled"), "Включено");
        assert_eq!(translator.trans("notification.status.disabled"), "Disabled");
    }

    #[test]
    fn unknown_keys_echo_back() {
        assert_eq!(Translator::default().trans("missing.key"), "missing.key");
    }
}
