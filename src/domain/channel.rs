use serde::{Deserialize, Serialize};

use crate::domain::types::{ChannelCode, ChannelId, ChannelName, LocaleCode};

/// A sales channel notifications can target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: ChannelId,
    pub code: ChannelCode,
    /// Name in the requested display locale, if translated.
    pub name: Option<ChannelName>,
}

impl Channel {
    /// Name to show in listings, falling back to the channel code.
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .map(ChannelName::as_str)
            .unwrap_or_else(|| self.code.as_str())
    }
}

/// A language/region code used to select translated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Locale {
    pub code: LocaleCode,
    pub name: String,
}
