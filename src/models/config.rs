use std::collections::HashMap;

use serde::Deserialize;

/// Configuration options of the notification admin service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path or URL of the SQLite database.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key material for signing flash message cookies, at least 64 bytes.
    pub secret: String,
    /// Glob of Tera templates, e.g. `templates/**/*`.
    pub templates_dir: String,
    /// Directory holding uploaded notification images.
    pub storage_dir: String,
    /// Public URL prefix under which `storage_dir` is served.
    pub storage_url: String,
    /// Locale used for labels and channel names, and as the default locale filter.
    pub admin_locale: String,
    /// Channel preselected when the request names none.
    pub default_channel: String,
    /// Overrides for the built-in label catalog.
    #[serde(default)]
    pub translations: HashMap<String, String>,
}
