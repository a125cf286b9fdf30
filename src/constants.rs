//! Constants used throughout the renderer

/// Configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] = &["siteforge.yml", "siteforge.yaml", "siteforge.json"];

/// Environment variable that switches the renderer into debug mode
pub const DEBUG_ENV_VAR: &str = "SITEFORGE_DEBUG";

/// Value of [`DEBUG_ENV_VAR`] that enables debug mode
pub const DEBUG_ENABLED_VALUE: &str = "true";

/// Configuration keys read by the renderer
pub mod keys {
    pub const DATE_FORMAT: &str = "date.format";
    pub const DATE_TIMEZONE: &str = "date.timezone";
    pub const BASEURL: &str = "baseurl";
    pub const LANGUAGE: &str = "language";
    pub const TRANSLATIONS_DIR: &str = "translations.dir";
}

/// Default configuration values
pub mod defaults {
    pub const DATE_FORMAT: &str = "%-d %B %Y";
    pub const DATE_TIMEZONE: &str = "Europe/Paris";
    pub const BASEURL: &str = "/";
    pub const LANGUAGE: &str = "en";
    pub const TRANSLATIONS_DIR: &str = "translations";
}

/// Site extension defaults
pub mod site {
    pub const EXCERPT_LENGTH: usize = 450;
    pub const EXCERPT_SUFFIX: &str = "…";
    pub const WORDS_PER_MINUTE: usize = 200;
}
