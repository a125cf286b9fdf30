use crate::config::BuilderConfig;
use crate::constants::{DEBUG_ENABLED_VALUE, DEBUG_ENV_VAR};

/// Optional engine capabilities, resolved once before the renderer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Locale-aware date and number filters.
    pub intl: bool,
    /// Message catalog translation filters and functions.
    pub i18n: bool,
}

impl Capabilities {
    /// Both capabilities off.
    pub const NONE: Capabilities = Capabilities { intl: false, i18n: false };

    /// Resolves capabilities for a site: intl is always available, i18n only
    /// when the configured translations directory exists.
    pub fn detect(config: &BuilderConfig) -> Self {
        Self { intl: true, i18n: config.translations_dir().is_dir() }
    }
}

/// Renderer switches that do not come from the builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    /// Enables `dump()` and the profiler.
    pub debug: bool,
    pub capabilities: Capabilities,
}

impl RendererOptions {
    /// Reads the debug flag from the process environment and detects capabilities.
    pub fn from_env(config: &BuilderConfig) -> Self {
        Self { debug: debug_from_env(), capabilities: Capabilities::detect(config) }
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self { debug: false, capabilities: Capabilities::NONE }
    }
}

fn debug_from_env() -> bool {
    std::env::var(DEBUG_ENV_VAR).is_ok_and(|value| value == DEBUG_ENABLED_VALUE)
}
