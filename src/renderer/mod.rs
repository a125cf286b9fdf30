//! Template rendering for the site builder
//!
//! This module wires MiniJinja up the way the builder expects it: strict
//! undefined variables, no autoescaping, sources re-read on every render,
//! and the builder's date, site, i18n and debug extensions.
//!
//! The module is structured as:
//! - `interface`: the `TemplateRenderer` contract used by the builder
//! - `minijinja`: MiniJinja-based implementation of the renderer
//! - `options`: debug flag and optional capabilities
//! - `extensions`: filters and functions registered on the environment
//! - `profiler`: render timings collected in debug mode

pub mod extensions;
pub mod interface;
pub mod minijinja;
pub mod options;
pub mod profiler;

pub use interface::TemplateRenderer;
pub use self::minijinja::MiniJinjaRenderer;
pub use options::{Capabilities, RendererOptions};
pub use profiler::{Profile, ProfileEntry, ProfileKind};

use crate::config::BuilderConfig;
use crate::error::Result;
use std::path::Path;

/// Convenience function to create the default template renderer
pub fn new_renderer<P: AsRef<Path>>(
    config: &BuilderConfig,
    templates_path: P,
) -> Result<impl TemplateRenderer> {
    MiniJinjaRenderer::new(config, templates_path)
}
