/// Defines custom error types.
pub mod error;

/// Constants shared across modules.
pub mod constants;

/// Builder configuration consumed by the renderer.
pub mod config;

/// Extension traits for std types.
pub mod ext;

/// Template rendering functionality.
pub mod renderer;

pub use config::BuilderConfig;
pub use error::{Error, Result};
pub use renderer::{new_renderer, MiniJinjaRenderer, RendererOptions, TemplateRenderer};
