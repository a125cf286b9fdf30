//! Configuration handling for the renderer
//!
//! - `loader`: builder configuration loading, defaults and dotted-key lookup

pub mod loader;


pub use loader::BuilderConfig;
