//! Engine extensions registered by the renderer
//!
//! - `core`: `date` filter and function bound to the configured format and timezone
//! - `site`: builder-context functions and filters (urls, excerpts, sorting, hashing)
//! - `string_loader`: `template_from_string`
//! - `intl`: locale-style date and number formatting
//! - `i18n`: message catalog translations
//! - `debug`: `dump()`

pub mod core;
pub mod debug;
pub mod i18n;
pub mod intl;
pub mod site;
pub mod string_loader;

use minijinja::Environment;

pub use self::core::{CoreExtension, DateSettings};
pub use debug::DebugExtension;
pub use i18n::{Catalog, I18nExtension};
pub use intl::IntlExtension;
pub use site::SiteExtension;
pub use string_loader::StringLoaderExtension;

/// A bundle of filters, functions and globals added to an environment.
pub trait Extension {
    /// Name used in log messages and load errors.
    fn name(&self) -> &'static str;

    /// Adds the extension's filters and functions to `env`.
    fn register(&self, env: &mut Environment<'static>);
}
