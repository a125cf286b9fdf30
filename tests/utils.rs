use serde_json::json;
use siteforge_renderer::renderer::options::{Capabilities, RendererOptions};
use siteforge_renderer::{BuilderConfig, MiniJinjaRenderer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Creates a site directory with a `layouts/` template root holding `templates`.
///
/// # Arguments
/// * `templates` - `(name, source)` pairs written below `layouts/`
pub fn site_with_templates(templates: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in templates {
        write_template(dir.path(), name, source);
    }
    dir
}

/// Writes (or overwrites) `layouts/<name>` below `site`.
pub fn write_template(site: &Path, name: &str, source: &str) {
    let path = site.join("layouts").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

pub fn config(site: &Path, overrides: serde_json::Value) -> BuilderConfig {
    let mut values = json!({ "date": { "timezone": "UTC", "format": "%Y-%m-%d" } });
    if let (Some(values), Some(overrides)) = (values.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            values.insert(key.clone(), value.clone());
        }
    }
    BuilderConfig::with_defaults(values).with_root(site)
}

pub fn options(debug: bool, capabilities: Capabilities) -> RendererOptions {
    RendererOptions { debug, capabilities }
}

/// Renderer over `site/layouts` with debug off and all capabilities detected.
pub fn renderer(site: &Path, overrides: serde_json::Value) -> MiniJinjaRenderer {
    let config = config(site, overrides);
    let options = options(false, Capabilities::detect(&config));
    MiniJinjaRenderer::with_options(&config, site.join("layouts"), options).unwrap()
}
