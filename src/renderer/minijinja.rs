use super::extensions::{
    CoreExtension, DateSettings, DebugExtension, Extension, I18nExtension, IntlExtension,
    SiteExtension, StringLoaderExtension,
};
use super::options::RendererOptions;
use super::profiler::Profile;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::ext::{PathExt, StrExt};
use crate::renderer::interface::TemplateRenderer;
use log::{debug, warn};
use minijinja::{path_loader, AutoEscape, Environment, UndefinedBehavior};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// MiniJinja-based renderer bound to a template directory.
pub struct MiniJinjaRenderer {
    /// Configured environment. Templates are never loaded into it directly;
    /// each render works on a clone, so sources are re-read on every call.
    env: Environment<'static>,
    templates_dir: PathBuf,
    profile: Option<Arc<Profile>>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with options taken from the process environment.
    pub fn new<P: AsRef<Path>>(config: &BuilderConfig, templates_path: P) -> Result<Self> {
        Self::with_options(config, templates_path, RendererOptions::from_env(config))
    }

    /// Creates a renderer with explicit debug and capability options.
    pub fn with_options<P: AsRef<Path>>(
        config: &BuilderConfig,
        templates_path: P,
        options: RendererOptions,
    ) -> Result<Self> {
        let templates_dir = templates_path.as_ref().to_path_buf();
        let date_settings = DateSettings::from_config(config)?;
        let profile = options.debug.then(|| Arc::new(Profile::new()));

        let mut env = Environment::new();
        env.set_debug(options.debug);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_loader(profiled_loader(templates_dir.clone(), profile.clone()));

        let timezone = date_settings.timezone;
        let mut extensions: Vec<Box<dyn Extension>> = vec![
            Box::new(CoreExtension::new(date_settings)),
            Box::new(SiteExtension::new(config)),
            Box::new(StringLoaderExtension),
        ];
        if options.capabilities.intl {
            extensions.push(Box::new(IntlExtension::new(timezone)));
        }
        if options.capabilities.i18n {
            match I18nExtension::load(&config.translations_dir(), config.language()) {
                Ok(i18n) => extensions.push(Box::new(i18n)),
                Err(err) => warn!("Skipping i18n extension: {err}"),
            }
        }
        if options.debug {
            extensions.push(Box::new(DebugExtension));
        }

        for extension in &extensions {
            debug!("Registering template extension '{}'", extension.name());
            extension.register(&mut env);
        }

        Ok(Self { env, templates_dir, profile })
    }

    /// Template root fixed at construction.
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Render timings; only present in debug mode.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_deref()
    }

    /// Renders the template stored at `path`, which must lie inside the template directory.
    pub fn render_file<P: AsRef<Path>>(
        &self,
        path: P,
        variables: &serde_json::Value,
    ) -> Result<String> {
        let name = path.as_ref().template_name_in(&self.templates_dir)?;
        self.render(&name, variables)
    }
}

/// Filesystem loader that reports every read to `profile`.
fn profiled_loader(
    templates_dir: PathBuf,
    profile: Option<Arc<Profile>>,
) -> impl Fn(&str) -> std::result::Result<Option<String>, minijinja::Error> + Send + Sync + 'static
{
    let load = path_loader(templates_dir);
    move |name: &str| -> std::result::Result<Option<String>, minijinja::Error> {
        let started = Instant::now();
        let source = load(name)?;
        if let Some(profile) = &profile {
            profile.record_load(name, started.elapsed());
        }
        Ok(source)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn add_global(&mut self, name: &str, value: serde_json::Value) {
        self.env.add_global(name.to_string(), minijinja::Value::from_serialize(&value));
    }

    fn render(&self, template: &str, variables: &serde_json::Value) -> Result<String> {
        let name = template.to_template_name();
        let env = self.env.clone();
        let started = Instant::now();

        let result = env.get_template(&name).and_then(|tmpl| tmpl.render(variables));

        if let Some(profile) = &self.profile {
            profile.record_template(&name, started.elapsed());
        }
        result.map_err(|err| {
            debug!("Rendering '{name}' failed: {err:#}");
            err.into()
        })
    }
}
