use minijinja::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// Missing or invalid builder configuration.
    #[error("Invalid configuration: {0}.")]
    ConfigurationError(String),

    #[error("No configuration file found in '{site_dir}'. Tried: {config_files}.")]
    ConfigNotFound { site_dir: String, config_files: String },

    #[error("Failed to parse JSON configuration. Original error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML configuration. Original error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    /// An optional extension could not be set up. The renderer logs this
    /// and continues without the extension.
    #[error("Failed to load extension '{extension}': {reason}.")]
    ExtensionLoadError { extension: String, reason: String },

    #[error("Template not found. Original error: {0}")]
    TemplateNotFoundError(minijinja::Error),

    #[error("Template syntax error. Original error: {0}")]
    TemplateSyntaxError(minijinja::Error),

    #[error("Undefined variable. Original error: {0}")]
    UndefinedVariableError(minijinja::Error),

    #[error("Failed to render. Original error: {0}")]
    RenderRuntimeError(minijinja::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            ErrorKind::TemplateNotFound => Error::TemplateNotFoundError(err),
            ErrorKind::SyntaxError => Error::TemplateSyntaxError(err),
            ErrorKind::UndefinedError => Error::UndefinedVariableError(err),
            _ => Error::RenderRuntimeError(err),
        }
    }
}

impl Error {
    fn engine_error(&self) -> Option<&minijinja::Error> {
        match self {
            Error::TemplateNotFoundError(e)
            | Error::TemplateSyntaxError(e)
            | Error::UndefinedVariableError(e)
            | Error::RenderRuntimeError(e) => Some(e),
            _ => None,
        }
    }

    /// Name of the template the engine was processing when the error occurred.
    pub fn template_name(&self) -> Option<&str> {
        self.engine_error().and_then(|e| e.name())
    }

    /// Line in [`Error::template_name`] the error points at, if known.
    pub fn line(&self) -> Option<usize> {
        self.engine_error().and_then(|e| e.line())
    }
}

/// Convenience type alias for Results with the crate error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;
