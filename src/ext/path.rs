use std::path::Path;

use crate::error::{Error, Result};

/// Extension trait for Path to provide checked conversions used by the renderer
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use siteforge_renderer::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("layouts");
    /// assert_eq!(path.to_str_checked().unwrap(), "layouts");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Returns the template name of `self` relative to the template root `root`,
    /// using `/` as separator on every platform.
    ///
    /// # Examples
    /// ```
    /// use siteforge_renderer::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let name = Path::new("layouts/_default/page.html").template_name_in(Path::new("layouts"));
    /// assert_eq!(name.unwrap(), "_default/page.html");
    /// ```
    fn template_name_in(&self, root: &Path) -> Result<String>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn template_name_in(&self, root: &Path) -> Result<String> {
        let relative = self.strip_prefix(root).map_err(|_| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' is outside of the template directory '{}'",
                self.display(),
                root.display()
            ))
        })?;
        let parts = relative
            .components()
            .map(|c| {
                c.as_os_str().to_str().ok_or_else(|| {
                    Error::Other(anyhow::anyhow!(
                        "Path '{}' contains invalid Unicode characters",
                        self.display()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join("/"))
    }
}
