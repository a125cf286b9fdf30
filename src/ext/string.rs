/// Extension trait for template identifiers passed in by the builder
pub trait StrExt {
    /// Normalizes a template identifier: `\` becomes `/` and a leading `./` is dropped.
    ///
    /// # Examples
    /// ```
    /// use siteforge_renderer::ext::StrExt;
    ///
    /// assert_eq!(r".\_default\list.html".to_template_name(), "_default/list.html");
    /// ```
    fn to_template_name(&self) -> String;
}

impl StrExt for str {
    fn to_template_name(&self) -> String {
        let normalized = self.replace('\\', "/");
        match normalized.strip_prefix("./") {
            Some(rest) => rest.to_string(),
            None => normalized,
        }
    }
}
