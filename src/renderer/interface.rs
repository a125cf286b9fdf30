use crate::error::Result;

/// Contract between the site builder and a template engine.
pub trait TemplateRenderer {
    /// Registers a value visible to every subsequent render.
    ///
    /// Registering the same name again replaces the previous value.
    ///
    /// # Arguments
    /// * `name` - Variable name templates refer to
    /// * `value` - Any JSON value
    fn add_global(&mut self, name: &str, value: serde_json::Value);

    /// Renders a template from the template directory.
    ///
    /// # Arguments
    /// * `template` - Template name relative to the template directory
    /// * `variables` - Mapping of variable name to value; entries shadow globals
    ///
    /// # Returns
    /// * `Result<String>` - Rendered text, or the engine error classified by kind
    fn render(&self, template: &str, variables: &serde_json::Value) -> Result<String>;
}
