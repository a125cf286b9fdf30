use super::Extension;
use minijinja::value::Value;
use minijinja::{context, Environment, State};

/// Renders template source held in a variable, e.g. front matter fields that
/// themselves contain template expressions.
pub struct StringLoaderExtension;

impl Extension for StringLoaderExtension {
    fn name(&self) -> &'static str {
        "string_loader"
    }

    fn register(&self, env: &mut Environment<'static>) {
        env.add_function("template_from_string", template_from_string);
    }
}

/// Renders `source` with `vars` and the environment globals. The caller's
/// local variables are not visible unless passed in `vars`.
fn template_from_string(
    state: &State,
    source: String,
    vars: Option<Value>,
) -> Result<String, minijinja::Error> {
    let vars = vars.unwrap_or_else(|| context! {});
    state.env().render_str(&source, vars)
}
