use super::Extension;
use minijinja::value::{Rest, Value};
use minijinja::{Environment, State};

/// `dump()` for inspecting values while developing templates.
pub struct DebugExtension;

impl Extension for DebugExtension {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn register(&self, env: &mut Environment<'static>) {
        env.add_function("dump", dump);
    }
}

/// Pretty-prints the arguments, or the whole render state when called without any.
fn dump(state: &State, values: Rest<Value>) -> String {
    match values.len() {
        0 => format!("{state:#?}"),
        1 => format!("{:#?}", values[0]),
        _ => format!("{:#?}", &values[..]),
    }
}
