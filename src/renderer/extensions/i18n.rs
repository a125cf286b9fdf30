use super::Extension;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use minijinja::value::Value;
use minijinja::value::ValueKind;
use minijinja::{Environment, ErrorKind};
use std::path::Path;
use std::sync::Arc;

/// Translated messages for one language, keyed by message id.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    messages: IndexMap<String, String>,
}

impl Catalog {
    /// Builds a catalog from a YAML document; nested mappings become dotted ids.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(source)?;
        let mut messages = IndexMap::new();
        flatten("", &document, &mut messages);
        Ok(Self { messages })
    }

    /// Loads `<dir>/messages.<language>.yaml`.
    pub fn load(dir: &Path, language: &str) -> Result<Self> {
        let path = dir.join(format!("messages.{language}.yaml"));
        let load_error = |reason: String| Error::ExtensionLoadError {
            extension: "i18n".to_string(),
            reason,
        };
        let source = std::fs::read_to_string(&path)
            .map_err(|e| load_error(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_yaml(&source)
            .map_err(|e| load_error(format!("cannot parse '{}': {e}", path.display())))
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message for `id`, or `id` itself when untranslated.
    fn translate<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }

    /// Plural-aware lookup; catalog entries hold `singular|plural`.
    fn translate_plural(&self, singular: &str, plural: &str, count: i64) -> String {
        let (one, many) = match self.get(singular).and_then(|m| m.split_once('|')) {
            Some((one, many)) => (one, many),
            None => (self.translate(singular), plural),
        };
        let chosen = if count == 1 { one } else { many };
        chosen.replace("%count%", &count.to_string())
    }
}

fn flatten(prefix: &str, node: &serde_yaml::Value, out: &mut IndexMap<String, String>) {
    match node {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => match serde_yaml::to_string(other) {
                        Ok(s) => s.trim().to_string(),
                        Err(_) => continue,
                    },
                };
                let id = if prefix.is_empty() { key } else { format!("{prefix}.{key}") };
                flatten(&id, value, out);
            }
        }
        serde_yaml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_yaml::Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        serde_yaml::Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        _ => {}
    }
}

/// Replaces `%name%` placeholders with entries of a mapping value.
fn interpolate(message: &str, vars: Option<&Value>) -> Result<String, minijinja::Error> {
    let mut out = message.to_string();
    if let Some(vars) = vars {
        if vars.kind() != ValueKind::Map {
            return Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("trans expects a mapping of placeholders, got {}", vars.kind()),
            ));
        }
        for key in vars.try_iter()? {
            let value = vars.get_item(&key)?;
            out = out.replace(&format!("%{key}%"), &value.to_string());
        }
    }
    Ok(out)
}

/// `trans`, `gettext` and `ngettext` backed by a [`Catalog`].
pub struct I18nExtension {
    catalog: Arc<Catalog>,
}

impl I18nExtension {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog: Arc::new(catalog) }
    }

    pub fn load(dir: &Path, language: &str) -> Result<Self> {
        Ok(Self::new(Catalog::load(dir, language)?))
    }
}

impl Extension for I18nExtension {
    fn name(&self) -> &'static str {
        "i18n"
    }

    fn register(&self, env: &mut Environment<'static>) {
        let catalog = self.catalog.clone();
        env.add_filter("trans", move |id: String, vars: Option<Value>| {
            interpolate(catalog.translate(&id), vars.as_ref())
        });

        let catalog = self.catalog.clone();
        env.add_function("gettext", move |id: String| catalog.translate(&id).to_string());

        let catalog = self.catalog.clone();
        env.add_function("ngettext", move |singular: String, plural: String, count: i64| {
            catalog.translate_plural(&singular, &plural, count)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::extensions::testing::render;

    const MESSAGES: &str = r#"
hello: Bonjour
greeting: "Bonjour %name% !"
apple: "une pomme|%count% pommes"
nav:
  home: Accueil
"#;

    fn extension() -> I18nExtension {
        I18nExtension::new(Catalog::from_yaml(MESSAGES).unwrap())
    }

    #[test]
    fn test_catalog_flattens_nested_keys() {
        let catalog = Catalog::from_yaml(MESSAGES).unwrap();
        assert_eq!(catalog.get("nav.home"), Some("Accueil"));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_trans() {
        let ext = extension();
        assert_eq!(render(&ext, "{{ 'hello' | trans }}"), "Bonjour");
        assert_eq!(render(&ext, "{{ 'greeting' | trans({'name': 'Ana'}) }}"), "Bonjour Ana !");
        assert_eq!(render(&ext, "{{ 'untranslated' | trans }}"), "untranslated");
    }

    #[test]
    fn test_trans_rejects_non_mapping_vars() {
        let env = crate::renderer::extensions::testing::env_with(&extension());
        for vars in ["['Ana']", "'Ana'"] {
            let err = env
                .render_str(&format!("{{{{ 'greeting' | trans({vars}) }}}}"), serde_json::json!({}))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        }
    }

    #[test]
    fn test_gettext_and_ngettext() {
        let ext = extension();
        assert_eq!(render(&ext, "{{ gettext('nav.home') }}"), "Accueil");
        assert_eq!(render(&ext, "{{ ngettext('apple', 'apples', 1) }}"), "une pomme");
        assert_eq!(render(&ext, "{{ ngettext('apple', 'apples', 3) }}"), "3 pommes");
        assert_eq!(render(&ext, "{{ ngettext('pear', '%count% pears', 2) }}"), "2 pears");
    }

    #[test]
    fn test_load_missing_file_is_extension_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(dir.path(), "fr").unwrap_err();
        assert!(matches!(err, Error::ExtensionLoadError { .. }));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages.fr.yaml"), MESSAGES).unwrap();
        let catalog = Catalog::load(dir.path(), "fr").unwrap();
        assert_eq!(catalog.get("hello"), Some("Bonjour"));
    }
}
