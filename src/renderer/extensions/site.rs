use super::Extension;
use crate::config::BuilderConfig;
use crate::constants::site::{EXCERPT_LENGTH, EXCERPT_SUFFIX, WORDS_PER_MINUTE};
use cruet::case::kebab::to_kebab_case;
use log::warn;
use minijinja::value::Value;
use minijinja::{Environment, ErrorKind};
use regex::Regex;
use sha2::{Digest, Sha256, Sha512};
use std::cmp::Ordering;
use std::sync::LazyLock;
use url::Url;

/// Builder-context functions and filters.
pub struct SiteExtension {
    baseurl: String,
}

impl SiteExtension {
    pub fn new(config: &BuilderConfig) -> Self {
        Self { baseurl: config.baseurl().to_string() }
    }
}

impl Extension for SiteExtension {
    fn name(&self) -> &'static str {
        "site"
    }

    fn register(&self, env: &mut Environment<'static>) {
        let baseurl = self.baseurl.clone();
        env.add_function("url", move |path: String, canonical: Option<bool>| {
            build_url(&baseurl, &path, canonical.unwrap_or(false))
        });
        env.add_function("getenv", getenv);

        env.add_filter("slugify", slugify);
        env.add_filter("excerpt", excerpt);
        env.add_filter("excerpt_html", excerpt_html);
        env.add_filter("hash", hash);
        env.add_filter("readtime", readtime);
        env.add_filter("sort_by_title", sort_by_title);
        env.add_filter("sort_by_weight", sort_by_weight);
        env.add_filter("sort_by_date", sort_by_date);
        env.add_filter("filter_by", filter_by);
        env.add_filter("preg_match", preg_match);
        env.add_filter("preg_split", preg_split);
        env.add_filter("preg_replace", preg_replace);
    }
}

/// Joins `path` onto the site base URL.
///
/// Absolute URLs are returned as-is. Canonical URLs need an absolute `baseurl`;
/// otherwise the result is a root-relative path.
fn build_url(baseurl: &str, path: &str, canonical: bool) -> Result<String, minijinja::Error> {
    if Url::parse(path).is_ok() {
        return Ok(path.to_string());
    }
    let relative = path.trim_start_matches('/');
    if canonical {
        let base = if baseurl.ends_with('/') {
            baseurl.to_string()
        } else {
            format!("{baseurl}/")
        };
        let joined = Url::parse(&base).and_then(|base| base.join(relative)).map_err(|e| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("cannot build canonical url from baseurl '{baseurl}': {e}"),
            )
        })?;
        return Ok(joined.to_string());
    }
    Ok(format!("/{relative}"))
}

fn getenv(name: String) -> Option<String> {
    std::env::var(name).ok()
}

fn slugify(value: String) -> String {
    to_kebab_case(&value)
}

/// Truncates to at most `length` characters on a word boundary.
fn excerpt(value: String, length: Option<usize>, suffix: Option<String>) -> String {
    let length = length.unwrap_or(EXCERPT_LENGTH);
    if value.chars().count() <= length {
        return value;
    }
    let cut: String = value.chars().take(length).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) => cut[..idx].trim_end().to_string(),
        None => cut,
    };
    format!("{cut}{}", suffix.as_deref().unwrap_or(EXCERPT_SUFFIX))
}

static EXCERPT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!--\s*(excerpt|break)\s*-->").expect("excerpt marker pattern is valid")
});

/// Content before an `<!-- excerpt -->` or `<!-- break -->` marker, or everything.
fn excerpt_html(value: String) -> String {
    match EXCERPT_MARKER.find(&value).map(|m| m.start()) {
        Some(start) => value[..start].trim_end().to_string(),
        None => value,
    }
}

fn hash(value: String, algo: Option<String>) -> Result<String, minijinja::Error> {
    match algo.as_deref().unwrap_or("sha256") {
        "sha256" => Ok(hex::encode(Sha256::digest(value.as_bytes()))),
        "sha512" => Ok(hex::encode(Sha512::digest(value.as_bytes()))),
        other => Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("unsupported hash algorithm '{other}'"),
        )),
    }
}

/// Reading time in minutes, never less than one.
fn readtime(value: String) -> usize {
    let words = value.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

fn attr(item: &Value, key: &str) -> Value {
    item.get_attr(key).unwrap_or(Value::UNDEFINED)
}

fn sorted_by<F>(items: Value, compare: F) -> Result<Value, minijinja::Error>
where
    F: Fn(&Value, &Value) -> Ordering,
{
    let mut items: Vec<Value> = items.try_iter()?.collect();
    items.sort_by(|a, b| compare(a, b));
    Ok(Value::from(items))
}

fn sort_by_title(items: Value) -> Result<Value, minijinja::Error> {
    sorted_by(items, |a, b| {
        attr(a, "title").partial_cmp(&attr(b, "title")).unwrap_or(Ordering::Equal)
    })
}

/// Ascending weight; items without a weight go last.
fn sort_by_weight(items: Value) -> Result<Value, minijinja::Error> {
    sorted_by(items, |a, b| {
        let (wa, wb) = (attr(a, "weight"), attr(b, "weight"));
        match (wa.is_undefined() || wa.is_none(), wb.is_undefined() || wb.is_none()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => wa.partial_cmp(&wb).unwrap_or(Ordering::Equal),
        }
    })
}

/// Newest first.
fn sort_by_date(items: Value) -> Result<Value, minijinja::Error> {
    sorted_by(items, |a, b| {
        attr(b, "date").partial_cmp(&attr(a, "date")).unwrap_or(Ordering::Equal)
    })
}

fn filter_by(items: Value, key: String, expected: Value) -> Result<Value, minijinja::Error> {
    let items: Vec<Value> =
        items.try_iter()?.filter(|item| attr(item, &key) == expected).collect();
    Ok(Value::from(items))
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!("Invalid regex '{pattern}': {err}");
            None
        }
    }
}

fn preg_match(value: String, pattern: String) -> bool {
    compile(&pattern).is_some_and(|re| re.is_match(&value))
}

fn preg_split(value: String, pattern: String) -> Vec<String> {
    match compile(&pattern) {
        Some(re) => re.split(&value).map(str::to_string).collect(),
        None => vec![value],
    }
}

fn preg_replace(value: String, pattern: String, replacement: String) -> String {
    match compile(&pattern) {
        Some(re) => re.replace_all(&value, replacement.as_str()).into_owned(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::extensions::testing::{render, render_with};
    use serde_json::json;

    fn extension(baseurl: &str) -> SiteExtension {
        SiteExtension::new(&BuilderConfig::with_defaults(json!({ "baseurl": baseurl })))
    }

    #[test]
    fn test_url() {
        let ext = extension("https://example.com/blog");
        assert_eq!(render(&ext, "{{ url('/posts/a/') }}"), "/posts/a/");
        assert_eq!(
            render(&ext, "{{ url('posts/a/', true) }}"),
            "https://example.com/blog/posts/a/"
        );
        assert_eq!(
            render(&ext, "{{ url('https://other.org/x') }}"),
            "https://other.org/x"
        );
    }

    #[test]
    fn test_canonical_url_needs_absolute_baseurl() {
        let ext = extension("/");
        let env = crate::renderer::extensions::testing::env_with(&ext);
        assert!(env.render_str("{{ url('a', true) }}", json!({})).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(render(&extension("/"), "{{ 'Hello World' | slugify }}"), "hello-world");
    }

    #[test]
    fn test_excerpt() {
        let ext = extension("/");
        assert_eq!(render(&ext, "{{ 'short' | excerpt }}"), "short");
        assert_eq!(
            render(&ext, "{{ 'the quick brown fox' | excerpt(12) }}"),
            "the quick…"
        );
        assert_eq!(
            render(&ext, "{{ 'the quick brown fox' | excerpt(12, '...') }}"),
            "the quick..."
        );
    }

    #[test]
    fn test_excerpt_html() {
        let ext = extension("/");
        assert_eq!(
            render_with(
                &ext,
                "{{ body | excerpt_html }}",
                json!({ "body": "<p>intro</p>\n<!-- break -->\n<p>rest</p>" })
            ),
            "<p>intro</p>"
        );
        assert_eq!(render(&ext, "{{ '<p>all</p>' | excerpt_html }}"), "<p>all</p>");
        let upper = json!({ "body": "<p>a</p><!--EXCERPT--><p>b</p><!-- break -->" });
        assert_eq!(render_with(&ext, "{{ body | excerpt_html }}", upper), "<p>a</p>");
    }

    #[test]
    fn test_hash() {
        let ext = extension("/");
        assert_eq!(
            render(&ext, "{{ 'abc' | hash }}"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(render(&ext, "{{ 'abc' | hash('sha512') }}").len(), 128);
    }

    #[test]
    fn test_readtime() {
        let ext = extension("/");
        assert_eq!(render(&ext, "{{ '' | readtime }}"), "1");
        let long = "word ".repeat(401);
        assert_eq!(render_with(&ext, "{{ t | readtime }}", json!({ "t": long })), "3");
    }

    #[test]
    fn test_sorting_and_filtering() {
        let ext = extension("/");
        let pages = json!({ "pages": [
            { "title": "b", "weight": 2, "date": "2024-01-02", "section": "blog" },
            { "title": "c", "date": "2024-01-03", "section": "docs" },
            { "title": "a", "weight": 1, "date": "2024-01-01", "section": "blog" },
        ]});
        let titles = "{% for p in pages | FILTER %}{{ p.title }}{% endfor %}";
        let run = |filter: &str| render_with(&ext, &titles.replace("FILTER", filter), pages.clone());

        assert_eq!(run("sort_by_title"), "abc");
        assert_eq!(run("sort_by_weight"), "abc");
        assert_eq!(run("sort_by_date"), "cba");
        assert_eq!(run("filter_by('section', 'blog')"), "ba");
    }

    #[test]
    fn test_regex_filters() {
        let ext = extension("/");
        let matches = "{% if value | preg_match(pattern) %}y{% else %}n{% endif %}";
        let run = |value: &str, pattern: &str| {
            render_with(&ext, matches, json!({ "value": value, "pattern": pattern }))
        };
        assert_eq!(run("hello world", "^hello"), "y");
        assert_eq!(run("goodbye world", "^hello"), "n");
        assert_eq!(run("hello", "["), "n");
        assert_eq!(render(&ext, "{{ 'a1b22c' | preg_split('[0-9]+') | join(',') }}"), "a,b,c");
        assert_eq!(render(&ext, "{{ 'a1b22c' | preg_replace('[0-9]+', '-') }}"), "a-b-c");
    }
}
