//! Reverse URL generation.
//!
//! Every registered path is compiled once into a [`UrlPattern`]; filling it
//! back in with parameter values is a single pass over its segments.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Empty parameter list for routes without path parameters.
pub const NO_PARAMS: [(&str, &str); 0] = [];

/// Raised when supplied parameters don't fit a route's path.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("no route `{name}` matches params {params:?}")]
pub struct NoMatchFound {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    /// `{name}`: one path segment, no `/`.
    Param(String),
    /// `{*name}`: the rest of the path.
    CatchAll(String),
}

/// A route path split into literals and parameter slots.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlPattern {
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Compiles a matchit-style path (`/users/{id}/files/{*rest}`).
    ///
    /// Paths reach this point only after the router accepted them, so the
    /// parser is lenient: an unterminated `{` is kept as literal text.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = path.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        literal.push('{');
                        literal.push_str(&name);
                        continue;
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    match name.strip_prefix('*') {
                        Some(rest) => segments.push(Segment::CatchAll(rest.to_owned())),
                        None => segments.push(Segment::Param(name)),
                    }
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Parameter names in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(n) | Segment::CatchAll(n) => Some(n.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes `params` into the pattern.
    ///
    /// The supplied keys must be exactly the pattern's parameters, each given
    /// once. `name` is only used to label the error.
    pub fn expand<I, K, V>(&self, name: &str, params: I) -> Result<String, NoMatchFound>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let params = Params::collect(params);
        self.fill(&params).ok_or_else(|| params.no_match(name))
    }

    fn fill(&self, params: &Params) -> Option<String> {
        if params.duplicated {
            return None;
        }
        let expected: BTreeSet<&str> = self.param_names().collect();
        let supplied: BTreeSet<&str> = params.values.keys().map(String::as_str).collect();
        if expected != supplied {
            return None;
        }

        let mut url = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Param(key) => {
                    let value = &params.values[key];
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    url.push_str(value);
                }
                Segment::CatchAll(key) => {
                    let value = &params.values[key];
                    if value.is_empty() {
                        return None;
                    }
                    url.push_str(value);
                }
            }
        }
        Some(url)
    }
}

/// Supplied parameters, stringified once so several patterns can be tried.
struct Params {
    values: HashMap<String, String>,
    keys: Vec<String>,
    duplicated: bool,
}

impl Params {
    fn collect<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let mut values = HashMap::new();
        let mut keys = Vec::new();
        let mut duplicated = false;
        for (k, v) in params {
            let key = k.as_ref().to_owned();
            duplicated |= values.insert(key.clone(), v.to_string()).is_some();
            keys.push(key);
        }
        keys.sort();
        Self { values, keys, duplicated }
    }

    fn no_match(&self, name: &str) -> NoMatchFound {
        NoMatchFound { name: name.to_owned(), params: self.keys.clone() }
    }
}

/// Route name → patterns, in registration order.
///
/// Several routes may share a name; a lookup returns the first one whose
/// parameters fit.
#[derive(Clone, Debug, Default)]
pub struct UrlTable {
    patterns: HashMap<String, Vec<Arc<UrlPattern>>>,
}

impl UrlTable {
    pub(crate) fn insert(&mut self, name: &str, pattern: Arc<UrlPattern>) {
        self.patterns.entry(name.to_owned()).or_default().push(pattern);
    }

    /// Every pattern registered as `name`, oldest first.
    pub fn get(&self, name: &str) -> impl Iterator<Item = &UrlPattern> {
        self.patterns.get(name).into_iter().flatten().map(Arc::as_ref)
    }

    /// Builds the URL of the first route registered as `name` that `params` fit.
    pub fn url_path_for<I, K, V>(&self, name: &str, params: I) -> Result<String, NoMatchFound>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let params = Params::collect(params);
        self.get(name)
            .find_map(|pattern| pattern.fill(&params))
            .ok_or_else(|| params.no_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_path_needs_no_params() {
        let p = UrlPattern::parse("/about-us");
        assert_eq!(p.expand("about_us", NO_PARAMS).unwrap(), "/about-us");
        assert!(p.expand("about_us", [("id", 1)]).is_err());
    }

    #[test]
    fn fills_single_segment_params() {
        let p = UrlPattern::parse("/users/{user_id}/posts/{post_id}");
        assert_eq!(
            p.param_names().collect::<Vec<_>>(),
            ["user_id", "post_id"]
        );
        let url = p.expand("post", [("post_id", 7), ("user_id", 123)]).unwrap();
        assert_eq!(url, "/users/123/posts/7");
    }

    #[test]
    fn missing_or_extra_params_do_not_match() {
        let p = UrlPattern::parse("/items/{id}");
        let err = p.expand("item", NO_PARAMS).unwrap_err();
        assert_eq!(err, NoMatchFound { name: "item".into(), params: vec![] });
        assert!(p.expand("item", [("id", "1"), ("x", "2")]).is_err());
        assert!(p.expand("item", [("slug", "1")]).is_err());
    }

    #[test]
    fn single_segment_values_reject_slashes_and_empties() {
        let p = UrlPattern::parse("/items/{id}");
        assert!(p.expand("item", [("id", "a/b")]).is_err());
        assert!(p.expand("item", [("id", "")]).is_err());
    }

    #[test]
    fn catch_all_takes_slashes() {
        let p = UrlPattern::parse("/static/{*path}");
        assert_eq!(
            p.expand("static", [("path", "css/site.css")]).unwrap(),
            "/static/css/site.css"
        );
        assert!(p.expand("static", [("path", "")]).is_err());
    }

    #[test]
    fn escaped_braces_are_literal() {
        let p = UrlPattern::parse("/raw/{{x}}/{id}");
        assert_eq!(p.param_names().collect::<Vec<_>>(), ["id"]);
        assert_eq!(p.expand("raw", [("id", 3)]).unwrap(), "/raw/{x}/3");
    }

    #[test]
    fn repeated_keys_do_not_match() {
        let p = UrlPattern::parse("/items/{id}");
        let err = p.expand("item", [("id", "1"), ("id", "2")]).unwrap_err();
        assert_eq!(err.params, ["id", "id"]);
    }

    #[test]
    fn table_tries_every_pattern_under_a_name() {
        let mut table = UrlTable::default();
        table.insert("item", Arc::new(UrlPattern::parse("/items")));
        table.insert("item", Arc::new(UrlPattern::parse("/items/{id}")));
        table.insert("item", Arc::new(UrlPattern::parse("/other/{id}")));
        assert_eq!(table.url_path_for("item", NO_PARAMS).unwrap(), "/items");
        assert_eq!(table.url_path_for("item", [("id", 5)]).unwrap(), "/items/5");
        assert!(table.url_path_for("item", [("slug", 5)]).is_err());
        let err = table.url_path_for("missing", [("id", 1)]).unwrap_err();
        assert_eq!(err.params, ["id"]);
    }
}
