//! Handler names to URL paths.
//!
//! A page is a `GET` route whose path is derived from the handler's own
//! name: `about_us` becomes `/about-us` (or `/about/us`), and `index` is
//! always the root.

use std::fmt;
use std::str::FromStr;

/// Name that always maps to `/`.
pub const INDEX: &str = "index";

/// Character that replaces `_` when a handler name becomes a path.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PathSeparator {
    /// `about_us` → `/about-us`
    #[default]
    Dash,
    /// `about_us` → `/about/us`
    Slash,
}

impl PathSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dash  => "-",
            Self::Slash => "/",
        }
    }
}

impl FromStr for PathSeparator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" => Ok(Self::Dash),
            "/" => Ok(Self::Slash),
            _   => Err(()),
        }
    }
}

impl fmt::Display for PathSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a handler name into a page path.
///
/// ```rust
/// use air::{PathSeparator, page_path};
///
/// assert_eq!(page_path("index", PathSeparator::Dash), "/");
/// assert_eq!(page_path("about_us", PathSeparator::Dash), "/about-us");
/// assert_eq!(page_path("about_us", PathSeparator::Slash), "/about/us");
/// ```
///
/// Case is preserved and characters other than `_` pass through untouched.
pub fn page_path(name: &str, separator: PathSeparator) -> String {
    if name == INDEX {
        return "/".to_owned();
    }
    format!("/{}", name.replace('_', separator.as_str()))
}

/// The bare function name of a handler type, if it has one.
///
/// For a fn item `app::pages::about_us` this is `Some("about_us")`.
/// Closures have no name and yield `None`.
pub(crate) fn handler_name<H>() -> Option<&'static str> {
    let full = std::any::type_name::<H>();
    let path = full.split('<').next().unwrap_or(full);
    let last = path.rsplit("::").next().unwrap_or(path);
    if last.is_empty() || last.contains('{') {
        None
    } else {
        Some(last)
    }
}
