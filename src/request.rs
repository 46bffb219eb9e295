//! Incoming HTTP request type.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Uri};

use crate::url::{NoMatchFound, UrlTable};

/// An incoming HTTP request with its body fully collected.
///
/// Besides the usual accessors it can build URLs for any named route of the
/// application that is serving it, see [`Request::url_for`].
pub struct Request {
    pub(crate) method: http::Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) urls: Arc<UrlTable>,
}

impl Request {
    pub(crate) fn new(parts: Parts, body: Bytes, urls: Arc<UrlTable>) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
            urls,
        }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn query(&self) -> Option<&str> { self.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that aren't visible ASCII read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Builds the path of the route registered as `name`.
    ///
    /// ```rust,no_run
    /// # use air::Request;
    /// # fn f(req: Request) -> Result<(), air::NoMatchFound> {
    /// let link = req.url_for("get_user", [("user_id", 7)])?;
    /// # Ok(()) }
    /// ```
    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Result<String, NoMatchFound>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.urls.url_path_for(name, params)
    }
}
