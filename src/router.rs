//! Radix-tree request router.
//!
//! One tree per HTTP method, plus a name table for reverse URLs. Routes are
//! registered through the [`Routes`](crate::Routes) trait; each one gets an
//! `Endpoint` wrapper that applies its options to the handler's output.

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use http::header::ALLOW;
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::Error;
use crate::fallback;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::method::Method;
use crate::naming::PathSeparator;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::route::{Route, RouteInfo, RouteOptions};
use crate::url::{UrlPattern, UrlTable};

/// A group of routes sharing a prefix, tags, a page-path separator and a
/// 404 fallback.
///
/// Build one per area of the application and merge it into the [`Air`](crate::Air)
/// app with [`include_router`](Router::include_router).
///
/// ```rust
/// use air::{Air, PathSeparator, Request, Router, Routes};
///
/// async fn list_users(_req: Request) -> &'static str { "<ul></ul>" }
/// async fn about_us(_req: Request) -> &'static str { "<h1>About</h1>" }
///
/// # fn main() -> Result<(), air::Error> {
/// let mut users = Router::builder().prefix("/users").tags(["users"]).build()?;
/// users.get("/", list_users)?;
///
/// let mut pages = Router::builder().path_separator(PathSeparator::Slash).build()?;
/// assert_eq!(pages.page(about_us)?.path(), "/about/us");
///
/// let mut app = Air::new();
/// app.include_router(users)?;
/// app.include_router(pages)?;
/// # Ok(()) }
/// ```
pub struct Router {
    prefix: String,
    separator: PathSeparator,
    tags: Vec<String>,
    redirect_slashes: bool,
    fallback: BoxedHandler,
    trees: HashMap<Method, MatchitRouter<BoxedHandler>>,
    entries: Vec<Entry>,
    urls: Arc<UrlTable>,
}

struct Entry {
    info: RouteInfo,
    endpoint: BoxedHandler,
}

impl Router {
    /// A router with no prefix and default settings.
    pub fn new() -> Self {
        RouterBuilder::default().finish()
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn prefix(&self) -> &str { &self.prefix }
    pub fn path_separator(&self) -> PathSeparator { self.separator }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    pub fn urls(&self) -> &UrlTable { &self.urls }

    /// Copies every route of `other` into this router.
    ///
    /// Paths get this router's prefix in front and tags get this router's
    /// tags in front. `other`'s fallback is not carried over. Stops at the
    /// first path that conflicts with an existing route.
    pub fn include_router(&mut self, other: Router) -> Result<(), Error> {
        for entry in other.entries {
            let mut info = entry.info;
            info.path = format!("{}{}", self.prefix, info.path);
            info.options.tags = self.tags.iter().cloned().chain(info.options.tags).collect();
            self.insert(info, entry.endpoint)?;
        }
        Ok(())
    }

    pub(crate) fn add(
        &mut self,
        method: Method,
        path: &str,
        mut options: RouteOptions,
        name: Option<String>,
        handler: BoxedHandler,
    ) -> Result<Route, Error> {
        options.tags = self.tags.iter().cloned().chain(options.tags).collect();
        let endpoint: BoxedHandler = Arc::new(Endpoint {
            handler,
            status: options.status,
            content_type: options.content_type,
        });
        let info = RouteInfo {
            method,
            path: format!("{}{}", self.prefix, path),
            name,
            options,
        };
        self.insert(info, endpoint)
    }

    fn insert(&mut self, info: RouteInfo, endpoint: BoxedHandler) -> Result<Route, Error> {
        if !info.path.starts_with('/') {
            let reason = if info.path.is_empty() {
                "a route path must not be empty"
            } else {
                "a route path must start with '/'"
            };
            return Err(Error::InvalidPath { path: info.path, reason });
        }
        self.trees
            .entry(info.method)
            .or_default()
            .insert(info.path.clone(), Arc::clone(&endpoint))
            .map_err(|source| Error::Route {
                method: info.method,
                path: info.path.clone(),
                source,
            })?;

        let pattern = Arc::new(UrlPattern::parse(&info.path));
        if let Some(name) = &info.name {
            Arc::make_mut(&mut self.urls).insert(name, Arc::clone(&pattern));
        }
        debug!(method = %info.method, path = %info.path, name = info.name.as_deref(), "route registered");

        let route = Route::new(info.method, info.path.clone(), info.name.clone(), pattern);
        self.entries.push(Entry { info, endpoint });
        Ok(route)
    }

    pub(crate) fn url_table(&self) -> Arc<UrlTable> {
        Arc::clone(&self.urls)
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.trees.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        Method::ALL.into_iter()
            .filter(|m| self.trees.get(m).is_some_and(|t| t.at(path).is_ok()))
            .collect()
    }

    /// The same path with its trailing slash toggled, if that one is routed
    /// under any method.
    fn slash_variant(&self, path: &str) -> Option<String> {
        let alt = match path.strip_suffix('/') {
            Some("") => return None,
            Some(stripped) => stripped.to_owned(),
            None => format!("{path}/"),
        };
        Method::ALL.into_iter()
            .any(|m| self.lookup(m, &alt).is_some())
            .then_some(alt)
    }

    /// Routes one request: exact match, then 405, then slash redirect, then
    /// the fallback.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        let method = Method::from_http(req.method());
        let path = req.path().to_owned();

        if let Some((handler, params)) = method.and_then(|m| self.lookup(m, &path)) {
            req.params = params;
            return handler.call(req).await;
        }

        let allowed = self.allowed_methods(&path);
        if !allowed.is_empty() {
            let allow: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
            return Response::builder()
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .header(ALLOW.as_str(), &allow.join(", "))
                .text("Method Not Allowed");
        }

        if self.redirect_slashes {
            if let Some(alt) = self.slash_variant(&path) {
                let location = match req.query() {
                    Some(q) => format!("{alt}?{q}"),
                    None => alt,
                };
                debug!(from = %path, to = %location, "redirecting trailing slash");
                return Response::redirect(&location);
            }
        }

        self.fallback.call(req).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Configures a [`Router`]. Obtain via [`Router::builder()`].
pub struct RouterBuilder {
    prefix: String,
    separator: PathSeparator,
    tags: Vec<String>,
    redirect_slashes: bool,
    fallback: Option<BoxedHandler>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: PathSeparator::default(),
            tags: Vec::new(),
            redirect_slashes: true,
            fallback: None,
        }
    }
}

impl RouterBuilder {
    /// Path prefix for every route. Must start with `/` and must not end with one.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// How [`Routes::page`](crate::Routes::page) joins the words of a handler name.
    pub fn path_separator(mut self, separator: PathSeparator) -> Self {
        self.separator = separator;
        self
    }

    /// Tags put in front of every route's own tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Redirect `/a/` to `/a` (and back) with `307` when only the other form
    /// is routed, under any method. On by default.
    pub fn redirect_slashes(mut self, redirect: bool) -> Self {
        self.redirect_slashes = redirect;
        self
    }

    /// Handler for requests no route matches. Defaults to
    /// [`fallback::not_found`] labelled with the prefix, or `"router"`.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    pub fn build(self) -> Result<Router, Error> {
        if !self.prefix.is_empty() {
            let reason = if !self.prefix.starts_with('/') {
                Some("a path prefix must start with '/'")
            } else if self.prefix.ends_with('/') {
                Some("a path prefix must not end with '/'")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(Error::InvalidPrefix { prefix: self.prefix, reason });
            }
        }
        Ok(self.finish())
    }

    pub(crate) fn finish(self) -> Router {
        let fallback = self.fallback.unwrap_or_else(|| {
            let label = if self.prefix.is_empty() { "router" } else { self.prefix.as_str() };
            fallback::not_found(label).into_boxed_handler()
        });
        Router {
            prefix: self.prefix,
            separator: self.separator,
            tags: self.tags,
            redirect_slashes: self.redirect_slashes,
            fallback,
            trees: HashMap::new(),
            entries: Vec::new(),
            urls: Arc::new(UrlTable::default()),
        }
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// A registered handler together with the response options of its route.
struct Endpoint {
    handler: BoxedHandler,
    status: Option<StatusCode>,
    content_type: Option<ContentType>,
}

impl ErasedHandler for Endpoint {
    fn call(&self, req: Request) -> BoxFuture {
        let fut = self.handler.call(req);
        let (status, content_type) = (self.status, self.content_type);
        Box::pin(async move {
            let mut res = fut.await;
            if res.implicit {
                if let Some(status) = status {
                    res.set_status(status);
                }
                if let Some(content_type) = content_type {
                    res.set_content_type(content_type);
                }
            }
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Routes;

    async fn about(_req: Request) -> &'static str { "about" }

    #[test]
    fn root_has_no_slash_variant() {
        let mut router = Router::new();
        router.get("/", about).unwrap();
        assert_eq!(router.slash_variant("/"), None);
    }

    #[test]
    fn slash_variant_toggles_trailing_slash() {
        let mut router = Router::new();
        router.get("/about", about).unwrap();
        router.post("/form/", about).unwrap();
        assert_eq!(router.slash_variant("/about/"), Some("/about".to_owned()));
        assert_eq!(router.slash_variant("/form"), Some("/form/".to_owned()));
        assert_eq!(router.slash_variant("/other"), None);
    }

    #[test]
    fn allowed_methods_follow_registration() {
        let mut router = Router::new();
        router.get("/x", about).unwrap();
        router.put("/x", about).unwrap();
        assert_eq!(router.allowed_methods("/x"), [Method::Get, Method::Put]);
        assert!(router.allowed_methods("/y").is_empty());
    }

    #[test]
    fn router_tags_prefix_route_tags() {
        let mut router = Router::builder().tags(["site"]).build().unwrap();
        router.get_with("/x", RouteOptions::new().tags(["x"]), about).unwrap();
        let info = router.routes().next().unwrap();
        assert_eq!(info.tags(), ["site", "x"]);
        assert_eq!(info.name(), Some("about"));
    }
}
