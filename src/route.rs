//! Per-route configuration and the handle returned by registration.

use std::sync::Arc;

use http::StatusCode;

use crate::method::Method;
use crate::response::ContentType;
use crate::url::{NoMatchFound, UrlPattern};

/// Optional settings for one route.
///
/// `status` and `content_type` shape responses the handler produced from
/// plain values (see [`IntoResponse`](crate::IntoResponse)). The rest is
/// metadata kept on [`RouteInfo`].
///
/// ```rust
/// use air::{ContentType, RouteOptions};
/// use http::StatusCode;
///
/// let opts = RouteOptions::new()
///     .status(StatusCode::CREATED)
///     .content_type(ContentType::Json)
///     .tags(["users"])
///     .summary("Create a user");
/// ```
#[derive(Clone, Debug)]
pub struct RouteOptions {
    pub(crate) name: Option<String>,
    pub(crate) status: Option<StatusCode>,
    pub(crate) content_type: Option<ContentType>,
    pub(crate) tags: Vec<String>,
    pub(crate) summary: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) deprecated: bool,
    pub(crate) include_in_schema: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            name: None,
            status: None,
            content_type: None,
            tags: Vec::new(),
            summary: None,
            description: None,
            deprecated: false,
            include_in_schema: true,
        }
    }
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the route name, which otherwise is the handler's function name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn include_in_schema(mut self, include: bool) -> Self {
        self.include_in_schema = include;
        self
    }
}

/// Handle to a registered route.
///
/// Returned by every registration call; its [`url`](Route::url) method is
/// how you link to the route without repeating its path.
///
/// ```rust
/// use air::{Air, Request, Routes};
///
/// async fn get_user(req: Request) -> String {
///     format!("<h1>User {}</h1>", req.param("user_id").unwrap_or("?"))
/// }
///
/// # fn main() -> Result<(), air::Error> {
/// let mut app = Air::new();
/// let route = app.get("/users/{user_id}", get_user)?;
/// assert_eq!(route.url([("user_id", 123)])?, "/users/123");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Route {
    method: Method,
    path: String,
    name: Option<String>,
    pattern: Arc<UrlPattern>,
}

impl Route {
    pub(crate) fn new(method: Method, path: String, name: Option<String>, pattern: Arc<UrlPattern>) -> Self {
        Self { method, path, name, pattern }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Builds this route's URL from its path parameters.
    ///
    /// Fails with [`NoMatchFound`] unless `params` names exactly the path's
    /// parameters with values that fit their segments.
    pub fn url<I, K, V>(&self, params: I) -> Result<String, NoMatchFound>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.pattern.expand(self.name().unwrap_or(&self.path), params)
    }
}

/// Read-only view of a registered route, for introspection.
#[derive(Clone, Debug)]
pub struct RouteInfo {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) options: RouteOptions,
}

impl RouteInfo {
    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
    pub fn tags(&self) -> &[String] { &self.options.tags }
    pub fn summary(&self) -> Option<&str> { self.options.summary.as_deref() }
    pub fn description(&self) -> Option<&str> { self.options.description.as_deref() }
    pub fn status(&self) -> Option<StatusCode> { self.options.status }
    pub fn content_type(&self) -> Option<ContentType> { self.options.content_type }
    pub fn deprecated(&self) -> bool { self.options.deprecated }
    pub fn include_in_schema(&self) -> bool { self.options.include_in_schema }
}
