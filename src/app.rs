//! The application object.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use tracing::warn;

use crate::error::Error;
use crate::fallback;
use crate::handler::Handler;
use crate::middleware;
use crate::naming::PathSeparator;
use crate::request::Request;
use crate::response::Response;
use crate::route::RouteInfo;
use crate::router::{Router, RouterBuilder};
use crate::routes::Routes;
use crate::server::Server;

/// An Air application: the root router that the [`Server`] serves.
///
/// Register routes on it directly through [`Routes`], or group them in
/// [`Router`]s and [`include_router`](Air::include_router) them.
///
/// ```rust,no_run
/// use air::{Air, Request, Routes};
///
/// async fn index(_req: Request) -> &'static str { "<h1>I am the home page</h1>" }
/// async fn about_us(_req: Request) -> &'static str { "<h1>I am the about page</h1>" }
///
/// #[tokio::main]
/// async fn main() -> Result<(), air::Error> {
///     let mut app = Air::new();
///     app.page(index)?;     // GET /
///     app.page(about_us)?;  // GET /about-us
///     app.serve("0.0.0.0:8000").await
/// }
/// ```
pub struct Air {
    router: Router,
}

impl Air {
    /// An application with default settings; unmatched requests get a 404
    /// page labelled `app`.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> AirBuilder {
        AirBuilder { inner: Router::builder(), fallback: false }
    }

    /// Copies every route of `router` into the application.
    ///
    /// Fails on the first route that conflicts with one already registered.
    pub fn include_router(&mut self, router: Router) -> Result<(), Error> {
        self.router.include_router(router)
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteInfo> {
        self.router.routes()
    }

    /// Runs one request through the application in-process.
    ///
    /// This is what the server calls for each request; tests can call it
    /// directly with any body type.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(path = %parts.uri.path(), "failed to read request body: {e}");
                return Response::status(StatusCode::BAD_REQUEST).into_inner();
            }
        };

        let req = Request::new(parts, body, self.router.url_table());
        let method = req.method().clone();
        let path = req.path().to_owned();
        middleware::trace(&method, &path, self.router.dispatch(req))
            .await
            .into_inner()
    }

    /// Binds `addr` and serves the application until SIGTERM or Ctrl-C.
    pub async fn serve(self, addr: &str) -> Result<(), Error> {
        Server::bind(addr)?.serve(self).await
    }
}

impl Default for Air {
    fn default() -> Self { Self::new() }
}

impl Routes for Air {
    fn router(&self) -> &Router { &self.router }
    fn router_mut(&mut self) -> &mut Router { &mut self.router }
}

/// Serve a single [`Router`] as the whole application; its own fallback
/// stays in effect.
impl From<Router> for Air {
    fn from(router: Router) -> Self {
        Self { router }
    }
}

/// Configures an [`Air`] application. Obtain via [`Air::builder()`].
pub struct AirBuilder {
    inner: RouterBuilder,
    fallback: bool,
}

impl AirBuilder {
    pub fn path_separator(mut self, separator: PathSeparator) -> Self {
        self.inner = self.inner.path_separator(separator);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner = self.inner.tags(tags);
        self
    }

    pub fn redirect_slashes(mut self, redirect: bool) -> Self {
        self.inner = self.inner.redirect_slashes(redirect);
        self
    }

    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.inner = self.inner.fallback(handler);
        self.fallback = true;
        self
    }

    pub fn build(self) -> Air {
        let inner = if self.fallback {
            self.inner
        } else {
            self.inner.fallback(fallback::not_found("app"))
        };
        Air { router: inner.finish() }
    }
}
