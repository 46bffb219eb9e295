//! Route registration surface shared by [`Router`] and [`Air`](crate::Air).
//!
//! Every registration call hands back a [`Route`], whose `url()` rebuilds a
//! concrete path from parameter values:
//!
//! ```rust
//! use air::{Air, Request, Routes};
//!
//! async fn index(_req: Request) -> &'static str { "<h1>Home</h1>" }
//! async fn get_item(req: Request) -> String {
//!     format!("<p>item {}</p>", req.param("id").unwrap_or("?"))
//! }
//!
//! # fn main() -> Result<(), air::Error> {
//! let mut app = Air::new();
//! let home = app.page(index)?;
//! let item = app.get("/items/{id}", get_item)?;
//!
//! assert_eq!(home.path(), "/");
//! assert_eq!(item.url([("id", 5)])?, "/items/5");
//! assert_eq!(app.url_path_for("get_item", [("id", 6)])?, "/items/6");
//! # Ok(()) }
//! ```

use crate::error::Error;
use crate::handler::Handler;
use crate::method::Method;
use crate::naming::{handler_name, page_path};
use crate::route::{Route, RouteOptions};
use crate::router::Router;
use crate::url::NoMatchFound;

/// Expands into a plain and a `_with` registration method per HTTP method.
macro_rules! method_routes {
    ($($plain:ident, $with:ident => $method:expr;)*) => {$(
        #[doc = concat!("Registers `handler` for `", stringify!($plain), "` requests at `path`.")]
        fn $plain<H: Handler>(&mut self, path: &str, handler: H) -> Result<Route, Error> {
            self.route($method, path, RouteOptions::new(), handler)
        }

        #[doc = concat!("Like [`", stringify!($plain), "`](Routes::", stringify!($plain), "), with per-route options.")]
        fn $with<H: Handler>(&mut self, path: &str, options: RouteOptions, handler: H) -> Result<Route, Error> {
            self.route($method, path, options, handler)
        }
    )*};
}

/// Registration methods. Implemented by [`Router`] and [`Air`](crate::Air);
/// bring it into scope with `use air::Routes`.
pub trait Routes {
    #[doc(hidden)]
    fn router(&self) -> &Router;

    #[doc(hidden)]
    fn router_mut(&mut self) -> &mut Router;

    /// Registers `handler` for `method` at `path` (relative to the router's
    /// prefix).
    ///
    /// The route is named after [`RouteOptions::name`] or, failing that, the
    /// handler's function name. That name comes from [`std::any::type_name`],
    /// whose output the compiler does not promise to keep stable; set
    /// [`RouteOptions::name`] when a route's name has to stay fixed.
    ///
    /// Conflicting or malformed paths fail here with [`Error::Route`]; a full
    /// path that is empty or doesn't start with `/` fails with
    /// [`Error::InvalidPath`].
    fn route<H: Handler>(
        &mut self,
        method: Method,
        path: &str,
        options: RouteOptions,
        handler: H,
    ) -> Result<Route, Error> {
        let name = options.name.clone().or_else(|| handler_name::<H>().map(str::to_owned));
        self.router_mut().add(method, path, options, name, handler.into_boxed_handler())
    }

    method_routes! {
        get,    get_with    => Method::Get;
        post,   post_with   => Method::Post;
        put,    put_with    => Method::Put;
        patch,  patch_with  => Method::Patch;
        delete, delete_with => Method::Delete;
    }

    /// Registers a `GET` route whose path comes from the handler's name.
    ///
    /// `index` maps to `/`; otherwise underscores become the router's
    /// [`PathSeparator`](crate::PathSeparator): `about_us` is `/about-us`
    /// by default, `/about/us` with [`PathSeparator::Slash`](crate::PathSeparator::Slash).
    fn page<H: Handler>(&mut self, handler: H) -> Result<Route, Error> {
        self.page_with(RouteOptions::new(), handler)
    }

    /// Like [`page`](Routes::page), with per-route options. A name set in
    /// `options` replaces the handler's name for both the path and the route
    /// name, which is the only way to register a closure as a page.
    fn page_with<H: Handler>(&mut self, options: RouteOptions, handler: H) -> Result<Route, Error> {
        let name = options.name.clone()
            .or_else(|| handler_name::<H>().map(str::to_owned))
            .ok_or(Error::AnonymousPage)?;
        let path = page_path(&name, self.router().path_separator());
        self.route(Method::Get, &path, options.name(name), handler)
    }

    /// Builds the path of the route registered as `name`.
    fn url_path_for<I, K, V>(&self, name: &str, params: I) -> Result<String, NoMatchFound>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.router().urls().url_path_for(name, params)
    }
}

impl Routes for Router {
    fn router(&self) -> &Router { self }
    fn router_mut(&mut self) -> &mut Router { self }
}
